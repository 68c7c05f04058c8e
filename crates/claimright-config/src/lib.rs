//! claimright-config
//!
//! Engine configuration model: default currency and frequency, the chart of
//! accounts used for amortization journals, storage location and logging.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{AccountSetting, AccountsConfig, Config};
