#![doc(test(attr(deny(warnings))))]

//! Claim right amortization and double-entry accrual engine.
//!
//! Prepaid expenses and deferred revenue are recorded as claim rights, each
//! with a fixed schedule of period slices. Accrual runs post every due slice as
//! a balanced journal. [`AccrualEngine`] is the entry point; the workspace
//! crates are re-exported for callers that need the lower layers.

pub mod engine;
pub mod errors;
pub mod utils;

pub use claimright_config as config;
pub use claimright_core as services;
pub use claimright_domain as domain;
pub use claimright_storage_json as storage;
pub use engine::AccrualEngine;
pub use errors::EngineError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], with the default directive taken from configuration.
pub fn init_with_config(config: &config::Config) {
    init_with_filter(config.log_filter.as_deref());
}

fn init_with_filter(directive: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::info!("claimright tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
