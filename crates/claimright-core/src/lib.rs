//! claimright-core
//!
//! Amortization services for claim rights: schedule generation, journal
//! posting and accrual runs. Depends on claimright-domain. No terminal I/O;
//! persistence goes through the [`ClaimStore`] trait.

pub mod accounts;
pub mod accrual_service;
pub mod classification;
pub mod claim_service;
pub mod error;
pub mod ledger;
pub mod memory_store;
pub mod posting_service;
pub mod schedule_service;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use accounts::*;
pub use accrual_service::*;
pub use classification::*;
pub use claim_service::*;
pub use error::{CoreError, ErrorKind};
pub use ledger::*;
pub use memory_store::*;
pub use posting_service::*;
pub use schedule_service::*;
pub use storage::*;
pub use summary_service::*;
pub use time::*;

#[cfg(test)]
mod tests;
