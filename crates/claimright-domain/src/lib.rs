//! claimright-domain
//!
//! Pure domain models for claim right amortization (ClaimRight, ScheduleEntry,
//! JournalEntry, ClaimBook) plus exact money and calendar period utilities.
//! No I/O, no storage. Only data types, core enums and arithmetic.

pub mod book;
pub mod claim;
pub mod common;
pub mod journal;
pub mod ledger_entry;
pub mod money;
pub mod period;
pub mod schedule;

pub use book::*;
pub use claim::*;
pub use common::*;
pub use journal::*;
pub use ledger_entry::*;
pub use money::*;
pub use period::*;
pub use schedule::*;
