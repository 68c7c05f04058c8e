use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use claimright_domain::{ClaimStatus, PeriodError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid range: start date {start} must be before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),
    #[error("Unknown claim type: {0}")]
    UnknownClaimType(String),
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Claim right not found: {0}")]
    NotFound(Uuid),
    #[error("Schedule entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Ledger entry not found: {0}")]
    LedgerEntryNotFound(Uuid),
    #[error("Claim right {id} is already {status}")]
    AlreadyTerminal { id: Uuid, status: ClaimStatus },
    #[error("Schedule entry {entry_id} is already posted")]
    AlreadyPosted { entry_id: Uuid },
    #[error("Claim right {id} is {status}, not active")]
    InactiveClaim { id: Uuid, status: ClaimStatus },
    #[error("Claim right {claim_id} period {period_number} cannot post before period {expected}")]
    OutOfOrder {
        claim_id: Uuid,
        period_number: u32,
        expected: u32,
    },
    #[error("Claim right {0} has posted schedule entries and cannot be deleted")]
    ClaimInUse(Uuid),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad classes of [`CoreError`], used to decide whether a batch run may continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad caller input, rejected before any state change.
    Validation,
    /// The operation conflicts with the current state of a record.
    State,
    /// A balance or coverage invariant was broken; indicates a bug.
    Integrity,
    /// The store itself failed.
    Infrastructure,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidRange { .. }
            | CoreError::InvalidFrequency(_)
            | CoreError::UnknownClaimType(_)
            | CoreError::InvalidSchedule(_)
            | CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::NotFound(_)
            | CoreError::EntryNotFound(_)
            | CoreError::LedgerEntryNotFound(_)
            | CoreError::AlreadyTerminal { .. }
            | CoreError::AlreadyPosted { .. }
            | CoreError::InactiveClaim { .. }
            | CoreError::OutOfOrder { .. }
            | CoreError::ClaimInUse(_) => ErrorKind::State,
            CoreError::Integrity(_) => ErrorKind::Integrity,
            CoreError::Storage(_) | CoreError::Serde(_) | CoreError::Io(_) => {
                ErrorKind::Infrastructure
            }
        }
    }

    /// Whether an accrual run can record this error against one entry and move on.
    pub fn is_entry_level(&self) -> bool {
        self.kind() != ErrorKind::Infrastructure
    }
}

impl From<PeriodError> for CoreError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::InvalidRange { start, end } => CoreError::InvalidRange { start, end },
            PeriodError::InvalidFrequency(value) => CoreError::InvalidFrequency(value),
            PeriodError::UnknownClaimType(value) => CoreError::UnknownClaimType(value),
        }
    }
}
