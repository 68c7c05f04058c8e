//! Shared traits and the domain error type.

use std::fmt;

use chrono::NaiveDate;
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the claim book.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised by the period and parsing helpers of the domain layer.
pub enum PeriodError {
    /// The range start is not strictly before its end.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// The supplied frequency label is not one of monthly, quarterly, yearly.
    InvalidFrequency(String),
    /// The supplied claim type label is not a known claim type.
    UnknownClaimType(String),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::InvalidRange { start, end } => {
                write!(f, "start date {start} must be before end date {end}")
            }
            PeriodError::InvalidFrequency(value) => {
                write!(f, "unrecognized frequency `{value}`")
            }
            PeriodError::UnknownClaimType(value) => {
                write!(f, "unknown claim type `{value}`")
            }
        }
    }
}

impl std::error::Error for PeriodError {}

// Re-export common dependencies so consumers can rely on this crate as a façade.
pub use chrono;
pub use rust_decimal;
pub use serde;
pub use uuid;
