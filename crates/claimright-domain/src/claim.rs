//! Claim rights: recognized prepaid assets or deferred revenue liabilities.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{Displayable, Identifiable, PeriodError},
    period::Frequency,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Which side of the balance sheet the claim sits on.
pub enum ClaimType {
    /// Prepaid expense: amortizes as expense recognition over time.
    AssetClaim,
    /// Deferred revenue: amortizes as revenue recognition over time.
    LiabilityClaim,
}

impl ClaimType {
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimType::AssetClaim => "ASSET_CLAIM",
            ClaimType::LiabilityClaim => "LIABILITY_CLAIM",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimType {
    type Err = PeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASSET_CLAIM" | "ASSET" => Ok(ClaimType::AssetClaim),
            "LIABILITY_CLAIM" | "LIABILITY" => Ok(ClaimType::LiabilityClaim),
            _ => Err(PeriodError::UnknownClaimType(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
/// Lifecycle state of a claim right. `Completed` and `Cancelled` are terminal.
pub enum ClaimStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl ClaimStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ClaimStatus::Completed | ClaimStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::Active => "active",
            ClaimStatus::Completed => "completed",
            ClaimStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimRight {
    pub id: Uuid,
    pub claim_type: ClaimType,
    pub description: String,
    pub total_amount: Decimal,
    #[serde(default)]
    pub amortized_amount: Decimal,
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: Frequency,
    #[serde(default)]
    pub status: ClaimStatus,
    /// Originating ledger entry, when the claim was derived from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_entry_id: Option<Uuid>,
    /// Ledger category copied from the originating entry; drives account selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Highest period number already posted; 0 when nothing has been posted.
    #[serde(default)]
    pub last_posted_period: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl ClaimRight {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        claim_type: ClaimType,
        description: impl Into<String>,
        total_amount: Decimal,
        currency: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: Frequency,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            claim_type,
            description: description.into(),
            total_amount,
            amortized_amount: Decimal::ZERO,
            currency: currency.into(),
            start_date,
            end_date,
            frequency,
            status: ClaimStatus::Active,
            ledger_entry_id: None,
            category: None,
            last_posted_period: 0,
            created_at,
            updated_at: created_at,
            completed_at: None,
            cancellation_date: None,
            cancellation_reason: None,
        }
    }

    /// `total_amount - amortized_amount`.
    pub fn remaining_amount(&self) -> Decimal {
        self.total_amount - self.amortized_amount
    }

    pub fn is_active(&self) -> bool {
        self.status == ClaimStatus::Active
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_fully_amortized(&self) -> bool {
        self.amortized_amount == self.total_amount
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    /// Moves the claim into the cancelled state. Callers validate the transition.
    pub fn mark_cancelled(&mut self, at: DateTime<Utc>, reason: Option<String>) {
        self.status = ClaimStatus::Cancelled;
        self.cancellation_date = Some(at);
        self.cancellation_reason = reason;
        self.updated_at = at;
    }

    /// Applies one posted period to the running totals, flipping to `Completed`
    /// once the whole amount has been recognized.
    pub fn record_posting(&mut self, period_number: u32, amount: Decimal, at: DateTime<Utc>) {
        self.amortized_amount += amount;
        self.last_posted_period = period_number;
        self.updated_at = at;
        if self.is_fully_amortized() {
            self.status = ClaimStatus::Completed;
            self.completed_at = Some(at);
        }
    }
}

impl Identifiable for ClaimRight {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for ClaimRight {
    fn display_label(&self) -> String {
        format!(
            "{} {} {} {} [{}]",
            self.claim_type, self.description, self.total_amount, self.currency, self.status
        )
    }
}
