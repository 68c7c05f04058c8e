//! Immutable double-entry journal records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Displayable, Identifiable};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// A chart-of-accounts entry referenced by journal lines.
pub struct Account {
    pub code: String,
    pub name: String,
}

impl Account {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalLine {
    pub account_code: String,
    pub account_name: String,
    pub debit: Decimal,
    pub credit: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JournalLine {
    pub fn debit(account: &Account, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            debit: amount,
            credit: Decimal::ZERO,
            description: Some(description.into()),
        }
    }

    pub fn credit(account: &Account, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            debit: Decimal::ZERO,
            credit: amount,
            description: Some(description.into()),
        }
    }

    /// Exactly one side is non-zero and neither side is negative.
    pub fn is_one_sided(&self) -> bool {
        let debit = !self.debit.is_zero();
        let credit = !self.credit.is_zero();
        debit != credit && !self.debit.is_sign_negative() && !self.credit.is_sign_negative()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// What triggered a journal entry.
pub enum JournalSource {
    Amortization {
        claim_right_id: Uuid,
        schedule_entry_id: Uuid,
        period_number: u32,
    },
    LedgerEntry { ledger_entry_id: Uuid },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub id: Uuid,
    pub source: JournalSource,
    pub entry_date: NaiveDate,
    pub reference: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub currency: String,
    #[serde(default)]
    pub is_adjusting: bool,
    pub lines: Vec<JournalLine>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn total_debits(&self) -> Decimal {
        self.lines.iter().map(|line| line.debit).sum()
    }

    pub fn total_credits(&self) -> Decimal {
        self.lines.iter().map(|line| line.credit).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }

    /// Describes the first structural problem with the entry, if any.
    pub fn integrity_violation(&self) -> Option<String> {
        if self.lines.len() < 2 {
            return Some(format!(
                "journal {} has {} line(s); at least two are required",
                self.reference,
                self.lines.len()
            ));
        }
        if let Some(line) = self.lines.iter().find(|line| !line.is_one_sided()) {
            return Some(format!(
                "journal {} line for account {} must carry exactly one positive side",
                self.reference, line.account_code
            ));
        }
        if !self.is_balanced() {
            return Some(format!(
                "journal {} is unbalanced: debits {} != credits {}",
                self.reference,
                self.total_debits(),
                self.total_credits()
            ));
        }
        None
    }

    pub fn claim_right_id(&self) -> Option<Uuid> {
        match self.source {
            JournalSource::Amortization { claim_right_id, .. } => Some(claim_right_id),
            JournalSource::LedgerEntry { .. } => None,
        }
    }

    pub fn schedule_entry_id(&self) -> Option<Uuid> {
        match self.source {
            JournalSource::Amortization {
                schedule_entry_id, ..
            } => Some(schedule_entry_id),
            JournalSource::LedgerEntry { .. } => None,
        }
    }
}

impl Identifiable for JournalEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for JournalEntry {
    fn display_label(&self) -> String {
        format!("{} {} {}", self.reference, self.total_debits(), self.currency)
    }
}
