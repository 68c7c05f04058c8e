//! Amortization schedule entries: one recognition slice per period.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{Displayable, Identifiable},
    period::PeriodRange,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
/// Posting state of a schedule entry. Transitions `Pending -> Posted` once.
pub enum EntryStatus {
    #[default]
    Pending,
    Posted,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryStatus::Pending => "PENDING",
            EntryStatus::Posted => "POSTED",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub claim_right_id: Uuid,
    /// 1-based and unique within a claim.
    pub period_number: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_journal_entry_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
}

impl ScheduleEntry {
    pub fn new(claim_right_id: Uuid, period_number: u32, period: PeriodRange, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            claim_right_id,
            period_number,
            period_start: period.start,
            period_end: period.end,
            amount,
            status: EntryStatus::Pending,
            posted_journal_entry_id: None,
            posted_at: None,
        }
    }

    pub fn period(&self) -> PeriodRange {
        PeriodRange {
            start: self.period_start,
            end: self.period_end,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }

    /// Whether the period has closed on or before `reference`.
    pub fn is_due_on(&self, reference: NaiveDate) -> bool {
        self.is_pending() && self.period_end <= reference
    }

    pub fn mark_posted(&mut self, journal_entry_id: Uuid, at: DateTime<Utc>) {
        self.status = EntryStatus::Posted;
        self.posted_journal_entry_id = Some(journal_entry_id);
        self.posted_at = Some(at);
    }
}

impl Identifiable for ScheduleEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for ScheduleEntry {
    fn display_label(&self) -> String {
        format!(
            "period {} {}..{} {} [{}]",
            self.period_number, self.period_start, self.period_end, self.amount, self.status
        )
    }
}
