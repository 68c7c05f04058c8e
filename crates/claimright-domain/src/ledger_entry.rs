use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// Read-only view of an externally owned ledger entry that a claim right can be
/// derived from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntryRef {
    pub id: Uuid,
    pub date: NaiveDate,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl LedgerEntryRef {
    pub fn new(date: NaiveDate, total: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            total,
            currency: None,
            vendor: None,
            description: None,
            category: None,
            payment_method: None,
        }
    }

    /// Lower-cased concatenation of the free-text fields, used for keyword matching.
    pub fn search_text(&self) -> String {
        [
            self.description.as_deref(),
            self.category.as_deref(),
            self.vendor.as_deref(),
            self.payment_method.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

impl Identifiable for LedgerEntryRef {
    fn id(&self) -> Uuid {
        self.id
    }
}
