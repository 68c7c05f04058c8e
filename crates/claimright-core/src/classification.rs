//! Keyword heuristics that suggest a claim type for a ledger entry.

use rust_decimal::Decimal;

use claimright_domain::{ClaimType, LedgerEntryRef};

const PREPAID_KEYWORDS: &[&str] = &[
    "prepaid",
    "pre-paid",
    "subscription",
    "annual",
    "yearly",
    "monthly",
    "quarterly",
];
const SERVICE_KEYWORDS: &[&str] = &["service", "maintenance", "support", "license", "membership"];
const DEFERRED_KEYWORDS: &[&str] = &["deferred", "advance", "deposit", "retainer", "prepayment"];
const LOAN_KEYWORDS: &[&str] = &["loan", "emi", "installment", "financing", "credit"];
const INCOME_KEYWORDS: &[&str] = &["revenue", "income"];
const LARGE_RECURRING_KEYWORDS: &[&str] = &["annual", "yearly", "subscription"];
const LARGE_AMOUNT_THRESHOLD: i64 = 1000;

pub struct Classifier;

impl Classifier {
    /// Suggests a claim type, or `None` when nothing marks the entry as long-term.
    ///
    /// Rules apply in order: prepaid or service wording means an asset unless
    /// revenue wording is present; deferral or loan wording means a liability;
    /// a large amount with annual or subscription wording means an asset.
    pub fn classify(entry: &LedgerEntryRef) -> Option<ClaimType> {
        let text = entry.search_text();
        let mentions = |keywords: &[&str]| keywords.iter().any(|keyword| text.contains(keyword));

        if (mentions(PREPAID_KEYWORDS) || mentions(SERVICE_KEYWORDS)) && !mentions(INCOME_KEYWORDS) {
            return Some(ClaimType::AssetClaim);
        }
        if mentions(DEFERRED_KEYWORDS) || mentions(LOAN_KEYWORDS) {
            return Some(ClaimType::LiabilityClaim);
        }
        if entry.total > Decimal::from(LARGE_AMOUNT_THRESHOLD) && mentions(LARGE_RECURRING_KEYWORDS) {
            return Some(ClaimType::AssetClaim);
        }
        None
    }
}
