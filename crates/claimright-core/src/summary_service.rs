use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use claimright_domain::{ClaimBook, ClaimType};

use crate::{ClaimStore, Clock, CoreError};

/// Aggregate view over the active claim rights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimRightsSummary {
    pub total_claims: usize,
    pub asset_claims: usize,
    pub liability_claims: usize,
    pub total_asset_amount: Decimal,
    pub total_liability_amount: Decimal,
    pub remaining_asset_amount: Decimal,
    pub remaining_liability_amount: Decimal,
    /// Active claims with at least one pending entry whose period has ended.
    pub pending_accruals: usize,
}

pub struct SummaryService;

impl SummaryService {
    pub fn summary(store: &dyn ClaimStore, clock: &dyn Clock) -> Result<ClaimRightsSummary, CoreError> {
        let book = store.snapshot()?;
        Ok(Self::summarize(&book, clock.today()))
    }

    /// Computed from the book on every call; nothing is cached.
    pub fn summarize(book: &ClaimBook, today: NaiveDate) -> ClaimRightsSummary {
        let mut summary = ClaimRightsSummary::default();
        for claim in book.claims.iter().filter(|claim| claim.is_active()) {
            summary.total_claims += 1;
            match claim.claim_type {
                ClaimType::AssetClaim => {
                    summary.asset_claims += 1;
                    summary.total_asset_amount += claim.total_amount;
                    summary.remaining_asset_amount += claim.remaining_amount();
                }
                ClaimType::LiabilityClaim => {
                    summary.liability_claims += 1;
                    summary.total_liability_amount += claim.total_amount;
                    summary.remaining_liability_amount += claim.remaining_amount();
                }
            }
            if book.schedule(claim.id).iter().any(|entry| entry.is_due_on(today)) {
                summary.pending_accruals += 1;
            }
        }
        summary
    }
}
