use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, error};
use uuid::Uuid;

use claimright_domain::{ClaimRight, ClaimType, JournalEntry, JournalLine, JournalSource, ScheduleEntry};

use crate::{AccountMapper, ClaimStore, Clock, CoreError};

/// Turns due schedule entries into balanced journals.
pub struct PostingService;

impl PostingService {
    /// Posts one schedule entry: writes the journal, flips the entry to posted and
    /// advances the claim, all inside a single store commit.
    pub fn post(
        store: &dyn ClaimStore,
        accounts: &dyn AccountMapper,
        clock: &dyn Clock,
        claim_id: Uuid,
        entry_id: Uuid,
    ) -> Result<JournalEntry, CoreError> {
        let at = clock.now();
        let journal = store.post_entry(
            claim_id,
            entry_id,
            &mut |claim: &mut ClaimRight, entry: &mut ScheduleEntry| {
                Self::apply(claim, entry, accounts, at)
            },
        )?;
        debug!(
            claim_right = %claim_id,
            entry = %entry_id,
            journal = %journal.id,
            amount = %journal.total_debits(),
            "schedule entry posted"
        );
        Ok(journal)
    }

    /// Applies a posting to in-memory copies of a claim and entry, returning the
    /// journal that records it. Nothing is changed when an error is returned.
    pub fn apply(
        claim: &mut ClaimRight,
        entry: &mut ScheduleEntry,
        accounts: &dyn AccountMapper,
        at: DateTime<Utc>,
    ) -> Result<JournalEntry, CoreError> {
        let journal = Self::preview(claim, entry, accounts, at)?;
        entry.mark_posted(journal.id, at);
        claim.record_posting(entry.period_number, entry.amount, at);
        Ok(journal)
    }

    /// Runs every posting check and builds the journal without mutating anything.
    pub fn preview(
        claim: &ClaimRight,
        entry: &ScheduleEntry,
        accounts: &dyn AccountMapper,
        at: DateTime<Utc>,
    ) -> Result<JournalEntry, CoreError> {
        Self::check_postable(claim, entry)?;
        let journal = Self::build_journal(claim, entry, accounts, at);
        if let Some(violation) = journal.integrity_violation() {
            error!(claim_right = %claim.id, entry = %entry.id, %violation, "refusing to post journal");
            return Err(CoreError::Integrity(violation));
        }
        let amortized = claim
            .amortized_amount
            .checked_add(entry.amount)
            .ok_or_else(|| CoreError::Integrity("amortized amount overflowed".into()))?;
        if amortized > claim.total_amount {
            error!(claim_right = %claim.id, %amortized, total = %claim.total_amount, "over-amortization");
            return Err(CoreError::Integrity(format!(
                "posting period {} would amortize {} of claim right {} totalling {}",
                entry.period_number, amortized, claim.id, claim.total_amount
            )));
        }
        Ok(journal)
    }

    /// State checks shared by real and simulated postings.
    pub fn check_postable(claim: &ClaimRight, entry: &ScheduleEntry) -> Result<(), CoreError> {
        if entry.claim_right_id != claim.id {
            return Err(CoreError::Integrity(format!(
                "schedule entry {} belongs to claim right {}, not {}",
                entry.id, entry.claim_right_id, claim.id
            )));
        }
        if !entry.is_pending() {
            return Err(CoreError::AlreadyPosted { entry_id: entry.id });
        }
        if !claim.is_active() {
            return Err(CoreError::InactiveClaim {
                id: claim.id,
                status: claim.status,
            });
        }
        let expected = claim.last_posted_period + 1;
        if entry.period_number != expected {
            return Err(CoreError::OutOfOrder {
                claim_id: claim.id,
                period_number: entry.period_number,
                expected,
            });
        }
        if entry.amount <= Decimal::ZERO {
            return Err(CoreError::Integrity(format!(
                "schedule entry {} has non-positive amount {}",
                entry.id, entry.amount
            )));
        }
        Ok(())
    }

    /// The two-line journal recognizing one period of a claim.
    pub fn build_journal(
        claim: &ClaimRight,
        entry: &ScheduleEntry,
        accounts: &dyn AccountMapper,
        at: DateTime<Utc>,
    ) -> JournalEntry {
        let pair = accounts.accounts_for(claim);
        let (debit_note, credit_note, kind) = match claim.claim_type {
            ClaimType::AssetClaim => (
                format!("Expense recognition for {}", claim.description),
                format!("Prepaid expense reduction for {}", claim.description),
                "Asset Claim",
            ),
            ClaimType::LiabilityClaim => (
                format!("Deferred revenue reduction for {}", claim.description),
                format!("Revenue recognition for {}", claim.description),
                "Liability Claim",
            ),
        };
        JournalEntry {
            id: Uuid::new_v4(),
            source: JournalSource::Amortization {
                claim_right_id: claim.id,
                schedule_entry_id: entry.id,
                period_number: entry.period_number,
            },
            entry_date: entry.period_start,
            reference: format!("AMORT-{}-{}", claim.id, entry.period_number),
            description: format!(
                "Amortization: {} (Period {})",
                claim.description, entry.period_number
            ),
            memo: Some(format!("Claim Right {} - {kind} Amortization", claim.id)),
            currency: claim.currency.clone(),
            is_adjusting: true,
            lines: vec![
                JournalLine::debit(&pair.debit, entry.amount, debit_note),
                JournalLine::credit(&pair.credit, entry.amount, credit_note),
            ],
            created_at: at,
        }
    }
}
