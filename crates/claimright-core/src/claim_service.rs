use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use claimright_domain::{
    minor_units, normalize_currency, one_year_from, ClaimRight, ClaimType, EntryStatus, Frequency,
    ScheduleEntry,
};

use crate::{
    classification::Classifier, ClaimFilter, ClaimStore, Clock, CoreError, LedgerLookup,
    ScheduleGenerator,
};

/// Label given to claims created without a description.
pub const DEFAULT_DESCRIPTION: &str = "Long-term transaction";

/// Input for a manually created claim right.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClaimRight {
    pub claim_type: ClaimType,
    pub description: String,
    pub total_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: Frequency,
    /// Falls back to the service default when absent.
    pub currency: Option<String>,
    pub category: Option<String>,
}

impl NewClaimRight {
    pub fn new(
        claim_type: ClaimType,
        description: impl Into<String>,
        total_amount: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: Frequency,
    ) -> Self {
        Self {
            claim_type,
            description: description.into(),
            total_amount,
            start_date,
            end_date,
            frequency,
            currency: None,
            category: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Input for a claim right derived from an existing ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerClaimRequest {
    pub ledger_entry_id: Uuid,
    /// Classified from the ledger entry's text when absent.
    pub claim_type: Option<ClaimType>,
    /// Defaults to the ledger entry date.
    pub start_date: Option<NaiveDate>,
    /// Defaults to one year after the start, inclusive.
    pub end_date: Option<NaiveDate>,
    pub frequency: Frequency,
    pub description: Option<String>,
}

impl LedgerClaimRequest {
    pub fn new(ledger_entry_id: Uuid, frequency: Frequency) -> Self {
        Self {
            ledger_entry_id,
            claim_type: None,
            start_date: None,
            end_date: None,
            frequency,
            description: None,
        }
    }
}

/// A claim right together with its schedule, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimWithSchedule {
    pub claim: ClaimRight,
    pub schedule: Vec<ScheduleEntry>,
}

impl ClaimWithSchedule {
    pub fn posted_entries(&self) -> usize {
        self.schedule
            .iter()
            .filter(|entry| entry.status == EntryStatus::Posted)
            .count()
    }

    pub fn pending_entries(&self) -> usize {
        self.schedule.len() - self.posted_entries()
    }
}

pub struct ClaimService;

impl ClaimService {
    /// Validates the request, generates the schedule and stores both in one step.
    pub fn create(
        store: &dyn ClaimStore,
        clock: &dyn Clock,
        request: NewClaimRight,
        default_currency: &str,
    ) -> Result<ClaimRight, CoreError> {
        let currency = resolve_currency(request.currency.as_deref(), default_currency)?;
        let mut claim = ClaimRight::new(
            request.claim_type,
            describe(Some(&request.description)),
            request.total_amount,
            currency,
            request.start_date,
            request.end_date,
            request.frequency,
            clock.now(),
        );
        claim.category = request.category;
        Self::persist(store, claim)
    }

    /// Derives a claim right from a ledger entry, defaulting the amount, dates,
    /// currency and category from it.
    pub fn create_from_ledger_entry(
        store: &dyn ClaimStore,
        ledger: &dyn LedgerLookup,
        clock: &dyn Clock,
        request: LedgerClaimRequest,
        default_currency: &str,
    ) -> Result<ClaimRight, CoreError> {
        let entry = ledger
            .ledger_entry(request.ledger_entry_id)?
            .ok_or(CoreError::LedgerEntryNotFound(request.ledger_entry_id))?;

        let claim_type = match request.claim_type {
            Some(claim_type) => claim_type,
            None => Classifier::classify(&entry).ok_or_else(|| {
                CoreError::Validation(format!(
                    "ledger entry {} does not look like a claim right; a claim type is required",
                    entry.id
                ))
            })?,
        };
        let start_date = request.start_date.unwrap_or(entry.date);
        let end_date = match request.end_date {
            Some(end_date) => end_date,
            None => one_year_from(start_date).ok_or_else(|| {
                CoreError::Validation(format!(
                    "no end date one year after {start_date} can be represented"
                ))
            })?,
        };
        let description = describe(
            [request.description.as_deref(), entry.description.as_deref()]
                .into_iter()
                .flatten()
                .find(|text| !text.trim().is_empty()),
        );
        let currency = resolve_currency(
            request_currency(entry.currency.as_deref()),
            default_currency,
        )?;

        let mut claim = ClaimRight::new(
            claim_type,
            description,
            entry.total,
            currency,
            start_date,
            end_date,
            request.frequency,
            clock.now(),
        );
        claim.ledger_entry_id = Some(entry.id);
        claim.category = entry.category.clone();
        Self::persist(store, claim)
    }

    pub fn get(store: &dyn ClaimStore, id: Uuid) -> Result<ClaimWithSchedule, CoreError> {
        let claim = store.claim(id)?.ok_or(CoreError::NotFound(id))?;
        let schedule = store.schedule(id)?;
        Ok(ClaimWithSchedule { claim, schedule })
    }

    pub fn list(store: &dyn ClaimStore, filter: &ClaimFilter) -> Result<Vec<ClaimRight>, CoreError> {
        store.list_claims(filter)
    }

    /// Cancels an active claim. Pending entries stay in place and are never posted.
    pub fn cancel(
        store: &dyn ClaimStore,
        clock: &dyn Clock,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<ClaimRight, CoreError> {
        let at = clock.now();
        let reason = reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty());
        let claim = store.update_claim(id, &mut |claim: &mut ClaimRight| {
            if claim.is_terminal() {
                return Err(CoreError::AlreadyTerminal {
                    id: claim.id,
                    status: claim.status,
                });
            }
            claim.mark_cancelled(at, reason.clone());
            Ok(())
        })?;
        info!(claim_right = %id, remaining = %claim.remaining_amount(), "claim right cancelled");
        Ok(claim)
    }

    /// Removes a claim and its schedule. Refused once anything has been posted,
    /// since journals reference the schedule.
    pub fn delete(store: &dyn ClaimStore, id: Uuid) -> Result<ClaimRight, CoreError> {
        let (claim, schedule) =
            store.remove_claim(id, &mut |claim: &ClaimRight, schedule: &[ScheduleEntry]| {
                if schedule.iter().any(|entry| !entry.is_pending()) {
                    return Err(CoreError::ClaimInUse(claim.id));
                }
                Ok(())
            })?;
        info!(claim_right = %id, entries = schedule.len(), "claim right deleted");
        Ok(claim)
    }

    fn persist(store: &dyn ClaimStore, claim: ClaimRight) -> Result<ClaimRight, CoreError> {
        validate(&claim)?;
        let schedule = ScheduleGenerator::generate(&claim)?;
        let periods = schedule.len();
        store.insert_claim(claim.clone(), schedule)?;
        info!(
            claim_right = %claim.id,
            claim_type = %claim.claim_type,
            total = %claim.total_amount,
            currency = %claim.currency,
            periods,
            "claim right created"
        );
        Ok(claim)
    }
}

fn request_currency(currency: Option<&str>) -> Option<&str> {
    currency.filter(|code| !code.trim().is_empty())
}

fn resolve_currency(requested: Option<&str>, default_currency: &str) -> Result<String, CoreError> {
    let code = normalize_currency(requested.unwrap_or(default_currency));
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::Validation(format!(
            "currency `{code}` is not a three-letter ISO code"
        )));
    }
    Ok(code)
}

/// Trimmed free-text description, or the generic label when blank.
fn describe(description: Option<&str>) -> String {
    description
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION)
        .to_string()
}

fn validate(claim: &ClaimRight) -> Result<(), CoreError> {
    if claim.start_date >= claim.end_date {
        return Err(CoreError::InvalidRange {
            start: claim.start_date,
            end: claim.end_date,
        });
    }
    if claim.total_amount <= Decimal::ZERO {
        return Err(CoreError::InvalidSchedule(format!(
            "total amount must be positive, got {}",
            claim.total_amount
        )));
    }
    let scale = minor_units(&claim.currency);
    if claim.total_amount.normalize().scale() > scale {
        return Err(CoreError::Validation(format!(
            "{} has more than {scale} decimal places for {}",
            claim.total_amount, claim.currency
        )));
    }
    Ok(())
}
