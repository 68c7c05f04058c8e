//! Batch accrual runs: select every due schedule entry and post it.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use claimright_domain::{ClaimRight, ClaimType, JournalLine};

use crate::{AccountMapper, ClaimStore, Clock, CoreError, DueEntry, ErrorKind, PostingService};

/// Date bounds and mode of one accrual run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccrualRunRequest {
    /// No lower bound when absent.
    pub period_start: Option<NaiveDate>,
    /// Defaults to the clock's today.
    pub period_end: Option<NaiveDate>,
    /// Compute what would be posted without changing anything.
    pub dry_run: bool,
}

impl AccrualRunRequest {
    pub fn through(period_end: NaiveDate) -> Self {
        Self {
            period_end: Some(period_end),
            ..Self::default()
        }
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// An entry the run attempted but could not post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryError {
    pub entry_id: Uuid,
    pub claim_right_id: Uuid,
    pub period_number: u32,
    pub kind: ErrorKind,
    pub message: String,
}

/// An entry the run posted, or would post in a dry run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedEntry {
    pub claim_right_id: Uuid,
    pub entry_id: Uuid,
    pub period_number: u32,
    pub claim_type: ClaimType,
    pub amount: Decimal,
    pub currency: String,
    /// Absent in dry runs.
    pub journal_id: Option<Uuid>,
    pub lines: Vec<JournalLine>,
}

/// Report of one accrual run. Callers must check `errors` to know whether every
/// due entry was posted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccrualRunResult {
    pub period_start: Option<NaiveDate>,
    pub period_end: NaiveDate,
    pub dry_run: bool,
    pub entries_processed: usize,
    /// Sum over all processed entries regardless of currency.
    pub total_amount: Decimal,
    pub totals_by_currency: BTreeMap<String, Decimal>,
    /// Processed entries belonging to asset claims.
    pub asset_claims: usize,
    /// Processed entries belonging to liability claims.
    pub liability_claims: usize,
    pub errors: Vec<EntryError>,
    pub processed: Vec<ProcessedEntry>,
}

impl AccrualRunResult {
    fn new(period_start: Option<NaiveDate>, period_end: NaiveDate, dry_run: bool) -> Self {
        Self {
            period_start,
            period_end,
            dry_run,
            entries_processed: 0,
            total_amount: Decimal::ZERO,
            totals_by_currency: BTreeMap::new(),
            asset_claims: 0,
            liability_claims: 0,
            errors: Vec::new(),
            processed: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, processed: ProcessedEntry) {
        self.entries_processed += 1;
        self.total_amount += processed.amount;
        *self
            .totals_by_currency
            .entry(processed.currency.clone())
            .or_insert(Decimal::ZERO) += processed.amount;
        match processed.claim_type {
            ClaimType::AssetClaim => self.asset_claims += 1,
            ClaimType::LiabilityClaim => self.liability_claims += 1,
        }
        self.processed.push(processed);
    }

    fn record_error(&mut self, due: &DueEntry, err: &CoreError) {
        warn!(
            claim_right = %due.claim.id,
            entry = %due.entry.id,
            period = due.entry.period_number,
            error = %err,
            "accrual entry failed"
        );
        self.errors.push(EntryError {
            entry_id: due.entry.id,
            claim_right_id: due.claim.id,
            period_number: due.entry.period_number,
            kind: err.kind(),
            message: err.to_string(),
        });
    }
}

pub struct AccrualService;

impl AccrualService {
    /// Posts every pending entry of an active claim whose period ends within the
    /// requested range, in claim id then period order.
    ///
    /// Per-entry failures are collected in the result; only infrastructure
    /// errors abort the run.
    pub fn process(
        store: &dyn ClaimStore,
        accounts: &dyn AccountMapper,
        clock: &dyn Clock,
        request: AccrualRunRequest,
    ) -> Result<AccrualRunResult, CoreError> {
        let period_end = request.period_end.unwrap_or_else(|| clock.today());
        if let Some(start) = request.period_start {
            if start > period_end {
                return Err(CoreError::InvalidRange {
                    start,
                    end: period_end,
                });
            }
        }

        let due = store.due_entries(request.period_start, period_end)?;
        let mut result = AccrualRunResult::new(request.period_start, period_end, request.dry_run);
        if request.dry_run {
            Self::simulate(&due, accounts, clock, &mut result);
        } else {
            Self::post_all(store, accounts, clock, &due, &mut result)?;
        }

        info!(
            dry_run = request.dry_run,
            period_end = %period_end,
            due = due.len(),
            processed = result.entries_processed,
            errors = result.errors.len(),
            total = %result.total_amount,
            "accrual run finished"
        );
        Ok(result)
    }

    fn post_all(
        store: &dyn ClaimStore,
        accounts: &dyn AccountMapper,
        clock: &dyn Clock,
        due: &[DueEntry],
        result: &mut AccrualRunResult,
    ) -> Result<(), CoreError> {
        for item in due {
            match PostingService::post(store, accounts, clock, item.claim.id, item.entry.id) {
                Ok(journal) => result.record(ProcessedEntry {
                    claim_right_id: item.claim.id,
                    entry_id: item.entry.id,
                    period_number: item.entry.period_number,
                    claim_type: item.claim.claim_type,
                    amount: item.entry.amount,
                    currency: journal.currency.clone(),
                    journal_id: Some(journal.id),
                    lines: journal.lines,
                }),
                Err(err) if err.is_entry_level() => result.record_error(item, &err),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Replays the posting rules against private copies of each claim so later
    /// periods see the effect of earlier ones.
    fn simulate(
        due: &[DueEntry],
        accounts: &dyn AccountMapper,
        clock: &dyn Clock,
        result: &mut AccrualRunResult,
    ) {
        let at = clock.now();
        let mut claims: HashMap<Uuid, ClaimRight> = HashMap::new();
        for item in due {
            let mut claim = claims
                .get(&item.claim.id)
                .cloned()
                .unwrap_or_else(|| item.claim.clone());
            let mut entry = item.entry.clone();
            match PostingService::apply(&mut claim, &mut entry, accounts, at) {
                Ok(journal) => {
                    result.record(ProcessedEntry {
                        claim_right_id: claim.id,
                        entry_id: entry.id,
                        period_number: entry.period_number,
                        claim_type: claim.claim_type,
                        amount: entry.amount,
                        currency: journal.currency,
                        journal_id: None,
                        lines: journal.lines,
                    });
                    claims.insert(claim.id, claim);
                }
                Err(err) => result.record_error(item, &err),
            }
        }
    }
}
