use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::{
    AccrualRunRequest, AccrualService, ChartAccountMapper, ClaimFilter, ClaimService, ClaimStore,
    CoreError, ErrorKind, FixedClock, LedgerClaimRequest, MemoryClaimStore, MemoryLedger,
    NewClaimRight, PostingService, ScheduleGenerator, SummaryService,
};
use claimright_domain::{
    ClaimBook, ClaimRight, ClaimStatus, ClaimType, EntryStatus, Frequency, LedgerEntryRef,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Fixture {
    store: MemoryClaimStore,
    clock: FixedClock,
    accounts: ChartAccountMapper,
}

impl Fixture {
    fn new(today: NaiveDate) -> Self {
        Self {
            store: MemoryClaimStore::new(),
            clock: FixedClock::on(today),
            accounts: ChartAccountMapper::default(),
        }
    }

    fn create(&self, request: NewClaimRight) -> Result<ClaimRight, CoreError> {
        ClaimService::create(&self.store, &self.clock, request, "USD")
    }

    fn annual_licence(&self) -> ClaimRight {
        self.create(NewClaimRight::new(
            ClaimType::AssetClaim,
            "Annual software licence",
            dec!(1200.00),
            date(2024, 1, 1),
            date(2024, 12, 31),
            Frequency::Monthly,
        ))
        .expect("create claim")
    }

    fn run(&self, request: AccrualRunRequest) -> crate::AccrualRunResult {
        AccrualService::process(&self.store, &self.accounts, &self.clock, request).expect("run")
    }
}

#[test]
fn schedule_splits_evenly_when_divisible() {
    let fixture = Fixture::new(date(2024, 1, 1));
    let claim = fixture.annual_licence();
    let schedule = fixture.store.schedule(claim.id).unwrap();

    assert_eq!(schedule.len(), 12);
    assert!(schedule.iter().all(|entry| entry.amount == dec!(100.00)));
    assert!(schedule.iter().all(|entry| entry.status == EntryStatus::Pending));
    assert_eq!(schedule[0].period_start, date(2024, 1, 1));
    assert_eq!(schedule[1].period_start, date(2024, 2, 1));
    assert_eq!(schedule[1].period_end, date(2024, 2, 29));
    assert_eq!(schedule[11].period_end, date(2024, 12, 31));
}

#[test]
fn schedule_remainder_lands_on_last_entry() {
    let fixture = Fixture::new(date(2024, 1, 1));
    let claim = fixture
        .create(NewClaimRight::new(
            ClaimType::LiabilityClaim,
            "Quarterly retainer",
            dec!(100.00),
            date(2024, 1, 1),
            date(2024, 3, 31),
            Frequency::Monthly,
        ))
        .unwrap();
    let amounts: Vec<Decimal> = fixture
        .store
        .schedule(claim.id)
        .unwrap()
        .iter()
        .map(|entry| entry.amount)
        .collect();
    assert_eq!(amounts, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
}

#[test]
fn yearly_schedule_over_thirteen_months_has_short_final_period() {
    let fixture = Fixture::new(date(2024, 1, 1));
    let claim = fixture
        .create(NewClaimRight::new(
            ClaimType::AssetClaim,
            "Maintenance contract",
            dec!(1300.00),
            date(2024, 1, 1),
            date(2025, 1, 31),
            Frequency::Yearly,
        ))
        .unwrap();
    let schedule = fixture.store.schedule(claim.id).unwrap();
    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule[0].period_end, date(2024, 12, 31));
    assert_eq!(schedule[1].period_start, date(2025, 1, 1));
    assert_eq!(schedule[1].period_end, date(2025, 1, 31));
    assert_eq!(schedule[0].amount + schedule[1].amount, dec!(1300.00));
}

#[test]
fn schedule_uses_currency_minor_units() {
    let fixture = Fixture::new(date(2024, 1, 1));
    let claim = fixture
        .create(
            NewClaimRight::new(
                ClaimType::AssetClaim,
                "Office lease",
                dec!(1000),
                date(2024, 1, 1),
                date(2024, 3, 31),
                Frequency::Monthly,
            )
            .with_currency("jpy"),
        )
        .unwrap();
    assert_eq!(claim.currency, "JPY");
    let amounts: Vec<Decimal> = fixture
        .store
        .schedule(claim.id)
        .unwrap()
        .iter()
        .map(|entry| entry.amount)
        .collect();
    assert_eq!(amounts, vec![dec!(333), dec!(333), dec!(334)]);
}

#[test]
fn create_rejects_invalid_input_without_storing() {
    let fixture = Fixture::new(date(2024, 1, 1));
    let base = NewClaimRight::new(
        ClaimType::AssetClaim,
        "Bad claim",
        dec!(100.00),
        date(2024, 6, 1),
        date(2024, 6, 1),
        Frequency::Monthly,
    );
    assert!(matches!(
        fixture.create(base.clone()),
        Err(CoreError::InvalidRange { .. })
    ));

    let mut zero = base.clone();
    zero.end_date = date(2024, 12, 31);
    zero.total_amount = Decimal::ZERO;
    assert!(matches!(fixture.create(zero), Err(CoreError::InvalidSchedule(_))));

    let mut tiny = base.clone();
    tiny.end_date = date(2024, 12, 31);
    tiny.total_amount = dec!(0.05);
    assert!(matches!(fixture.create(tiny), Err(CoreError::InvalidSchedule(_))));

    let mut precise = base;
    precise.end_date = date(2024, 12, 31);
    precise.total_amount = dec!(100.005);
    let err = fixture.create(precise).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(fixture.store.list_claims(&ClaimFilter::default()).unwrap().is_empty());
}

#[test]
fn generator_verification_detects_tampered_schedule() {
    let fixture = Fixture::new(date(2024, 1, 1));
    let claim = fixture.annual_licence();
    let mut schedule = fixture.store.schedule(claim.id).unwrap();
    schedule[3].amount += dec!(0.01);
    assert!(matches!(
        ScheduleGenerator::verify(&claim, &schedule),
        Err(CoreError::Integrity(_))
    ));
}

#[test]
fn ledger_entry_defaults_amount_dates_and_category() {
    let fixture = Fixture::new(date(2024, 3, 1));
    let ledger = MemoryLedger::new();
    let mut entry = LedgerEntryRef::new(date(2024, 2, 15), dec!(2400.00));
    entry.description = Some("Annual subscription - design tools".into());
    entry.category = Some("Software/Technology".into());
    entry.currency = Some("eur".into());
    let entry_id = ledger.insert(entry).unwrap();

    let claim = ClaimService::create_from_ledger_entry(
        &fixture.store,
        &ledger,
        &fixture.clock,
        LedgerClaimRequest::new(entry_id, Frequency::Monthly),
        "USD",
    )
    .expect("derived claim");

    assert_eq!(claim.claim_type, ClaimType::AssetClaim);
    assert_eq!(claim.total_amount, dec!(2400.00));
    assert_eq!(claim.start_date, date(2024, 2, 15));
    assert_eq!(claim.end_date, date(2025, 2, 14));
    assert_eq!(claim.currency, "EUR");
    assert_eq!(claim.ledger_entry_id, Some(entry_id));
    assert_eq!(fixture.store.schedule(claim.id).unwrap().len(), 12);

    let result = fixture.run(AccrualRunRequest::through(date(2024, 3, 14)));
    assert_eq!(result.entries_processed, 1);
    assert_eq!(result.processed[0].lines[0].account_code, "5910");
}

#[test]
fn ledger_entry_errors_are_typed() {
    let fixture = Fixture::new(date(2024, 3, 1));
    let ledger = MemoryLedger::new();
    let missing = ClaimService::create_from_ledger_entry(
        &fixture.store,
        &ledger,
        &fixture.clock,
        LedgerClaimRequest::new(Uuid::new_v4(), Frequency::Monthly),
        "USD",
    );
    assert!(matches!(missing, Err(CoreError::LedgerEntryNotFound(_))));

    let mut groceries = LedgerEntryRef::new(date(2024, 2, 1), dec!(80.00));
    groceries.description = Some("Groceries".into());
    let entry_id = ledger.insert(groceries).unwrap();
    let unclassified = ClaimService::create_from_ledger_entry(
        &fixture.store,
        &ledger,
        &fixture.clock,
        LedgerClaimRequest::new(entry_id, Frequency::Monthly),
        "USD",
    );
    assert!(matches!(unclassified, Err(CoreError::Validation(_))));
}

#[test]
fn run_through_march_posts_three_entries() {
    let fixture = Fixture::new(date(2024, 6, 30));
    let claim = fixture.annual_licence();

    let result = fixture.run(AccrualRunRequest::through(date(2024, 3, 31)));
    assert!(result.is_clean(), "{:?}", result.errors);
    assert_eq!(result.entries_processed, 3);
    assert_eq!(result.total_amount, dec!(300.00));
    assert_eq!(result.asset_claims, 3);
    assert_eq!(result.liability_claims, 0);
    assert_eq!(result.totals_by_currency.get("USD"), Some(&dec!(300.00)));

    let stored = fixture.store.claim(claim.id).unwrap().unwrap();
    assert_eq!(stored.amortized_amount, dec!(300.00));
    assert_eq!(stored.remaining_amount(), dec!(900.00));
    assert_eq!(stored.status, ClaimStatus::Active);
    assert_eq!(stored.last_posted_period, 3);

    let journals = fixture.store.journals(Some(claim.id)).unwrap();
    assert_eq!(journals.len(), 3);
    assert!(journals.iter().all(|journal| journal.is_balanced()));
    assert_eq!(journals[0].reference, format!("AMORT-{}-1", claim.id));
    assert_eq!(journals[0].entry_date, date(2024, 1, 1));
    assert!(journals[0].is_adjusting);
}

#[test]
fn rerunning_the_same_range_posts_nothing_new() {
    let fixture = Fixture::new(date(2024, 6, 30));
    fixture.annual_licence();

    let first = fixture.run(AccrualRunRequest::through(date(2024, 3, 31)));
    let second = fixture.run(AccrualRunRequest::through(date(2024, 3, 31)));
    assert_eq!(first.entries_processed, 3);
    assert_eq!(second.entries_processed, 0);
    assert!(second.is_clean());
    assert_eq!(fixture.store.journals(None).unwrap().len(), 3);
}

#[test]
fn posting_an_already_posted_entry_is_rejected() {
    let fixture = Fixture::new(date(2024, 6, 30));
    let claim = fixture.annual_licence();
    let entry = fixture.store.schedule(claim.id).unwrap()[0].clone();

    PostingService::post(&fixture.store, &fixture.accounts, &fixture.clock, claim.id, entry.id)
        .expect("first post");
    let again =
        PostingService::post(&fixture.store, &fixture.accounts, &fixture.clock, claim.id, entry.id);
    assert!(matches!(again, Err(CoreError::AlreadyPosted { .. })));
    assert_eq!(fixture.store.journals(None).unwrap().len(), 1);
}

#[test]
fn periods_post_in_order() {
    let fixture = Fixture::new(date(2024, 6, 30));
    let claim = fixture.annual_licence();
    let third = fixture.store.schedule(claim.id).unwrap()[2].clone();

    let result =
        PostingService::post(&fixture.store, &fixture.accounts, &fixture.clock, claim.id, third.id);
    assert!(matches!(
        result,
        Err(CoreError::OutOfOrder {
            period_number: 3,
            expected: 1,
            ..
        })
    ));
}

#[test]
fn dry_run_leaves_store_untouched() {
    let fixture = Fixture::new(date(2024, 6, 30));
    let claim = fixture.annual_licence();
    let before = fixture.store.snapshot().unwrap();

    let result = fixture.run(AccrualRunRequest::through(date(2024, 5, 31)).dry_run());
    assert!(result.dry_run);
    assert_eq!(result.entries_processed, 5);
    assert_eq!(result.total_amount, dec!(500.00));
    assert!(result.processed.iter().all(|entry| entry.journal_id.is_none()));
    assert!(result.processed.iter().all(|entry| entry.lines.len() == 2));

    let after = fixture.store.snapshot().unwrap();
    assert_eq!(before.claims, after.claims);
    assert_eq!(before.schedules, after.schedules);
    assert!(after.journals.is_empty());
    assert_eq!(
        fixture.store.claim(claim.id).unwrap().unwrap().amortized_amount,
        Decimal::ZERO
    );
}

#[test]
fn final_posting_completes_claim() {
    let fixture = Fixture::new(date(2025, 1, 31));
    let claim = fixture
        .create(NewClaimRight::new(
            ClaimType::LiabilityClaim,
            "Prepaid consulting hours",
            dec!(100.00),
            date(2024, 1, 1),
            date(2024, 3, 31),
            Frequency::Monthly,
        ))
        .unwrap();

    let result = fixture.run(AccrualRunRequest::default());
    assert_eq!(result.entries_processed, 3);
    assert_eq!(result.liability_claims, 3);

    let stored = fixture.store.claim(claim.id).unwrap().unwrap();
    assert_eq!(stored.status, ClaimStatus::Completed);
    assert_eq!(stored.amortized_amount, stored.total_amount);
    assert!(stored.completed_at.is_some());

    let journal = &fixture.store.journals(Some(claim.id)).unwrap()[0];
    assert_eq!(journal.lines[0].account_code, "2400");
    assert_eq!(journal.lines[1].account_code, "4100");
}

#[test]
fn cancelled_claim_keeps_pending_entries_forever() {
    let fixture = Fixture::new(date(2025, 6, 30));
    let claim = fixture.annual_licence();
    fixture.run(AccrualRunRequest::through(date(2024, 5, 31)));

    let cancelled = ClaimService::cancel(
        &fixture.store,
        &fixture.clock,
        claim.id,
        Some("contract terminated".into()),
    )
    .expect("cancel");
    assert_eq!(cancelled.status, ClaimStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("contract terminated"));
    assert!(cancelled.cancellation_date.is_some());

    let result = fixture.run(AccrualRunRequest::default());
    assert_eq!(result.entries_processed, 0);

    let view = ClaimService::get(&fixture.store, claim.id).unwrap();
    assert_eq!(view.claim.status, ClaimStatus::Cancelled);
    assert_eq!(view.posted_entries(), 5);
    assert_eq!(view.pending_entries(), 7);

    let again = ClaimService::cancel(&fixture.store, &fixture.clock, claim.id, None);
    assert!(matches!(again, Err(CoreError::AlreadyTerminal { .. })));
}

#[test]
fn cancel_and_get_report_missing_claims() {
    let fixture = Fixture::new(date(2024, 1, 1));
    let id = Uuid::new_v4();
    assert!(matches!(
        ClaimService::cancel(&fixture.store, &fixture.clock, id, None),
        Err(CoreError::NotFound(_))
    ));
    assert!(matches!(
        ClaimService::get(&fixture.store, id),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn delete_is_blocked_once_anything_posted() {
    let fixture = Fixture::new(date(2024, 6, 30));
    let untouched = fixture.annual_licence();
    let posted = fixture.annual_licence();
    let first = fixture.store.schedule(posted.id).unwrap()[0].clone();
    PostingService::post(&fixture.store, &fixture.accounts, &fixture.clock, posted.id, first.id)
        .unwrap();

    ClaimService::delete(&fixture.store, untouched.id).expect("delete untouched");
    assert!(fixture.store.claim(untouched.id).unwrap().is_none());
    assert!(fixture.store.schedule(untouched.id).unwrap().is_empty());

    assert!(matches!(
        ClaimService::delete(&fixture.store, posted.id),
        Err(CoreError::ClaimInUse(_))
    ));
}

#[test]
fn list_filters_and_orders_newest_first() {
    let fixture = Fixture::new(date(2024, 1, 1));
    let older = fixture.annual_licence();
    fixture.clock.set_date(date(2024, 2, 1));
    let newer = fixture
        .create(NewClaimRight::new(
            ClaimType::LiabilityClaim,
            "Customer deposit",
            dec!(600.00),
            date(2024, 1, 1),
            date(2024, 6, 30),
            Frequency::Monthly,
        ))
        .unwrap();

    let all = ClaimService::list(&fixture.store, &ClaimFilter::default()).unwrap();
    assert_eq!(
        all.iter().map(|claim| claim.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );

    let assets = ClaimService::list(
        &fixture.store,
        &ClaimFilter {
            claim_type: Some(ClaimType::AssetClaim),
            status: None,
        },
    )
    .unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].id, older.id);

    let cancelled = ClaimService::list(
        &fixture.store,
        &ClaimFilter {
            claim_type: None,
            status: Some(ClaimStatus::Cancelled),
        },
    )
    .unwrap();
    assert!(cancelled.is_empty());
}

#[test]
fn summary_aggregates_active_claims() {
    let fixture = Fixture::new(date(2024, 2, 15));
    fixture.annual_licence();
    fixture
        .create(NewClaimRight::new(
            ClaimType::LiabilityClaim,
            "Advance payment",
            dec!(600.00),
            date(2024, 3, 1),
            date(2024, 8, 31),
            Frequency::Monthly,
        ))
        .unwrap();
    let cancelled = fixture.annual_licence();
    ClaimService::cancel(&fixture.store, &fixture.clock, cancelled.id, None).unwrap();

    fixture.run(AccrualRunRequest::through(date(2024, 1, 31)));

    let summary = SummaryService::summary(&fixture.store, &fixture.clock).unwrap();
    assert_eq!(summary.total_claims, 2);
    assert_eq!(summary.asset_claims, 1);
    assert_eq!(summary.liability_claims, 1);
    assert_eq!(summary.total_asset_amount, dec!(1200.00));
    assert_eq!(summary.total_liability_amount, dec!(600.00));
    assert_eq!(summary.remaining_asset_amount, dec!(1100.00));
    assert_eq!(summary.remaining_liability_amount, dec!(600.00));
    assert_eq!(summary.pending_accruals, 0);

    fixture.clock.set_date(date(2024, 3, 31));
    let later = SummaryService::summary(&fixture.store, &fixture.clock).unwrap();
    assert_eq!(later.pending_accruals, 2);
}

#[test]
fn run_rejects_inverted_range() {
    let fixture = Fixture::new(date(2024, 6, 30));
    let result = AccrualService::process(
        &fixture.store,
        &fixture.accounts,
        &fixture.clock,
        AccrualRunRequest {
            period_start: Some(date(2024, 5, 1)),
            period_end: Some(date(2024, 4, 1)),
            dry_run: false,
        },
    );
    assert!(matches!(result, Err(CoreError::InvalidRange { .. })));
}

#[test]
fn lower_bound_skips_earlier_periods() {
    let fixture = Fixture::new(date(2024, 6, 30));
    fixture.annual_licence();
    let result = fixture.run(AccrualRunRequest {
        period_start: Some(date(2024, 2, 1)),
        period_end: Some(date(2024, 3, 31)),
        dry_run: true,
    });
    // January lies outside the range, so February cannot post ahead of it.
    assert_eq!(result.entries_processed, 0);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().all(|error| error.kind == ErrorKind::State));
}

#[test]
fn concurrent_runs_never_double_post() {
    let store = Arc::new(MemoryClaimStore::new());
    let clock = Arc::new(FixedClock::on(date(2025, 1, 31)));
    let accounts = Arc::new(ChartAccountMapper::default());
    for _ in 0..4 {
        ClaimService::create(
            store.as_ref(),
            clock.as_ref(),
            NewClaimRight::new(
                ClaimType::AssetClaim,
                "Insurance premium",
                dec!(1200.00),
                date(2024, 1, 1),
                date(2024, 12, 31),
                Frequency::Monthly,
            ),
            "USD",
        )
        .unwrap();
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let clock = Arc::clone(&clock);
            let accounts = Arc::clone(&accounts);
            thread::spawn(move || {
                AccrualService::process(
                    store.as_ref(),
                    accounts.as_ref(),
                    clock.as_ref(),
                    AccrualRunRequest::default(),
                )
                .expect("run")
            })
        })
        .collect();
    let processed: usize = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread").entries_processed)
        .sum();

    assert_eq!(processed, 48);
    assert_eq!(store.journals(None).unwrap().len(), 48);
    let claims = store.list_claims(&ClaimFilter::default()).unwrap();
    assert!(claims
        .iter()
        .all(|claim| claim.status == ClaimStatus::Completed && claim.amortized_amount == dec!(1200.00)));
}

#[test]
fn failing_entry_is_recorded_while_other_claims_post() {
    let fixture = Fixture::new(date(2024, 3, 31));
    let broken = fixture.annual_licence();
    let healthy = fixture.annual_licence();
    fixture
        .store
        .update_claim(broken.id, &mut |claim: &mut ClaimRight| {
            claim.amortized_amount = dec!(1150.00);
            Ok(())
        })
        .unwrap();

    let result = fixture.run(AccrualRunRequest::default());

    assert_eq!(result.entries_processed, 3);
    assert_eq!(result.total_amount, dec!(300.00));
    assert!(result.processed.iter().all(|entry| entry.claim_right_id == healthy.id));
    assert!(!result.is_clean());
    assert_eq!(result.errors.len(), 3);
    assert!(result.errors.iter().all(|error| error.claim_right_id == broken.id));
    let first = result
        .errors
        .iter()
        .find(|error| error.period_number == 1)
        .expect("period 1 error");
    assert_eq!(first.kind, ErrorKind::Integrity);
    assert!(result
        .errors
        .iter()
        .filter(|error| error.period_number > 1)
        .all(|error| error.kind == ErrorKind::State));

    let broken_schedule = fixture.store.schedule(broken.id).unwrap();
    assert!(broken_schedule.iter().all(|entry| entry.is_pending()));
    assert!(fixture.store.journals(Some(broken.id)).unwrap().is_empty());
    assert_eq!(fixture.store.journals(Some(healthy.id)).unwrap().len(), 3);
    assert_eq!(
        fixture.store.claim(broken.id).unwrap().unwrap().amortized_amount,
        dec!(1150.00)
    );
}

#[test]
fn storage_failure_aborts_run_without_partial_posting() {
    let commits = Arc::new(AtomicUsize::new(0));
    let counter = commits.clone();
    // Commit 1 creates the claim, 2 and 3 post January and February.
    let store = MemoryClaimStore::new().with_commit_hook(Box::new(move |_: &ClaimBook| {
        if counter.fetch_add(1, Ordering::SeqCst) >= 3 {
            return Err(CoreError::Storage("disk full".into()));
        }
        Ok(())
    }));
    let fixture = Fixture {
        store,
        clock: FixedClock::on(date(2024, 3, 31)),
        accounts: ChartAccountMapper::default(),
    };
    let claim = fixture.annual_licence();

    let err = AccrualService::process(
        &fixture.store,
        &fixture.accounts,
        &fixture.clock,
        AccrualRunRequest::default(),
    )
    .expect_err("storage failure must abort the run");
    assert!(matches!(err, CoreError::Storage(_)));
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    assert_eq!(commits.load(Ordering::SeqCst), 4);

    let schedule = fixture.store.schedule(claim.id).unwrap();
    assert_eq!(schedule[0].status, EntryStatus::Posted);
    assert_eq!(schedule[1].status, EntryStatus::Posted);
    assert_eq!(schedule[2].status, EntryStatus::Pending);
    assert!(schedule[2].posted_journal_entry_id.is_none());
    assert_eq!(fixture.store.journals(Some(claim.id)).unwrap().len(), 2);

    let stored = fixture.store.claim(claim.id).unwrap().unwrap();
    assert_eq!(stored.amortized_amount, dec!(200.00));
    assert_eq!(stored.last_posted_period, 2);
}

#[test]
fn blank_description_gets_the_default_label() {
    let fixture = Fixture::new(date(2024, 1, 1));
    let claim = fixture
        .create(NewClaimRight::new(
            ClaimType::AssetClaim,
            "   ",
            dec!(1200.00),
            date(2024, 1, 1),
            date(2024, 12, 31),
            Frequency::Monthly,
        ))
        .expect("blank description is accepted");
    assert_eq!(claim.description, crate::DEFAULT_DESCRIPTION);

    let ledger = MemoryLedger::new();
    let entry_id = ledger
        .insert(LedgerEntryRef::new(date(2024, 1, 1), dec!(600.00)))
        .unwrap();
    let mut request = LedgerClaimRequest::new(entry_id, Frequency::Monthly);
    request.claim_type = Some(ClaimType::LiabilityClaim);
    let derived =
        ClaimService::create_from_ledger_entry(&fixture.store, &ledger, &fixture.clock, request, "USD")
            .expect("derived claim");
    assert_eq!(derived.description, "Long-term transaction");
    assert_eq!(derived.end_date, date(2024, 12, 31));
}
