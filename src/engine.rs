use std::sync::Arc;

use claimright_config::{AccountSetting, AccountsConfig, Config};
use claimright_core::{
    AccountMapper, AccrualRunRequest, AccrualRunResult, AccrualService, ChartAccountMapper,
    ClaimFilter, ClaimRightsSummary, ClaimService, ClaimStore, ClaimWithSchedule, Classifier,
    Clock, CoreError, LedgerClaimRequest, LedgerLookup, MemoryClaimStore, MemoryLedger,
    NewClaimRight, SummaryService, SystemClock,
};
use claimright_domain::{
    chrono::NaiveDate, uuid::Uuid, Account, ClaimRight, ClaimStatus, ClaimType, Frequency,
    JournalEntry,
};
use claimright_storage_json::{JsonClaimStore, StoragePaths};

use crate::EngineError;

/// Facade over the claim store, the external ledger, the chart of accounts and
/// the clock. Every operation is safe to call from several threads at once.
pub struct AccrualEngine<S: ClaimStore = MemoryClaimStore> {
    store: Arc<S>,
    ledger: Arc<dyn LedgerLookup>,
    accounts: Arc<dyn AccountMapper>,
    clock: Arc<dyn Clock>,
    default_currency: String,
    default_frequency: Frequency,
}

impl AccrualEngine<MemoryClaimStore> {
    /// Engine over an empty in-memory book and ledger with the standard chart.
    pub fn in_memory() -> Self {
        Self::new(
            MemoryClaimStore::new(),
            Arc::new(MemoryLedger::new()),
            Config::default_currency_value(),
        )
    }
}

impl AccrualEngine<JsonClaimStore> {
    /// Opens the JSON book under the configured storage root and builds the
    /// chart of accounts from configuration.
    pub fn from_config(
        config: &Config,
        ledger: Arc<dyn LedgerLookup>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let default_frequency: Frequency = config.default_frequency.parse()?;
        let root = config.resolve_storage_root();
        let store = JsonClaimStore::with_retention(
            StoragePaths::under(&root),
            config.backup_retention,
        )?;

        let mut engine = Self::new(store, ledger, config.currency.clone())
            .with_accounts(Arc::new(chart_from_config(&config.accounts)));
        engine.default_frequency = default_frequency;
        Ok(engine)
    }
}

impl<S: ClaimStore> AccrualEngine<S> {
    pub fn new(store: S, ledger: Arc<dyn LedgerLookup>, default_currency: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            ledger,
            accounts: Arc::new(ChartAccountMapper::default()),
            clock: Arc::new(SystemClock),
            default_currency: default_currency.into(),
            default_frequency: Frequency::Monthly,
        }
    }

    pub fn with_accounts(mut self, accounts: Arc<dyn AccountMapper>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_default_frequency(mut self, frequency: Frequency) -> Self {
        self.default_frequency = frequency;
        self
    }

    pub fn store(&self) -> &S {
        self.store.as_ref()
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    pub fn create_claim_right(&self, request: NewClaimRight) -> Result<ClaimRight, EngineError> {
        Ok(ClaimService::create(
            self.store.as_ref(),
            self.clock.as_ref(),
            request,
            &self.default_currency,
        )?)
    }

    pub fn create_claim_right_from_ledger_entry(
        &self,
        request: LedgerClaimRequest,
    ) -> Result<ClaimRight, EngineError> {
        Ok(ClaimService::create_from_ledger_entry(
            self.store.as_ref(),
            self.ledger.as_ref(),
            self.clock.as_ref(),
            request,
            &self.default_currency,
        )?)
    }

    /// Ledger-derived request using the configured default frequency.
    pub fn ledger_claim_request(&self, ledger_entry_id: Uuid) -> LedgerClaimRequest {
        LedgerClaimRequest::new(ledger_entry_id, self.default_frequency)
    }

    /// Claim type the keyword rules suggest for a ledger entry, if any.
    pub fn suggest_claim_type(&self, ledger_entry_id: Uuid) -> Result<Option<ClaimType>, EngineError> {
        let entry = self
            .ledger
            .ledger_entry(ledger_entry_id)?
            .ok_or(CoreError::LedgerEntryNotFound(ledger_entry_id))?;
        Ok(Classifier::classify(&entry))
    }

    pub fn get_claim_right(&self, id: Uuid) -> Result<ClaimWithSchedule, EngineError> {
        Ok(ClaimService::get(self.store.as_ref(), id)?)
    }

    /// Claims newest first, optionally narrowed by type and status.
    pub fn list_claim_rights(
        &self,
        claim_type: Option<ClaimType>,
        status: Option<ClaimStatus>,
    ) -> Result<Vec<ClaimRight>, EngineError> {
        let filter = ClaimFilter { claim_type, status };
        Ok(ClaimService::list(self.store.as_ref(), &filter)?)
    }

    pub fn cancel_claim_right(
        &self,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<ClaimRight, EngineError> {
        Ok(ClaimService::cancel(
            self.store.as_ref(),
            self.clock.as_ref(),
            id,
            reason.map(str::to_string),
        )?)
    }

    pub fn delete_claim_right(&self, id: Uuid) -> Result<ClaimRight, EngineError> {
        Ok(ClaimService::delete(self.store.as_ref(), id)?)
    }

    pub fn claim_rights_summary(&self) -> Result<ClaimRightsSummary, EngineError> {
        Ok(SummaryService::summary(self.store.as_ref(), self.clock.as_ref())?)
    }

    /// Posts every pending entry due within the window. `period_end` defaults
    /// to today; a dry run reports what would be posted without storing it.
    pub fn process_accruals(
        &self,
        period_start: Option<NaiveDate>,
        period_end: Option<NaiveDate>,
        dry_run: bool,
    ) -> Result<AccrualRunResult, EngineError> {
        let request = AccrualRunRequest {
            period_start,
            period_end,
            dry_run,
        };
        Ok(AccrualService::process(
            self.store.as_ref(),
            self.accounts.as_ref(),
            self.clock.as_ref(),
            request,
        )?)
    }

    /// Journals in posting order, optionally only those of one claim.
    pub fn journals(&self, claim_id: Option<Uuid>) -> Result<Vec<JournalEntry>, EngineError> {
        Ok(self.store.journals(claim_id)?)
    }

    pub fn journal(&self, id: Uuid) -> Result<Option<JournalEntry>, EngineError> {
        Ok(self.store.journal(id)?)
    }
}

fn chart_from_config(accounts: &AccountsConfig) -> ChartAccountMapper {
    let mut chart = ChartAccountMapper::default();
    chart.prepaid_asset = account(&accounts.prepaid_asset);
    chart.deferred_revenue = account(&accounts.deferred_revenue);
    chart.default_expense = account(&accounts.default_expense);
    chart.default_revenue = account(&accounts.default_revenue);
    chart.ledger_revenue = account(&accounts.ledger_revenue);
    for (category, setting) in &accounts.category_expense {
        chart.set_category_expense(category, account(setting));
    }
    chart
}

fn account(setting: &AccountSetting) -> Account {
    Account::new(setting.code.trim(), setting.name.trim())
}
