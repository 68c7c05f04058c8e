use chrono::NaiveDate;
use uuid::Uuid;

use claimright_domain::{ClaimBook, ClaimRight, ClaimStatus, ClaimType, JournalEntry, ScheduleEntry};

use crate::CoreError;

/// Optional narrowing for [`ClaimStore::list_claims`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClaimFilter {
    pub claim_type: Option<ClaimType>,
    pub status: Option<ClaimStatus>,
}

impl ClaimFilter {
    pub fn matches(&self, claim: &ClaimRight) -> bool {
        self.claim_type.map_or(true, |kind| claim.claim_type == kind)
            && self.status.map_or(true, |status| claim.status == status)
    }
}

/// A pending schedule entry together with a snapshot of its parent claim.
#[derive(Debug, Clone, PartialEq)]
pub struct DueEntry {
    pub claim: ClaimRight,
    pub entry: ScheduleEntry,
}

/// Mutation applied to a claim under the store's write lock.
pub type ClaimMutation<'a> = &'a mut dyn FnMut(&mut ClaimRight) -> Result<(), CoreError>;

/// Posting applied to a claim and one of its entries under the store's write lock.
/// Returns the journal to persist alongside the state change.
pub type EntryPosting<'a> =
    &'a mut dyn FnMut(&mut ClaimRight, &mut ScheduleEntry) -> Result<JournalEntry, CoreError>;

/// Check run against a claim and its schedule before it is removed.
pub type RemovalGuard<'a> = &'a mut dyn FnMut(&ClaimRight, &[ScheduleEntry]) -> Result<(), CoreError>;

/// Abstraction over persistence backends for claim rights, their schedules and journals.
///
/// Every mutating method is one atomic unit: either the whole change is
/// observable afterwards or none of it is.
pub trait ClaimStore: Send + Sync {
    /// Persists a claim together with its complete schedule.
    fn insert_claim(&self, claim: ClaimRight, schedule: Vec<ScheduleEntry>) -> Result<(), CoreError>;
    fn claim(&self, id: Uuid) -> Result<Option<ClaimRight>, CoreError>;
    /// Schedule entries of a claim, ordered by period number.
    fn schedule(&self, claim_id: Uuid) -> Result<Vec<ScheduleEntry>, CoreError>;
    /// Claims matching `filter`, newest first.
    fn list_claims(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRight>, CoreError>;
    /// Pending entries of active claims whose `period_end` lies in `[from, to]`,
    /// ordered by claim id then period number.
    fn due_entries(&self, from: Option<NaiveDate>, to: NaiveDate) -> Result<Vec<DueEntry>, CoreError>;
    fn update_claim(&self, id: Uuid, mutation: ClaimMutation<'_>) -> Result<ClaimRight, CoreError>;
    /// Runs `posting` against the stored claim and entry, then commits the
    /// returned journal together with both mutations.
    fn post_entry(
        &self,
        claim_id: Uuid,
        entry_id: Uuid,
        posting: EntryPosting<'_>,
    ) -> Result<JournalEntry, CoreError>;
    fn remove_claim(
        &self,
        id: Uuid,
        guard: RemovalGuard<'_>,
    ) -> Result<(ClaimRight, Vec<ScheduleEntry>), CoreError>;
    fn journal(&self, id: Uuid) -> Result<Option<JournalEntry>, CoreError>;
    /// Journals in posting order, optionally restricted to one claim.
    fn journals(&self, claim_id: Option<Uuid>) -> Result<Vec<JournalEntry>, CoreError>;
    /// A consistent copy of everything in the store.
    fn snapshot(&self) -> Result<ClaimBook, CoreError>;
}
