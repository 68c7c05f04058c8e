use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use tracing::error;
use uuid::Uuid;

use claimright_domain::{ClaimBook, ClaimRight, JournalEntry, ScheduleEntry};

use crate::{
    storage::{ClaimMutation, EntryPosting, RemovalGuard},
    ClaimFilter, ClaimStore, CoreError, DueEntry,
};

/// Callback invoked with the updated book after every mutation. An error rolls
/// the mutation back.
pub type CommitHook = Box<dyn Fn(&ClaimBook) -> Result<(), CoreError> + Send + Sync>;

/// [`ClaimStore`] holding a [`ClaimBook`] behind a lock.
///
/// Mutations are serialized by the write lock, which makes the read-check-write
/// inside [`ClaimStore::post_entry`] atomic with respect to concurrent runs.
pub struct MemoryClaimStore {
    book: RwLock<ClaimBook>,
    on_commit: Option<CommitHook>,
}

impl Default for MemoryClaimStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self::from_book(ClaimBook::new())
    }

    pub fn from_book(book: ClaimBook) -> Self {
        Self {
            book: RwLock::new(book),
            on_commit: None,
        }
    }

    /// Installs a hook that must succeed for any mutation to stick.
    pub fn with_commit_hook(mut self, hook: CommitHook) -> Self {
        self.on_commit = Some(hook);
        self
    }

    /// Swaps the whole book, e.g. after restoring a backup.
    pub fn replace_book(&self, book: ClaimBook) -> Result<(), CoreError> {
        self.transact(|current| {
            *current = book;
            Ok(())
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ClaimBook>, CoreError> {
        self.book
            .read()
            .map_err(|_| CoreError::Storage("claim book lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ClaimBook>, CoreError> {
        self.book
            .write()
            .map_err(|_| CoreError::Storage("claim book lock poisoned".into()))
    }

    /// Applies `apply` under the write lock and runs the commit hook. The book
    /// is restored to its prior state if either step fails after mutating.
    fn transact<T>(
        &self,
        apply: impl FnOnce(&mut ClaimBook) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut book = self.write()?;
        let Some(hook) = self.on_commit.as_ref() else {
            return apply(&mut *book);
        };
        let before = book.clone();
        let outcome = apply(&mut *book).and_then(|value| hook(&*book).map(|_| value));
        if let Err(err) = &outcome {
            error!(error = %err, "claim store commit failed; rolling back");
            *book = before;
        }
        outcome
    }
}

impl ClaimStore for MemoryClaimStore {
    fn insert_claim(&self, claim: ClaimRight, schedule: Vec<ScheduleEntry>) -> Result<(), CoreError> {
        self.transact(|book| {
            if book.claim(claim.id).is_some() {
                return Err(CoreError::Storage(format!(
                    "claim right {} already exists",
                    claim.id
                )));
            }
            book.insert_claim(claim, schedule);
            Ok(())
        })
    }

    fn claim(&self, id: Uuid) -> Result<Option<ClaimRight>, CoreError> {
        Ok(self.read()?.claim(id).cloned())
    }

    fn schedule(&self, claim_id: Uuid) -> Result<Vec<ScheduleEntry>, CoreError> {
        Ok(self.read()?.schedule(claim_id).to_vec())
    }

    fn list_claims(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRight>, CoreError> {
        let book = self.read()?;
        let mut claims: Vec<ClaimRight> = book
            .claims
            .iter()
            .rev()
            .filter(|claim| filter.matches(claim))
            .cloned()
            .collect();
        claims.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(claims)
    }

    fn due_entries(&self, from: Option<NaiveDate>, to: NaiveDate) -> Result<Vec<DueEntry>, CoreError> {
        let book = self.read()?;
        let mut due = Vec::new();
        for claim in book.claims.iter().filter(|claim| claim.is_active()) {
            for entry in book.schedule(claim.id) {
                let in_range = entry.period_end <= to
                    && from.map_or(true, |from| entry.period_end >= from);
                if entry.is_pending() && in_range {
                    due.push(DueEntry {
                        claim: claim.clone(),
                        entry: entry.clone(),
                    });
                }
            }
        }
        due.sort_by(|a, b| {
            a.claim
                .id
                .cmp(&b.claim.id)
                .then(a.entry.period_number.cmp(&b.entry.period_number))
        });
        Ok(due)
    }

    fn update_claim(&self, id: Uuid, mutation: ClaimMutation<'_>) -> Result<ClaimRight, CoreError> {
        self.transact(|book| {
            let mut claim = book.claim(id).cloned().ok_or(CoreError::NotFound(id))?;
            mutation(&mut claim)?;
            let stored = book.claim_mut(id).ok_or(CoreError::NotFound(id))?;
            *stored = claim.clone();
            book.touch();
            Ok(claim)
        })
    }

    fn post_entry(
        &self,
        claim_id: Uuid,
        entry_id: Uuid,
        posting: EntryPosting<'_>,
    ) -> Result<JournalEntry, CoreError> {
        self.transact(|book| {
            let mut claim = book
                .claim(claim_id)
                .cloned()
                .ok_or(CoreError::NotFound(claim_id))?;
            let mut entry = book
                .entry(claim_id, entry_id)
                .cloned()
                .ok_or(CoreError::EntryNotFound(entry_id))?;
            let journal = posting(&mut claim, &mut entry)?;

            let stored_entry = book
                .entry_mut(claim_id, entry_id)
                .ok_or(CoreError::EntryNotFound(entry_id))?;
            *stored_entry = entry;
            let stored_claim = book.claim_mut(claim_id).ok_or(CoreError::NotFound(claim_id))?;
            *stored_claim = claim;
            book.add_journal(journal.clone());
            Ok(journal)
        })
    }

    fn remove_claim(
        &self,
        id: Uuid,
        guard: RemovalGuard<'_>,
    ) -> Result<(ClaimRight, Vec<ScheduleEntry>), CoreError> {
        self.transact(|book| {
            let claim = book.claim(id).ok_or(CoreError::NotFound(id))?;
            guard(claim, book.schedule(id))?;
            book.remove_claim(id).ok_or(CoreError::NotFound(id))
        })
    }

    fn journal(&self, id: Uuid) -> Result<Option<JournalEntry>, CoreError> {
        Ok(self.read()?.journal(id).cloned())
    }

    fn journals(&self, claim_id: Option<Uuid>) -> Result<Vec<JournalEntry>, CoreError> {
        let book = self.read()?;
        Ok(book
            .journals
            .iter()
            .filter(|journal| claim_id.map_or(true, |id| journal.claim_right_id() == Some(id)))
            .cloned()
            .collect())
    }

    fn snapshot(&self) -> Result<ClaimBook, CoreError> {
        Ok(self.read()?.clone())
    }
}
