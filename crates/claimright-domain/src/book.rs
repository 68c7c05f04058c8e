//! The claim book aggregate: every claim right, its schedule and the journals
//! posted from it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{claim::ClaimRight, journal::JournalEntry, schedule::ScheduleEntry};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimBook {
    pub id: Uuid,
    /// Claims in insertion order.
    #[serde(default)]
    pub claims: Vec<ClaimRight>,
    /// Schedule entries per claim id, ordered by period number.
    #[serde(default)]
    pub schedules: BTreeMap<Uuid, Vec<ScheduleEntry>>,
    #[serde(default)]
    pub journals: Vec<JournalEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "ClaimBook::schema_version_default")]
    pub schema_version: u8,
}

impl Default for ClaimBook {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBook {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            claims: Vec::new(),
            schedules: BTreeMap::new(),
            journals: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn claim(&self, id: Uuid) -> Option<&ClaimRight> {
        self.claims.iter().find(|claim| claim.id == id)
    }

    pub fn claim_mut(&mut self, id: Uuid) -> Option<&mut ClaimRight> {
        self.claims.iter_mut().find(|claim| claim.id == id)
    }

    pub fn schedule(&self, claim_id: Uuid) -> &[ScheduleEntry] {
        self.schedules
            .get(&claim_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn entry(&self, claim_id: Uuid, entry_id: Uuid) -> Option<&ScheduleEntry> {
        self.schedule(claim_id).iter().find(|entry| entry.id == entry_id)
    }

    pub fn entry_mut(&mut self, claim_id: Uuid, entry_id: Uuid) -> Option<&mut ScheduleEntry> {
        self.schedules
            .get_mut(&claim_id)?
            .iter_mut()
            .find(|entry| entry.id == entry_id)
    }

    /// Locates a schedule entry by id alone.
    pub fn find_entry(&self, entry_id: Uuid) -> Option<&ScheduleEntry> {
        self.schedules
            .values()
            .flat_map(|entries| entries.iter())
            .find(|entry| entry.id == entry_id)
    }

    /// Inserts a claim together with its complete schedule.
    pub fn insert_claim(&mut self, claim: ClaimRight, mut schedule: Vec<ScheduleEntry>) -> Uuid {
        let id = claim.id;
        schedule.sort_by_key(|entry| entry.period_number);
        self.schedules.insert(id, schedule);
        self.claims.push(claim);
        self.touch();
        id
    }

    /// Removes a claim and its schedule, returning both.
    pub fn remove_claim(&mut self, id: Uuid) -> Option<(ClaimRight, Vec<ScheduleEntry>)> {
        let index = self.claims.iter().position(|claim| claim.id == id)?;
        let claim = self.claims.remove(index);
        let schedule = self.schedules.remove(&id).unwrap_or_default();
        self.touch();
        Some((claim, schedule))
    }

    pub fn add_journal(&mut self, journal: JournalEntry) -> Uuid {
        let id = journal.id;
        self.journals.push(journal);
        self.touch();
        id
    }

    pub fn journal(&self, id: Uuid) -> Option<&JournalEntry> {
        self.journals.iter().find(|journal| journal.id == id)
    }

    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    pub fn entry_count(&self) -> usize {
        self.schedules.values().map(Vec::len).sum()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
