//! claimright-storage-json
//!
//! Durable [`ClaimStore`] that keeps the whole claim book in one JSON file.
//! Every committed mutation rewrites the file through a temporary sibling and a
//! rename, so readers never observe a half-written book.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use claimright_core::{
    storage::{ClaimMutation, EntryPosting, RemovalGuard},
    ClaimFilter, ClaimStore, CoreError, DueEntry, MemoryClaimStore,
};
use claimright_domain::{ClaimBook, ClaimRight, JournalEntry, ScheduleEntry, CURRENT_SCHEMA_VERSION};

const BOOK_FILE: &str = "claims";
const BACKUP_DIR: &str = "backups";
const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%6f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Where the claim book and its backups live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub book_path: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<root>/claims.json` with backups under `<root>/backups`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            book_path: root.join(format!("{BOOK_FILE}.{FILE_EXTENSION}")),
            backup_root: root.join(BACKUP_DIR),
        }
    }
}

/// Describes a persisted backup of the claim book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub path: PathBuf,
}

/// JSON-file persistence for the claim book.
pub struct JsonClaimStore {
    inner: MemoryClaimStore,
    paths: StoragePaths,
    retention: usize,
}

impl JsonClaimStore {
    /// Opens (or creates) the book under `root` with the default retention.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, CoreError> {
        Self::with_retention(StoragePaths::under(root), DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.backup_root)?;
        let book = if paths.book_path.exists() {
            load_book_from_path(&paths.book_path)?
        } else {
            let book = ClaimBook::new();
            save_book_to_path(&book, &paths.book_path)?;
            book
        };
        info!(
            path = %paths.book_path.display(),
            claims = book.claim_count(),
            entries = book.entry_count(),
            "claim book opened"
        );

        let target = paths.book_path.clone();
        let inner = MemoryClaimStore::from_book(book)
            .with_commit_hook(Box::new(move |book: &ClaimBook| save_book_to_path(book, &target)));
        Ok(Self {
            inner,
            paths,
            retention: retention.max(1),
        })
    }

    pub fn book_path(&self) -> &Path {
        &self.paths.book_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.paths.backup_root
    }

    /// Writes a copy of the current book into the backup directory and prunes
    /// anything beyond the retention limit.
    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        let book = self.inner.snapshot()?;
        fs::create_dir_all(&self.paths.backup_root)?;

        let label = sanitize_backup_note(note);
        let mut at = Utc::now().trunc_subsecs(6);
        let (file_name, path) = loop {
            let file_name = backup_file_name(at, label.as_deref());
            let path = self.paths.backup_root.join(&file_name);
            if !path.exists() {
                break (file_name, path);
            }
            at += Duration::microseconds(1);
        };
        save_book_to_path(&book, &path)?;
        self.prune_backups()?;
        info!(backup = %file_name, "claim book backed up");
        Ok(BackupInfo {
            id: file_name,
            created_at: Some(at),
            note: label,
            path,
        })
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.paths.backup_root.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.paths.backup_root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let (created_at, note) = parse_backup_name(file_name);
                entries.push(BackupInfo {
                    id: file_name.to_string(),
                    created_at,
                    note,
                    path: path.clone(),
                });
            }
        }
        entries.sort_by_key(|info| Reverse((info.created_at, info.id.clone())));
        Ok(entries)
    }

    /// Replaces the live book with the contents of a backup.
    pub fn restore_backup(&self, backup: &BackupInfo) -> Result<ClaimBook, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!("backup `{}` not found", backup.id)));
        }
        let book = load_book_from_path(&backup.path)?;
        self.inner.replace_book(book.clone())?;
        info!(backup = %backup.id, claims = book.claim_count(), "claim book restored");
        Ok(book)
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for stale in self.list_backups()?.into_iter().skip(self.retention) {
            debug!(backup = %stale.id, "pruning backup");
            let _ = fs::remove_file(stale.path);
        }
        Ok(())
    }
}

impl ClaimStore for JsonClaimStore {
    fn insert_claim(&self, claim: ClaimRight, schedule: Vec<ScheduleEntry>) -> Result<(), CoreError> {
        self.inner.insert_claim(claim, schedule)
    }

    fn claim(&self, id: Uuid) -> Result<Option<ClaimRight>, CoreError> {
        self.inner.claim(id)
    }

    fn schedule(&self, claim_id: Uuid) -> Result<Vec<ScheduleEntry>, CoreError> {
        self.inner.schedule(claim_id)
    }

    fn list_claims(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRight>, CoreError> {
        self.inner.list_claims(filter)
    }

    fn due_entries(&self, from: Option<NaiveDate>, to: NaiveDate) -> Result<Vec<DueEntry>, CoreError> {
        self.inner.due_entries(from, to)
    }

    fn update_claim(&self, id: Uuid, mutation: ClaimMutation<'_>) -> Result<ClaimRight, CoreError> {
        self.inner.update_claim(id, mutation)
    }

    fn post_entry(
        &self,
        claim_id: Uuid,
        entry_id: Uuid,
        posting: EntryPosting<'_>,
    ) -> Result<JournalEntry, CoreError> {
        self.inner.post_entry(claim_id, entry_id, posting)
    }

    fn remove_claim(
        &self,
        id: Uuid,
        guard: RemovalGuard<'_>,
    ) -> Result<(ClaimRight, Vec<ScheduleEntry>), CoreError> {
        self.inner.remove_claim(id, guard)
    }

    fn journal(&self, id: Uuid) -> Result<Option<JournalEntry>, CoreError> {
        self.inner.journal(id)
    }

    fn journals(&self, claim_id: Option<Uuid>) -> Result<Vec<JournalEntry>, CoreError> {
        self.inner.journals(claim_id)
    }

    fn snapshot(&self) -> Result<ClaimBook, CoreError> {
        self.inner.snapshot()
    }
}

/// Saves a claim book to an arbitrary path on disk.
pub fn save_book_to_path(book: &ClaimBook, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_book(book)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a claim book, refusing files written by a newer schema.
pub fn load_book_from_path(path: &Path) -> Result<ClaimBook, CoreError> {
    let data = fs::read_to_string(path)?;
    let book: ClaimBook =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    if book.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Storage(format!(
            "claim book `{}` uses schema version {} but at most {} is supported",
            path.display(),
            book.schema_version,
            CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(book)
}

fn backup_file_name(at: DateTime<Utc>, label: Option<&str>) -> String {
    let mut stem = format!("{}_{}", BOOK_FILE, at.format(BACKUP_TIMESTAMP_FORMAT));
    if let Some(label) = label {
        stem.push('_');
        stem.push_str(label);
    }
    format!("{stem}.{FILE_EXTENSION}")
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Splits `claims_<date>_<time>[_<note>].json` into its timestamp and note.
fn parse_backup_name(name: &str) -> (Option<DateTime<Utc>>, Option<String>) {
    let Some(stem) = name.strip_suffix(&format!(".{FILE_EXTENSION}")) else {
        return (None, None);
    };
    let mut segments = stem.splitn(4, '_');
    let (Some(_), Some(date), Some(time)) = (segments.next(), segments.next(), segments.next())
    else {
        return (None, None);
    };
    let note = segments.next().map(str::to_string);
    if !is_digits(date, 8) || !is_digits(time, 12) {
        return (None, note);
    }
    let created_at = NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S%6f")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc));
    (created_at, note)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_book(book: &ClaimBook) -> Result<String, CoreError> {
    serde_json::to_string_pretty(book).map_err(|err| CoreError::Serde(err.to_string()))
}
