//! Backup export and restore.
//!
//! # Responsibility
//! - Serialize the entry list as a pretty-printed JSON backup file.
//! - Restore a backup by full replace or by per-date merge.
//!
//! # Invariants
//! - A failed import never writes to storage.
//! - Merge results hold one entry per date, sorted by date descending.
//! - Every user-facing failure maps to one generic notice.

use crate::clock::Clock;
use crate::model::entry::{date_key, Entry, Mood};
use crate::repo::entry_repo::EntryRepository;
use crate::storage::StorageError;
use chrono::NaiveDate;
use log::{error, info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const RESTORE_FAILED_NOTICE: &str = "JSONの形式が正しくありませんでした。";
pub const RESTORE_DONE_NOTICE: &str = "復元が完了しました！";
pub const BACKUP_MEDIA_TYPE: &str = "application/json";

pub type BackupResult<T> = Result<T, BackupError>;

#[derive(Debug)]
pub enum BackupError {
    /// Payload is not JSON, not an array, or holds non-entry records.
    Format(String),
    Storage(StorageError),
}

impl BackupError {
    /// The one notice shown to the user for any restore failure.
    pub fn user_notice(&self) -> &'static str {
        RESTORE_FAILED_NOTICE
    }
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(details) => write!(f, "invalid backup format: {details}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for BackupError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// How restored records combine with the current list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreMode {
    Replace,
    Merge,
}

impl RestoreMode {
    /// Reads the user's answer to the restore-mode prompt.
    ///
    /// `None` or a blank answer cancels the restore; `replace` in any case
    /// selects replace; every other answer merges.
    pub fn from_prompt(answer: Option<&str>) -> Option<Self> {
        let answer = answer.map(str::trim).filter(|value| !value.is_empty())?;
        if answer.eq_ignore_ascii_case("replace") {
            Some(Self::Replace)
        } else {
            Some(Self::Merge)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Merge => "merge",
        }
    }
}

/// Downloadable backup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub mode: RestoreMode,
    /// Records in the backup file.
    pub incoming: usize,
    /// Entries stored after the restore.
    pub stored: usize,
}

/// `calm-eve-backup-YYYY-MM-DD.json`
pub fn backup_file_name(today: NaiveDate) -> String {
    format!("calm-eve-backup-{}.json", date_key(today))
}

/// Parses a backup payload; the top level must be an array.
pub fn parse_snapshot(bytes: &[u8]) -> BackupResult<Vec<Value>> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(_) => Err(BackupError::Format("top level is not an array".to_string())),
        Err(err) => Err(BackupError::Format(err.to_string())),
    }
}

/// Turns every record into an entry; any non-entry record fails the import.
pub fn replace_entries(incoming: Vec<Value>) -> BackupResult<Vec<Entry>> {
    serde_json::from_value(Value::Array(incoming))
        .map_err(|err| BackupError::Format(format!("record is not an entry: {err}")))
}

/// Overlays `incoming` on `current` by date; incoming wins on collision.
///
/// A record without a date is ignored. A dated record without a mood
/// overlays its date and is then filtered out with it.
pub fn merge_entries(current: &[Entry], incoming: &[Value]) -> Vec<Entry> {
    let mut by_date: BTreeMap<String, Option<Entry>> = current
        .iter()
        .map(|entry| (entry.date.clone(), Some(entry.clone())))
        .collect();

    for (date, record) in incoming.iter().filter_map(merge_candidate) {
        by_date.insert(date, record);
    }

    by_date
        .into_iter()
        .rev()
        .filter(|(date, _)| !date.is_empty())
        .filter_map(|(_, entry)| entry)
        .filter(|entry| !entry.mood.as_str().is_empty())
        .collect()
}

fn merge_candidate(record: &Value) -> Option<(String, Option<Entry>)> {
    let date = record.get("date")?.as_str()?.to_string();
    let mood = record
        .get("mood")
        .and_then(Value::as_str)
        .filter(|mood| !mood.is_empty());
    let entry = mood.map(|mood| Entry {
        date: date.clone(),
        mood: Mood::from(mood),
        note: record
            .get("note")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    });
    Some((date, entry))
}

/// Restore computed against the current list, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub entries: Vec<Entry>,
    pub summary: ImportSummary,
}

/// Pretty-printed JSON of `entries`, named with `today`.
pub fn snapshot_of(entries: &[Entry], today: NaiveDate) -> BackupResult<Snapshot> {
    let bytes = serde_json::to_vec_pretty(entries)
        .map_err(StorageError::from)
        .inspect_err(|err| error!("event=backup_export module=backup status=error error={err}"))?;
    info!(
        "event=backup_export module=backup status=ok count={} bytes={}",
        entries.len(),
        bytes.len()
    );
    Ok(Snapshot {
        file_name: backup_file_name(today),
        bytes,
    })
}

/// Parses `bytes` and combines the records with `current` under `mode`.
pub fn restore_with_mode(
    current: &[Entry],
    bytes: &[u8],
    mode: RestoreMode,
) -> BackupResult<Restored> {
    let records = parse_logged(bytes)?;
    combine(current, records, mode)
}

/// Parses first, then reads the restore-mode prompt answer.
///
/// Returns `Ok(None)` when the user cancels the prompt.
pub fn restore_from_prompt(
    current: &[Entry],
    bytes: &[u8],
    mode_answer: Option<&str>,
) -> BackupResult<Option<Restored>> {
    let records = parse_logged(bytes)?;
    match RestoreMode::from_prompt(mode_answer) {
        Some(mode) => combine(current, records, mode).map(Some),
        None => {
            info!("event=backup_import module=backup status=cancelled");
            Ok(None)
        }
    }
}

fn parse_logged(bytes: &[u8]) -> BackupResult<Vec<Value>> {
    parse_snapshot(bytes).inspect_err(|err| {
        warn!(
            "event=backup_import module=backup status=error error_code=format bytes={} error={err}",
            bytes.len()
        );
    })
}

fn combine(current: &[Entry], records: Vec<Value>, mode: RestoreMode) -> BackupResult<Restored> {
    let incoming = records.len();
    let entries = match mode {
        RestoreMode::Replace => replace_entries(records).inspect_err(|err| {
            warn!(
                "event=backup_import module=backup status=error error_code=format mode=replace error={err}"
            );
        })?,
        RestoreMode::Merge => merge_entries(current, &records),
    };
    info!(
        "event=backup_import module=backup status=ok mode={} incoming={} stored={}",
        mode.as_str(),
        incoming,
        entries.len()
    );
    Ok(Restored {
        summary: ImportSummary {
            mode,
            incoming,
            stored: entries.len(),
        },
        entries,
    })
}

/// Export and restore over the entry repository.
pub struct BackupCoordinator<'a> {
    entries: &'a dyn EntryRepository,
    clock: &'a dyn Clock,
}

impl<'a> BackupCoordinator<'a> {
    pub fn new(entries: &'a dyn EntryRepository, clock: &'a dyn Clock) -> Self {
        Self { entries, clock }
    }

    pub fn export_snapshot(&self) -> BackupResult<Snapshot> {
        snapshot_of(&self.entries.load()?, self.clock.today())
    }

    /// Restores `bytes` with `mode`; storage is untouched on error.
    pub fn import_snapshot(&self, bytes: &[u8], mode: RestoreMode) -> BackupResult<ImportSummary> {
        let restored = restore_with_mode(&self.entries.load()?, bytes, mode)?;
        self.store(restored)
    }

    /// Restores `bytes` with the mode the user answered.
    ///
    /// Returns `Ok(None)` when the user cancels the mode prompt.
    pub fn restore(
        &self,
        bytes: &[u8],
        mode_answer: Option<&str>,
    ) -> BackupResult<Option<ImportSummary>> {
        match restore_from_prompt(&self.entries.load()?, bytes, mode_answer)? {
            Some(restored) => self.store(restored).map(Some),
            None => Ok(None),
        }
    }

    fn store(&self, restored: Restored) -> BackupResult<ImportSummary> {
        self.entries.save(&restored.entries)?;
        Ok(restored.summary)
    }
}
