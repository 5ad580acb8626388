//! Entry store: today's upsert, streaks and the latest entry.
//!
//! # Invariants
//! - One entry per date after every upsert.
//! - Order-dependent reads sort by date instead of trusting stored order.

use crate::clock::Clock;
use crate::model::entry::{date_key, Entry, Mood};
use crate::repo::entry_repo::EntryRepository;
use crate::service::mood::encouragement_for;
use crate::storage::StorageResult;
use chrono::{Days, NaiveDate};
use log::info;
use std::collections::HashSet;

/// Result of saving today's mood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub entry: Entry,
    pub streak: u32,
    pub encouragement: &'static str,
}

impl SaveOutcome {
    /// User-facing confirmation line.
    pub fn message(&self) -> String {
        format!(
            "AIからひとこと：{} / 連続{}日📅",
            self.encouragement, self.streak
        )
    }
}

/// Entry use-cases over a repository and a clock.
pub struct EntryStore<R: EntryRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: EntryRepository, C: Clock> EntryStore<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Full stored list; empty when nothing valid is stored.
    pub fn load(&self) -> StorageResult<Vec<Entry>> {
        self.repo.load()
    }

    /// Replaces the stored list verbatim.
    pub fn save(&self, entries: &[Entry]) -> StorageResult<()> {
        self.repo.save(entries)
    }

    /// Records today's mood, replacing any entry already stored for today.
    ///
    /// The note is trimmed before it is stored.
    pub fn upsert_today(&self, mood: Mood, note: &str) -> StorageResult<Vec<Entry>> {
        self.save_today_with(mood, note).map(|(entries, _)| entries)
    }

    /// Upserts today's entry and derives the streak and encouragement.
    pub fn save_today(&self, mood: Mood, note: &str) -> StorageResult<SaveOutcome> {
        self.save_today_with(mood, note).map(|(_, outcome)| outcome)
    }

    /// Consecutive days with an entry, counting back from today.
    pub fn streak(&self) -> StorageResult<u32> {
        Ok(compute_streak(&self.repo.load()?, self.clock.today()))
    }

    /// Entry with the greatest date.
    pub fn latest(&self) -> StorageResult<Option<Entry>> {
        Ok(latest_entry(&self.repo.load()?).cloned())
    }

    fn save_today_with(
        &self,
        mood: Mood,
        note: &str,
    ) -> StorageResult<(Vec<Entry>, SaveOutcome)> {
        let (next, outcome) = record_today(self.repo.load()?, self.clock.today(), mood, note);
        self.repo.save(&next)?;
        info!(
            "event=entry_upsert module=entry_store status=ok total={}",
            next.len()
        );
        Ok((next, outcome))
    }
}

/// Upserts today's entry into the current list.
///
/// Returns the next list together with what the user is told. The note is
/// trimmed first, so the encouragement sees the stored text.
pub fn record_today(
    entries: Vec<Entry>,
    today: NaiveDate,
    mood: Mood,
    note: &str,
) -> (Vec<Entry>, SaveOutcome) {
    let entry = Entry::new(today, mood, note.trim());
    let next = upsert_entry(entries, entry.clone());
    let outcome = SaveOutcome {
        encouragement: encouragement_for(&entry.mood, &entry.note),
        streak: compute_streak(&next, today),
        entry,
    };
    (next, outcome)
}

/// Drops any entry sharing `entry.date` and puts `entry` first.
pub fn upsert_entry(entries: Vec<Entry>, entry: Entry) -> Vec<Entry> {
    let mut next = Vec::with_capacity(entries.len() + 1);
    let date = entry.date.clone();
    next.push(entry);
    next.extend(entries.into_iter().filter(|existing| existing.date != date));
    next
}

/// Counts back one day at a time from `today` until a date has no entry.
pub fn compute_streak(entries: &[Entry], today: NaiveDate) -> u32 {
    let dates: HashSet<&str> = entries.iter().map(|entry| entry.date.as_str()).collect();
    let mut count = 0;
    let mut day = Some(today);
    while let Some(current) = day {
        if !dates.contains(date_key(current).as_str()) {
            break;
        }
        count += 1;
        day = current.checked_sub_days(Days::new(1));
    }
    count
}

/// Entry with the greatest date key.
pub fn latest_entry(entries: &[Entry]) -> Option<&Entry> {
    entries.iter().max_by(|a, b| a.date.cmp(&b.date))
}
