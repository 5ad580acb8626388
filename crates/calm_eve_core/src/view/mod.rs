//! View models handed to the rendering host.
//!
//! The host draws cards and the chart; this module only decides what they
//! contain. Ordering is derived from dates, never from stored position.

use crate::model::entry::{date_key, sort_newest_first, Entry, Mood};
use chrono::{Datelike, Days, NaiveDate};
use std::collections::HashMap;

pub const RECENT_LIMIT: usize = 7;
pub const CHART_DAYS: u64 = 7;
pub const CHART_LEGEND: &str = "気分スコア（0=しんどい, 1=ふつう, 2=よき）";

/// One card in the recent-history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentCard {
    pub date: String,
    pub emoji: &'static str,
    pub mood: String,
    pub note: String,
}

/// Seven-day mood line chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodChart {
    pub legend: &'static str,
    /// `M/D`, oldest first, ending today.
    pub labels: Vec<String>,
    /// `None` leaves a gap for a missing or unscored day.
    pub points: Vec<Option<u8>>,
    pub y_min: u8,
    pub y_max: u8,
    pub y_step: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalView {
    pub cards: Vec<RecentCard>,
    pub chart: MoodChart,
}

/// Rendering collaborator.
pub trait Renderer {
    fn render(&mut self, view: &JournalView);
}

/// Most recent `limit` entries, newest first.
pub fn recent_cards(entries: &[Entry], limit: usize) -> Vec<RecentCard> {
    let mut sorted = entries.to_vec();
    sort_newest_first(&mut sorted);
    sorted
        .into_iter()
        .take(limit)
        .map(|entry| RecentCard {
            emoji: entry.mood.emoji(),
            mood: String::from(entry.mood),
            date: entry.date,
            note: entry.note,
        })
        .collect()
}

/// Scores for the seven days ending `today`.
pub fn weekly_chart(entries: &[Entry], today: NaiveDate) -> MoodChart {
    let moods: HashMap<&str, &Mood> = entries
        .iter()
        .rev()
        .map(|entry| (entry.date.as_str(), &entry.mood))
        .collect();

    let days: Vec<NaiveDate> = (0..CHART_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect();

    MoodChart {
        legend: CHART_LEGEND,
        labels: days
            .iter()
            .map(|day| format!("{}/{}", day.month(), day.day()))
            .collect(),
        points: days
            .iter()
            .map(|day| {
                moods
                    .get(date_key(*day).as_str())
                    .and_then(|mood| mood.score())
            })
            .collect(),
        y_min: 0,
        y_max: 2,
        y_step: 1,
    }
}

pub fn journal_view(entries: &[Entry], today: NaiveDate) -> JournalView {
    JournalView {
        cards: recent_cards(entries, RECENT_LIMIT),
        chart: weekly_chart(entries, today),
    }
}
