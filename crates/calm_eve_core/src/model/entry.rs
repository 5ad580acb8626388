//! Daily mood entry.
//!
//! # Invariants
//! - `date` is the unique key, formatted `YYYY-MM-DD`; zero padding makes
//!   lexicographic order equal calendar order.
//! - Unknown mood strings are kept verbatim and carry no score.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Formats `date` as an entry key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses an entry key back into a calendar date.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Recorded mood. Serialized as its lowercase name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mood {
    Happy,
    Ok,
    Low,
    /// Any other value found in storage or a backup file.
    Other(String),
}

impl Mood {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Happy => "happy",
            Self::Ok => "ok",
            Self::Low => "low",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Chart score: `low -> 0`, `ok -> 1`, `happy -> 2`, otherwise `None`.
    pub fn score(&self) -> Option<u8> {
        match self {
            Self::Low => Some(0),
            Self::Ok => Some(1),
            Self::Happy => Some(2),
            Self::Other(_) => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Happy => "😄",
            Self::Ok => "😐",
            Self::Low | Self::Other(_) => "😞",
        }
    }
}

impl From<&str> for Mood {
    fn from(value: &str) -> Self {
        match value {
            "happy" => Self::Happy,
            "ok" => Self::Ok,
            "low" => Self::Low,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Mood {
    fn from(value: String) -> Self {
        match value.as_str() {
            "happy" | "ok" | "low" => Self::from(value.as_str()),
            _ => Self::Other(value),
        }
    }
}

impl From<Mood> for String {
    fn from(value: Mood) -> Self {
        match value {
            Mood::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day's journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub date: String,
    pub mood: Mood,
    /// Missing or `null` in stored data reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
}

impl Entry {
    pub fn new(date: NaiveDate, mood: Mood, note: impl Into<String>) -> Self {
        Self {
            date: date_key(date),
            mood,
            note: note.into(),
        }
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_date_key(&self.date)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sorts `entries` most recent first by date key.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::{date_key, parse_date_key, sort_newest_first, Entry, Mood};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn unknown_mood_survives_round_trip() {
        let entry: Entry =
            serde_json::from_value(json!({"date": "2024-03-01", "mood": "meh"})).unwrap();
        assert_eq!(entry.mood, Mood::Other("meh".to_string()));
        assert_eq!(entry.mood.score(), None);
        assert_eq!(entry.note, "");

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["mood"], "meh");
    }

    #[test]
    fn null_note_reads_as_empty() {
        let entry: Entry =
            serde_json::from_value(json!({"date": "2024-03-01", "mood": "ok", "note": null}))
                .unwrap();
        assert_eq!(entry.note, "");
        assert_eq!(entry.mood, Mood::Ok);
    }

    #[test]
    fn date_keys_are_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(date_key(date), "2024-01-05");
        assert_eq!(parse_date_key("2024-01-05"), Some(date));
        assert_eq!(parse_date_key("2024-1-5x"), None);
    }

    #[test]
    fn sort_newest_first_orders_by_date_key() {
        let mut entries = vec![
            Entry::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), Mood::Ok, ""),
            Entry::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), Mood::Low, ""),
            Entry::new(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), Mood::Happy, ""),
        ];
        sort_newest_first(&mut entries);
        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-10", "2024-01-02", "2023-12-31"]);
    }
}
