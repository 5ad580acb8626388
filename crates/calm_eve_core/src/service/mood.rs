//! Mood scoring and encouragement rules.

use crate::model::entry::Mood;
use once_cell::sync::Lazy;
use regex::Regex;

pub const HAPPY_MESSAGE: &str = "いい流れ🌸 そのまま自分にやさしく！";
pub const OK_MESSAGE: &str = "淡々と進む日も大事。深呼吸して1%だけ前へ。";
pub const REST_MESSAGE: &str = "おつかれさま。水を一口→ゆっくり3呼吸してね。";
pub const GENTLE_MESSAGE: &str = "つらいね…今日は「がんばらない」をがんばる時間。";

static FATIGUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)疲|眠|tired|sleepy|exhausted").expect("valid fatigue regex")
});

/// Chart score for `mood`; unknown moods are not a data point.
pub fn score_for(mood: &Mood) -> Option<u8> {
    mood.score()
}

/// Picks the encouragement shown after saving.
///
/// Mood checks run before the note is inspected, so `happy` and `ok` ignore
/// note content.
pub fn encouragement_for(mood: &Mood, note: &str) -> &'static str {
    match mood {
        Mood::Happy => HAPPY_MESSAGE,
        Mood::Ok => OK_MESSAGE,
        Mood::Low | Mood::Other(_) if FATIGUE_RE.is_match(note) => REST_MESSAGE,
        Mood::Low | Mood::Other(_) => GENTLE_MESSAGE,
    }
}
