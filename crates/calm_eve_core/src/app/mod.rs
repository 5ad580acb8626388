//! Page-side event handling.
//!
//! # Responsibility
//! - Turn UI, OS and lifecycle events into state plus a list of effects.
//! - Execute effects against storage and the host page in one place.
//!
//! # Invariants
//! - `handle_event` is pure; only the [`Dispatcher`] touches storage or host.
//! - A failed restore produces one generic alert and no storage effect.

mod dispatcher;

pub use dispatcher::{Dispatcher, Host};

use crate::model::entry::{Entry, Mood};
use crate::model::theme::{EffectiveTheme, ThemePreference};
use crate::service::backup_service::{
    restore_from_prompt, snapshot_of, Snapshot, RESTORE_DONE_NOTICE,
};
use crate::service::entry_store::{latest_entry, record_today};
use crate::service::theme_service::{
    color_for, resolve_effective, scheme_change_application, theme_application, ThemeApplication,
};
use crate::storage::keys;
use crate::view::{journal_view, JournalView};
use chrono::NaiveDate;

/// Page state the handlers read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub entries: Vec<Entry>,
    pub theme: ThemePreference,
    pub prefers_dark: bool,
    pub today: NaiveDate,
}

impl AppState {
    pub fn effective_theme(&self) -> EffectiveTheme {
        resolve_effective(self.theme, self.prefers_dark)
    }

    fn latest_mood(&self) -> Option<&Mood> {
        latest_entry(&self.entries).map(|entry| &entry.mood)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Startup,
    SaveMood { mood: Mood, note: String },
    SelectTheme(ThemePreference),
    SystemSchemeChanged { prefers_dark: bool },
    /// A backup file was read; `mode_answer` is the restore-mode prompt reply.
    Import {
        bytes: Vec<u8>,
        mode_answer: Option<String>,
    },
    Export,
    AppInstalled,
    IosTipClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SaveEntries(Vec<Entry>),
    SaveTheme(ThemePreference),
    SetFlag(&'static str),
    /// `None` removes the attribute so styling follows the OS.
    SetThemeAttribute(Option<EffectiveTheme>),
    SetBackground(&'static str),
    ShowMessage(String),
    Alert(&'static str),
    Download(Snapshot),
    ClearNoteInput,
    HideInstallButton,
    HideIosTip,
    Render(JournalView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

/// Computes the next state and the effects for `event`.
pub fn handle_event(state: &AppState, event: AppEvent) -> Transition {
    let mut next = state.clone();
    let effects = match event {
        AppEvent::Startup => {
            let mut effects = theme_effects(&next);
            effects.extend(render_effects(&next));
            effects
        }
        AppEvent::SaveMood { mood, note } => save_mood(&mut next, mood, &note),
        AppEvent::SelectTheme(preference) => {
            next.theme = preference;
            let mut effects = vec![Effect::SaveTheme(preference)];
            effects.extend(theme_effects(&next));
            effects
        }
        AppEvent::SystemSchemeChanged { prefers_dark } => {
            next.prefers_dark = prefers_dark;
            match scheme_change_application(next.theme, prefers_dark, next.latest_mood()) {
                Some(application) => {
                    let mut effects = vec![Effect::SaveTheme(application.preference)];
                    effects.extend(application_effects(application));
                    effects
                }
                None => Vec::new(),
            }
        }
        AppEvent::Import { bytes, mode_answer } => {
            import(&mut next, &bytes, mode_answer.as_deref())
        }
        AppEvent::Export => export(&next),
        AppEvent::AppInstalled => vec![
            Effect::SetFlag(keys::INSTALLED),
            Effect::HideInstallButton,
            Effect::HideIosTip,
        ],
        AppEvent::IosTipClosed => vec![
            Effect::HideIosTip,
            Effect::SetFlag(keys::IOS_TIP_DISMISSED),
        ],
    };

    Transition {
        state: next,
        effects,
    }
}

fn save_mood(state: &mut AppState, mood: Mood, note: &str) -> Vec<Effect> {
    let (entries, outcome) =
        record_today(std::mem::take(&mut state.entries), state.today, mood, note);
    state.entries = entries;

    let mut effects = vec![
        Effect::SaveEntries(state.entries.clone()),
        Effect::SetBackground(color_for(
            Some(&outcome.entry.mood),
            state.effective_theme(),
        )),
        Effect::ShowMessage(outcome.message()),
        Effect::ClearNoteInput,
    ];
    effects.extend(render_effects(state));
    effects
}

fn import(state: &mut AppState, bytes: &[u8], mode_answer: Option<&str>) -> Vec<Effect> {
    match restore_from_prompt(&state.entries, bytes, mode_answer) {
        Ok(Some(restored)) => {
            state.entries = restored.entries;
            let mut effects = vec![Effect::SaveEntries(state.entries.clone())];
            effects.extend(render_effects(state));
            effects.push(Effect::Alert(RESTORE_DONE_NOTICE));
            effects
        }
        Ok(None) => Vec::new(),
        Err(err) => vec![Effect::Alert(err.user_notice())],
    }
}

fn export(state: &AppState) -> Vec<Effect> {
    snapshot_of(&state.entries, state.today)
        .map(Effect::Download)
        .into_iter()
        .collect()
}

fn theme_effects(state: &AppState) -> Vec<Effect> {
    application_effects(theme_application(
        state.theme,
        state.prefers_dark,
        state.latest_mood(),
    ))
}

fn application_effects(application: ThemeApplication) -> Vec<Effect> {
    let mut effects = vec![Effect::SetThemeAttribute(application.attribute)];
    effects.extend(application.background.map(Effect::SetBackground));
    effects
}

fn render_effects(state: &AppState) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if let Some(mood) = state.latest_mood() {
        effects.push(Effect::SetBackground(color_for(
            Some(mood),
            state.effective_theme(),
        )));
    }
    effects.push(Effect::Render(journal_view(&state.entries, state.today)));
    effects
}
