//! Theme resolution and mood background palettes.
//!
//! # Responsibility
//! - Persist the `auto | light | dark` selector.
//! - Resolve the effective theme, reading the OS signal on every call.
//! - Map the latest mood to a background colour per effective theme.
//!
//! # Invariants
//! - `Auto` is never cached as light or dark.
//! - OS scheme changes re-apply only while `Auto` is stored.

use crate::model::entry::Mood;
use crate::model::theme::{EffectiveTheme, ThemePreference};
use crate::repo::entry_repo::EntryRepository;
use crate::service::entry_store::latest_entry;
use crate::storage::{keys, KeyValueStore, StorageResult};
use log::{debug, info};

pub const LIGHT_HAPPY: &str = "#E8F5E9";
pub const LIGHT_OK: &str = "#FFFDE7";
pub const LIGHT_LOW: &str = "#E3F2FD";
pub const LIGHT_FALLBACK: &str = "#FAF9F6";

pub const DARK_HAPPY: &str = "#203026";
pub const DARK_OK: &str = "#2A2A1D";
pub const DARK_LOW: &str = "#1B2430";
pub const DARK_FALLBACK: &str = "#111315";

/// OS-level colour scheme signal.
pub trait SystemScheme {
    fn prefers_dark(&self) -> bool;
}

/// Fixed OS signal, for hosts without a live query and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticScheme {
    pub dark: bool,
}

impl SystemScheme for StaticScheme {
    fn prefers_dark(&self) -> bool {
        self.dark
    }
}

/// What the host must change after a theme is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeApplication {
    pub preference: ThemePreference,
    pub effective: EffectiveTheme,
    /// `None` removes the theme attribute so styling follows the OS.
    pub attribute: Option<EffectiveTheme>,
    /// Recomputed only when an entry exists.
    pub background: Option<&'static str>,
}

/// Resolves `preference` against the OS signal.
pub fn resolve_effective(preference: ThemePreference, prefers_dark: bool) -> EffectiveTheme {
    match preference.pinned() {
        Some(theme) => theme,
        None if prefers_dark => EffectiveTheme::Dark,
        None => EffectiveTheme::Light,
    }
}

/// Background colour for `mood` under `theme`.
pub fn color_for(mood: Option<&Mood>, theme: EffectiveTheme) -> &'static str {
    match (theme, mood) {
        (EffectiveTheme::Light, Some(Mood::Happy)) => LIGHT_HAPPY,
        (EffectiveTheme::Light, Some(Mood::Ok)) => LIGHT_OK,
        (EffectiveTheme::Light, Some(Mood::Low)) => LIGHT_LOW,
        (EffectiveTheme::Light, _) => LIGHT_FALLBACK,
        (EffectiveTheme::Dark, Some(Mood::Happy)) => DARK_HAPPY,
        (EffectiveTheme::Dark, Some(Mood::Ok)) => DARK_OK,
        (EffectiveTheme::Dark, Some(Mood::Low)) => DARK_LOW,
        (EffectiveTheme::Dark, _) => DARK_FALLBACK,
    }
}

/// Builds the host-facing result of applying `preference`.
pub fn theme_application(
    preference: ThemePreference,
    prefers_dark: bool,
    latest_mood: Option<&Mood>,
) -> ThemeApplication {
    let effective = resolve_effective(preference, prefers_dark);
    ThemeApplication {
        preference,
        effective,
        attribute: preference.pinned(),
        background: latest_mood.map(|mood| color_for(Some(mood), effective)),
    }
}

/// Theme selector bound to storage, the entry list and the OS signal.
pub struct ThemeResolver<'a, S: SystemScheme> {
    store: &'a dyn KeyValueStore,
    entries: &'a dyn EntryRepository,
    system: S,
}

impl<'a, S: SystemScheme> ThemeResolver<'a, S> {
    pub fn new(store: &'a dyn KeyValueStore, entries: &'a dyn EntryRepository, system: S) -> Self {
        Self {
            store,
            entries,
            system,
        }
    }

    /// Stored preference; `Auto` when unset.
    pub fn preference(&self) -> StorageResult<ThemePreference> {
        stored_preference(self.store)
    }

    pub fn resolve_effective(&self) -> StorageResult<EffectiveTheme> {
        Ok(resolve_effective(
            self.preference()?,
            self.system.prefers_dark(),
        ))
    }

    /// Background for `mood` under the current effective theme.
    pub fn background_for(&self, mood: Option<&Mood>) -> StorageResult<&'static str> {
        Ok(color_for(mood, self.resolve_effective()?))
    }

    /// Persists `preference` and recomputes the attribute and background.
    pub fn apply(&self, preference: ThemePreference) -> StorageResult<ThemeApplication> {
        let latest = self.latest_mood()?;
        self.persist(theme_application(
            preference,
            self.system.prefers_dark(),
            latest.as_ref(),
        ))
    }

    /// Handles an OS scheme-change notification.
    ///
    /// Returns `None` when the user has pinned a theme.
    pub fn on_system_scheme_changed(&self) -> StorageResult<Option<ThemeApplication>> {
        let latest = self.latest_mood()?;
        match scheme_change_application(
            self.preference()?,
            self.system.prefers_dark(),
            latest.as_ref(),
        ) {
            Some(application) => self.persist(application).map(Some),
            None => Ok(None),
        }
    }

    fn latest_mood(&self) -> StorageResult<Option<Mood>> {
        let entries = self.entries.load()?;
        Ok(latest_entry(&entries).map(|entry| entry.mood.clone()))
    }

    fn persist(&self, application: ThemeApplication) -> StorageResult<ThemeApplication> {
        self.store.set(keys::THEME, application.preference.as_str())?;
        info!(
            "event=theme_apply module=theme status=ok preference={} effective={}",
            application.preference.as_str(),
            application.effective.as_str()
        );
        Ok(application)
    }
}

/// Stored preference; unset or unknown values read as `Auto`.
pub fn stored_preference(store: &dyn KeyValueStore) -> StorageResult<ThemePreference> {
    let stored = store.get(keys::THEME)?;
    Ok(ThemePreference::from_stored(stored.as_deref()))
}

/// Re-applies `Auto` after the OS scheme changed.
///
/// Returns `None` when `preference` pins a theme.
pub fn scheme_change_application(
    preference: ThemePreference,
    prefers_dark: bool,
    latest_mood: Option<&Mood>,
) -> Option<ThemeApplication> {
    if let Some(pinned) = preference.pinned() {
        debug!(
            "event=theme_os_change module=theme status=skipped preference={}",
            pinned.as_str()
        );
        return None;
    }
    Some(theme_application(preference, prefers_dark, latest_mood))
}
