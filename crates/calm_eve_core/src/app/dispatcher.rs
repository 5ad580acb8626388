use super::{handle_event, AppEvent, AppState, Effect};
use crate::clock::Clock;
use crate::model::theme::EffectiveTheme;
use crate::repo::entry_repo::{EntryRepository, KvEntryRepository};
use crate::service::backup_service::Snapshot;
use crate::service::theme_service::stored_preference;
use crate::storage::{keys, KeyValueStore, StorageResult};
use crate::view::Renderer;
use log::debug;

/// Page-side surface the dispatcher drives.
pub trait Host: Renderer {
    fn set_theme_attribute(&mut self, theme: Option<EffectiveTheme>);
    fn set_background(&mut self, color: &str);
    fn show_message(&mut self, message: &str);
    /// Modal notice; the only channel for user-facing failures.
    fn alert(&mut self, notice: &str);
    fn offer_download(&mut self, snapshot: &Snapshot);
    fn clear_note_input(&mut self);
    fn hide_install_button(&mut self);
    fn hide_ios_tip(&mut self);
}

/// Runs events through [`handle_event`] and executes the effects.
pub struct Dispatcher<'a, H: Host, C: Clock> {
    store: &'a dyn KeyValueStore,
    host: H,
    clock: C,
    state: AppState,
}

impl<'a, H: Host, C: Clock> Dispatcher<'a, H, C> {
    /// Loads the persisted entries and theme preference.
    pub fn new(
        store: &'a dyn KeyValueStore,
        host: H,
        clock: C,
        prefers_dark: bool,
    ) -> StorageResult<Self> {
        let state = AppState {
            entries: KvEntryRepository::new(store).load()?,
            theme: stored_preference(store)?,
            prefers_dark,
            today: clock.today(),
        };
        Ok(Self {
            store,
            host,
            clock,
            state,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Handles one event to completion.
    ///
    /// Entries and the theme preference are re-read first, so writes made
    /// by another page since the last event are seen. State advances only
    /// after every effect ran.
    pub fn dispatch(&mut self, event: AppEvent) -> StorageResult<()> {
        self.refresh()?;
        let transition = handle_event(&self.state, event);
        for effect in &transition.effects {
            self.execute(effect)?;
        }
        debug!(
            "event=dispatch module=app status=ok effects={}",
            transition.effects.len()
        );
        self.state = transition.state;
        Ok(())
    }

    fn refresh(&mut self) -> StorageResult<()> {
        self.state.entries = KvEntryRepository::new(self.store).load()?;
        self.state.theme = stored_preference(self.store)?;
        self.state.today = self.clock.today();
        Ok(())
    }

    fn execute(&mut self, effect: &Effect) -> StorageResult<()> {
        match effect {
            Effect::SaveEntries(entries) => KvEntryRepository::new(self.store).save(entries)?,
            Effect::SaveTheme(preference) => self.store.set(keys::THEME, preference.as_str())?,
            Effect::SetFlag(key) => self.store.set_flag(key)?,
            Effect::SetThemeAttribute(theme) => self.host.set_theme_attribute(*theme),
            Effect::SetBackground(color) => self.host.set_background(color),
            Effect::ShowMessage(message) => self.host.show_message(message),
            Effect::Alert(notice) => self.host.alert(notice),
            Effect::Download(snapshot) => self.host.offer_download(snapshot),
            Effect::ClearNoteInput => self.host.clear_note_input(),
            Effect::HideInstallButton => self.host.hide_install_button(),
            Effect::HideIosTip => self.host.hide_ios_tip(),
            Effect::Render(view) => self.host.render(view),
        }
        Ok(())
    }
}
