use calm_eve_core::db::open_db_in_memory;
use calm_eve_core::service::backup_service::{RESTORE_DONE_NOTICE, RESTORE_FAILED_NOTICE};
use calm_eve_core::service::theme_service::DARK_HAPPY;
use calm_eve_core::storage::keys;
use calm_eve_core::{
    AppEvent, Dispatcher, EffectiveTheme, Entry, EntryRepository, FixedClock, Host,
    InstallCoordinator, InstallOutcome, InstallPrompt, JournalView, KeyValueStore,
    KvEntryRepository, MemoryKeyValueStore, Mood, Renderer, Snapshot, SqliteKeyValueStore,
    ThemePreference,
};
use chrono::NaiveDate;

#[derive(Default)]
struct RecordingHost {
    attributes: Vec<Option<EffectiveTheme>>,
    backgrounds: Vec<String>,
    messages: Vec<String>,
    alerts: Vec<String>,
    downloads: Vec<Snapshot>,
    renders: Vec<JournalView>,
    cleared_inputs: usize,
    install_hidden: bool,
    ios_tip_hidden: bool,
}

impl Renderer for RecordingHost {
    fn render(&mut self, view: &JournalView) {
        self.renders.push(view.clone());
    }
}

impl Host for RecordingHost {
    fn set_theme_attribute(&mut self, theme: Option<EffectiveTheme>) {
        self.attributes.push(theme);
    }

    fn set_background(&mut self, color: &str) {
        self.backgrounds.push(color.to_string());
    }

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn alert(&mut self, notice: &str) {
        self.alerts.push(notice.to_string());
    }

    fn offer_download(&mut self, snapshot: &Snapshot) {
        self.downloads.push(snapshot.clone());
    }

    fn clear_note_input(&mut self) {
        self.cleared_inputs += 1;
    }

    fn hide_install_button(&mut self) {
        self.install_hidden = true;
    }

    fn hide_ios_tip(&mut self) {
        self.ios_tip_hidden = true;
    }
}

fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
}

#[test]
fn startup_restores_pinned_theme_and_renders() {
    let store = MemoryKeyValueStore::with_values([(keys::THEME, "dark")]);
    let mut dispatcher = Dispatcher::new(&store, RecordingHost::default(), clock(), false).unwrap();

    dispatcher.dispatch(AppEvent::Startup).unwrap();

    let host = dispatcher.host();
    assert_eq!(host.attributes, [Some(EffectiveTheme::Dark)]);
    assert_eq!(host.renders.len(), 1);
    assert!(host.renders[0].cards.is_empty());
    assert_eq!(dispatcher.state().theme, ThemePreference::Dark);
}

#[test]
fn save_mood_writes_through_to_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    store.set(keys::THEME, "dark").unwrap();
    let mut dispatcher = Dispatcher::new(&store, RecordingHost::default(), clock(), false).unwrap();

    dispatcher
        .dispatch(AppEvent::SaveMood {
            mood: Mood::Happy,
            note: " picnic ".to_string(),
        })
        .unwrap();

    let stored = KvEntryRepository::new(&store).load().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].date, "2024-06-01");
    assert_eq!(stored[0].note, "picnic");

    let host = dispatcher.host();
    assert_eq!(host.backgrounds.first().map(String::as_str), Some(DARK_HAPPY));
    assert_eq!(host.messages.len(), 1);
    assert!(host.messages[0].starts_with("AIからひとこと："));
    assert!(host.messages[0].contains("連続1日"));
    assert_eq!(host.cleared_inputs, 1);
    assert_eq!(host.renders.last().unwrap().chart.points[6], Some(2));
}

#[test]
fn malformed_restore_alerts_and_keeps_entries() {
    let store = MemoryKeyValueStore::new();
    let mut dispatcher = Dispatcher::new(&store, RecordingHost::default(), clock(), false).unwrap();
    dispatcher
        .dispatch(AppEvent::SaveMood {
            mood: Mood::Ok,
            note: String::new(),
        })
        .unwrap();
    let before = store.get(keys::ENTRIES).unwrap();

    dispatcher
        .dispatch(AppEvent::Import {
            bytes: b"{not json".to_vec(),
            mode_answer: Some("replace".to_string()),
        })
        .unwrap();

    assert_eq!(dispatcher.host().alerts, [RESTORE_FAILED_NOTICE]);
    assert_eq!(store.get(keys::ENTRIES).unwrap(), before);
    assert_eq!(dispatcher.state().entries.len(), 1);
}

#[test]
fn merge_restore_persists_and_confirms() {
    let store = MemoryKeyValueStore::new();
    let mut dispatcher = Dispatcher::new(&store, RecordingHost::default(), clock(), false).unwrap();
    dispatcher
        .dispatch(AppEvent::SaveMood {
            mood: Mood::Low,
            note: "tired".to_string(),
        })
        .unwrap();

    dispatcher
        .dispatch(AppEvent::Import {
            bytes: br#"[{"date":"2024-05-31","mood":"happy","note":"trip"}]"#.to_vec(),
            mode_answer: Some("merge".to_string()),
        })
        .unwrap();

    let stored = KvEntryRepository::new(&store).load().unwrap();
    let dates: Vec<&str> = stored.iter().map(|entry| entry.date.as_str()).collect();
    assert_eq!(dates, ["2024-06-01", "2024-05-31"]);
    assert_eq!(dispatcher.host().alerts, [RESTORE_DONE_NOTICE]);
}

#[test]
fn export_offers_dated_download() {
    let store = MemoryKeyValueStore::new();
    let mut dispatcher = Dispatcher::new(&store, RecordingHost::default(), clock(), false).unwrap();

    dispatcher.dispatch(AppEvent::Export).unwrap();

    let downloads = &dispatcher.host().downloads;
    assert_eq!(downloads.len(), 1);
    assert_eq!(downloads[0].file_name, "calm-eve-backup-2024-06-01.json");
    assert_eq!(downloads[0].bytes, b"[]");
}

#[test]
fn installed_event_sets_flag_and_hides_prompts() {
    let store = MemoryKeyValueStore::new();
    let mut dispatcher = Dispatcher::new(&store, RecordingHost::default(), clock(), false).unwrap();

    dispatcher.dispatch(AppEvent::AppInstalled).unwrap();

    assert!(dispatcher.host().install_hidden);
    assert!(dispatcher.host().ios_tip_hidden);
    let install = InstallCoordinator::new(&store);
    assert!(install.is_installed().unwrap());
    assert!(!install.should_offer_install(false).unwrap());
}

struct AlwaysDismiss;

impl InstallPrompt for AlwaysDismiss {
    fn prompt(&mut self) -> InstallOutcome {
        InstallOutcome::Dismissed
    }
}

#[test]
fn dismissed_prompt_is_remembered_and_ios_tip_can_be_closed() {
    let store = MemoryKeyValueStore::new();
    let install = InstallCoordinator::new(&store);
    let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";

    assert_eq!(install.run_prompt(None::<AlwaysDismiss>).unwrap(), None);
    assert_eq!(
        install.run_prompt(Some(AlwaysDismiss)).unwrap(),
        Some(InstallOutcome::Dismissed)
    );
    assert!(store.flag(keys::INSTALL_DISMISSED).unwrap());
    assert!(!install.is_installed().unwrap());

    assert!(install.should_show_ios_tip(iphone, false).unwrap());
    let mut dispatcher = Dispatcher::new(&store, RecordingHost::default(), clock(), false).unwrap();
    dispatcher.dispatch(AppEvent::IosTipClosed).unwrap();
    assert!(!install.should_show_ios_tip(iphone, false).unwrap());
}

#[test]
fn save_keeps_entries_written_by_another_page() {
    let store = MemoryKeyValueStore::new();
    let mut dispatcher = Dispatcher::new(&store, RecordingHost::default(), clock(), false).unwrap();

    let other_page = KvEntryRepository::new(&store);
    other_page
        .save(&[Entry {
            date: "2024-05-31".to_string(),
            mood: Mood::Ok,
            note: "from the other tab".to_string(),
        }])
        .unwrap();

    dispatcher
        .dispatch(AppEvent::SaveMood {
            mood: Mood::Happy,
            note: String::new(),
        })
        .unwrap();

    let stored = KvEntryRepository::new(&store).load().unwrap();
    let dates: Vec<&str> = stored.iter().map(|entry| entry.date.as_str()).collect();
    assert_eq!(dates, ["2024-06-01", "2024-05-31"]);
    assert!(dispatcher.host().messages[0].contains("連続2日"));
}

#[test]
fn os_change_respects_a_theme_pinned_elsewhere() {
    let store = MemoryKeyValueStore::new();
    let mut dispatcher = Dispatcher::new(&store, RecordingHost::default(), clock(), false).unwrap();
    assert_eq!(dispatcher.state().theme, ThemePreference::Auto);

    store.set(keys::THEME, "light").unwrap();
    dispatcher
        .dispatch(AppEvent::SystemSchemeChanged { prefers_dark: true })
        .unwrap();

    assert_eq!(store.get(keys::THEME).unwrap().as_deref(), Some("light"));
    assert!(dispatcher.host().attributes.is_empty());
    assert_eq!(dispatcher.state().theme, ThemePreference::Light);
    assert_eq!(dispatcher.state().effective_theme(), EffectiveTheme::Light);
}
