//! Home-screen install prompt and the iOS install tip.
//!
//! The platform owns the prompt; this coordinator only decides visibility
//! and records what the user chose. A dismissed prompt rolls nothing back.

use crate::storage::{keys, KeyValueStore, StorageResult};
use log::info;

/// User's answer to the platform install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl InstallOutcome {
    /// Maps the platform's outcome string; only `accepted` is acceptance.
    pub fn from_platform(value: &str) -> Self {
        if value == "accepted" {
            Self::Accepted
        } else {
            Self::Dismissed
        }
    }
}

/// Deferred platform install prompt.
pub trait InstallPrompt {
    /// Shows the prompt and waits for the user's choice.
    fn prompt(&mut self) -> InstallOutcome;
}

/// Records install state under the persisted flags.
pub struct InstallCoordinator<'store> {
    store: &'store dyn KeyValueStore,
}

impl<'store> InstallCoordinator<'store> {
    pub fn new(store: &'store dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn is_installed(&self) -> StorageResult<bool> {
        self.store.flag(keys::INSTALLED)
    }

    /// Install button visibility when the platform offers a prompt.
    pub fn should_offer_install(&self, standalone: bool) -> StorageResult<bool> {
        Ok(!standalone && !self.is_installed()?)
    }

    /// Runs the deferred prompt once, recording a dismissal.
    ///
    /// Returns `None` when no prompt was deferred.
    pub fn run_prompt<P: InstallPrompt>(
        &self,
        prompt: Option<P>,
    ) -> StorageResult<Option<InstallOutcome>> {
        let Some(mut prompt) = prompt else {
            return Ok(None);
        };
        let outcome = prompt.prompt();
        if outcome != InstallOutcome::Accepted {
            self.store.set_flag(keys::INSTALL_DISMISSED)?;
        }
        info!("event=install_prompt module=install status=ok outcome={outcome:?}");
        Ok(Some(outcome))
    }

    pub fn mark_installed(&self) -> StorageResult<()> {
        self.store.set_flag(keys::INSTALLED)
    }

    /// iOS Safari gets a manual "add to home screen" tip instead of a prompt.
    pub fn should_show_ios_tip(&self, user_agent: &str, standalone: bool) -> StorageResult<bool> {
        if !is_ios(user_agent) || standalone {
            return Ok(false);
        }
        Ok(!self.store.flag(keys::IOS_TIP_DISMISSED)? && !self.is_installed()?)
    }

    pub fn dismiss_ios_tip(&self) -> StorageResult<()> {
        self.store.set_flag(keys::IOS_TIP_DISMISSED)
    }
}

fn is_ios(user_agent: &str) -> bool {
    let agent = user_agent.to_ascii_lowercase();
    ["iphone", "ipad", "ipod"]
        .iter()
        .any(|device| agent.contains(device))
}

#[cfg(test)]
mod tests {
    use super::{InstallCoordinator, InstallOutcome, InstallPrompt};
    use crate::storage::{keys, KeyValueStore, MemoryKeyValueStore};

    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
    const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0";

    struct ScriptedPrompt {
        outcome: InstallOutcome,
        shown: usize,
    }

    impl InstallPrompt for &mut ScriptedPrompt {
        fn prompt(&mut self) -> InstallOutcome {
            self.shown += 1;
            self.outcome
        }
    }

    #[test]
    fn platform_outcome_strings_map_to_outcomes() {
        assert_eq!(InstallOutcome::from_platform("accepted"), InstallOutcome::Accepted);
        assert_eq!(InstallOutcome::from_platform("dismissed"), InstallOutcome::Dismissed);
    }

    #[test]
    fn dismissal_is_recorded_and_acceptance_is_not() {
        let store = MemoryKeyValueStore::new();
        let coordinator = InstallCoordinator::new(&store);

        let mut accept = ScriptedPrompt {
            outcome: InstallOutcome::Accepted,
            shown: 0,
        };
        let outcome = coordinator.run_prompt(Some(&mut accept)).unwrap();
        assert_eq!(outcome, Some(InstallOutcome::Accepted));
        assert_eq!(accept.shown, 1);
        assert!(!store.flag(keys::INSTALL_DISMISSED).unwrap());

        let mut dismiss = ScriptedPrompt {
            outcome: InstallOutcome::Dismissed,
            shown: 0,
        };
        coordinator.run_prompt(Some(&mut dismiss)).unwrap();
        assert!(store.flag(keys::INSTALL_DISMISSED).unwrap());
    }

    #[test]
    fn missing_prompt_is_a_noop() {
        let store = MemoryKeyValueStore::new();
        let coordinator = InstallCoordinator::new(&store);
        let outcome = coordinator
            .run_prompt::<&mut ScriptedPrompt>(None)
            .unwrap();
        assert_eq!(outcome, None);
        assert!(store.is_empty());
    }

    #[test]
    fn install_button_hides_when_standalone_or_installed() {
        let store = MemoryKeyValueStore::new();
        let coordinator = InstallCoordinator::new(&store);
        assert!(coordinator.should_offer_install(false).unwrap());
        assert!(!coordinator.should_offer_install(true).unwrap());

        coordinator.mark_installed().unwrap();
        assert!(!coordinator.should_offer_install(false).unwrap());
    }

    #[test]
    fn ios_tip_needs_ios_browser_tab_and_no_dismissal() {
        let store = MemoryKeyValueStore::new();
        let coordinator = InstallCoordinator::new(&store);

        assert!(coordinator.should_show_ios_tip(IPHONE_UA, false).unwrap());
        assert!(!coordinator.should_show_ios_tip(IPHONE_UA, true).unwrap());
        assert!(!coordinator.should_show_ios_tip(DESKTOP_UA, false).unwrap());

        coordinator.dismiss_ios_tip().unwrap();
        assert!(!coordinator.should_show_ios_tip(IPHONE_UA, false).unwrap());
        assert_eq!(
            store.get(keys::IOS_TIP_DISMISSED).unwrap().as_deref(),
            Some("1")
        );
    }
}
