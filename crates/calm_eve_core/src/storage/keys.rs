//! Persisted storage keys.

/// JSON array of entries.
pub const ENTRIES: &str = "mood_entries_v1";
/// `auto`, `light` or `dark`.
pub const THEME: &str = "ce_theme";
pub const INSTALLED: &str = "ce_installed";
pub const INSTALL_DISMISSED: &str = "ce_install_dismissed";
pub const IOS_TIP_DISMISSED: &str = "ce_ios_tip_dismissed";

pub const FLAG_SET: &str = "1";
