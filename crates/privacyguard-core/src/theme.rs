// ── Theme preference ──

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "dashboard.theme";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

impl ThemePreference {
    /// The persisted theme, else the ambient one, else dark.
    pub fn load(store: &dyn KeyValueStore, ambient: Option<Self>) -> Self {
        match store.get(THEME_KEY) {
            Ok(Some(raw)) => match Self::from_str(raw.trim()) {
                Ok(theme) => return theme,
                Err(_) => debug!(raw = %raw, "ignoring unknown stored theme"),
            },
            Ok(None) => {}
            Err(e) => debug!(error = %e, "could not read theme"),
        }
        ambient.unwrap_or_default()
    }

    pub fn persist(self, store: &mut dyn KeyValueStore) {
        if let Err(e) = store.set(THEME_KEY, &self.to_string()) {
            debug!(error = %e, "could not persist theme");
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Ambient preference from the terminal's `COLORFGBG` hint.
    pub fn ambient() -> Option<Self> {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| Self::from_colorfgbg(&v))
    }

    /// Parse a `COLORFGBG` value (`"fg;bg"` or `"fg;extra;bg"`). Background
    /// colours 7 and 9 to 15 are light; other ANSI indices are dark.
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        match bg {
            7 | 9..=15 => Some(Self::Light),
            0..=6 | 8 => Some(Self::Dark),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn first_run_falls_back_to_ambient() {
        let store = MemoryStore::new();
        assert_eq!(
            ThemePreference::load(&store, Some(ThemePreference::Light)),
            ThemePreference::Light
        );
        assert_eq!(ThemePreference::load(&store, None), ThemePreference::Dark);
    }

    #[test]
    fn persisted_value_wins_over_ambient() {
        let mut store = MemoryStore::new();
        ThemePreference::Dark.persist(&mut store);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(
            ThemePreference::load(&store, Some(ThemePreference::Light)),
            ThemePreference::Dark
        );
    }

    #[test]
    fn garbage_stored_value_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(
            ThemePreference::load(&store, Some(ThemePreference::Light)),
            ThemePreference::Light
        );
    }

    #[test]
    fn colorfgbg_hints() {
        assert_eq!(ThemePreference::from_colorfgbg("15;0"), Some(ThemePreference::Dark));
        assert_eq!(ThemePreference::from_colorfgbg("0;15"), Some(ThemePreference::Light));
        assert_eq!(ThemePreference::from_colorfgbg("0;default;7"), Some(ThemePreference::Light));
        assert_eq!(ThemePreference::from_colorfgbg("nonsense"), None);
    }
}
