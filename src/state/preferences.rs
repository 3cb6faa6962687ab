//! Theme and language preferences.
//!
//! Read once from durable storage at startup and written back on every
//! change. Unknown stored values fall back to the defaults.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use crate::util::storage::DurableStorage;

pub const THEME_KEY: &str = "admin_dashboard_theme";
pub const LANGUAGE_KEY: &str = "admin_dashboard_language";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    /// Arabic renders right-to-left.
    #[must_use]
    pub fn is_rtl(self) -> bool {
        self == Self::Ar
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreferenceState {
    pub theme: Theme,
    pub language: Language,
}

pub struct Preferences {
    storage: Arc<dyn DurableStorage>,
    state: watch::Sender<PreferenceState>,
}

impl Preferences {
    #[must_use]
    pub fn load(storage: Arc<dyn DurableStorage>) -> Self {
        let theme = storage
            .get(THEME_KEY)
            .and_then(|raw| Theme::parse(&raw))
            .unwrap_or_default();
        let language = storage
            .get(LANGUAGE_KEY)
            .and_then(|raw| Language::parse(&raw))
            .unwrap_or_default();
        let (state, _) = watch::channel(PreferenceState { theme, language });
        Self { storage, state }
    }

    #[must_use]
    pub fn current(&self) -> PreferenceState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PreferenceState> {
        self.state.subscribe()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.state.send_modify(|state| state.theme = theme);
        self.write(THEME_KEY, theme.as_str());
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = self.current().theme.toggled();
        self.set_theme(theme);
        theme
    }

    pub fn set_language(&self, language: Language) {
        self.state.send_modify(|state| state.language = language);
        self.write(LANGUAGE_KEY, language.code());
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(error = %e, key, "failed to persist preference");
        }
    }
}

#[cfg(test)]
#[path = "preferences_test.rs"]
mod tests;
