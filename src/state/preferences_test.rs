use super::*;
use crate::util::storage::MemoryStorage;

#[test]
fn defaults_are_light_and_english() {
    let prefs = Preferences::load(Arc::new(MemoryStorage::new()));
    assert_eq!(prefs.current(), PreferenceState { theme: Theme::Light, language: Language::En });
    assert!(!prefs.current().language.is_rtl());
}

#[test]
fn loads_stored_values() {
    let storage = Arc::new(MemoryStorage::with_entries([(THEME_KEY, "dark"), (LANGUAGE_KEY, "ar")]));
    let prefs = Preferences::load(storage);
    assert_eq!(prefs.current().theme, Theme::Dark);
    assert!(prefs.current().language.is_rtl());
}

#[test]
fn unknown_stored_values_fall_back() {
    let storage = Arc::new(MemoryStorage::with_entries([(THEME_KEY, "sepia"), (LANGUAGE_KEY, "fr")]));
    assert_eq!(Preferences::load(storage).current(), PreferenceState::default());
}

#[test]
fn changes_are_written_through() {
    let storage = Arc::new(MemoryStorage::new());
    let prefs = Preferences::load(storage.clone());
    assert_eq!(prefs.toggle_theme(), Theme::Dark);
    prefs.set_language(Language::Ar);
    assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));
    assert_eq!(storage.get(LANGUAGE_KEY).as_deref(), Some("ar"));

    let reloaded = Preferences::load(storage);
    assert_eq!(reloaded.current(), PreferenceState { theme: Theme::Dark, language: Language::Ar });
}
