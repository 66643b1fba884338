use runplan_settings::{Preferences, PreferencesStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let store = PreferencesStore::load(&path).expect("load defaults");
    let prefs = store.preferences();
    assert!(!prefs.debug_mode);
    assert!(prefs.use_last_directory);
    assert_eq!(prefs.last_directory, "");
    assert!(!prefs.ical_mode);
    assert!(!prefs.locale.is_empty());
    assert!(!path.exists(), "loading must not create the file");
}

#[test]
fn update_writes_immediately() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let mut store = PreferencesStore::new(path.clone(), Preferences::default());
    store
        .update(|prefs| {
            prefs.debug_mode = true;
            prefs.use_last_directory = false;
            prefs.locale = "de_DE".to_string();
        })
        .expect("save");

    let reloaded = PreferencesStore::load(&path).expect("reload");
    assert!(reloaded.preferences().debug_mode);
    assert!(!reloaded.preferences().use_last_directory);
    assert_eq!(reloaded.preferences().locale, "de-DE");
}

#[test]
fn missing_keys_take_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(&path, r#"{ "last_directory": "/tmp/plans", "locale": "en-GB" }"#)
        .expect("write partial prefs");

    let store = PreferencesStore::load(&path).expect("load partial file");
    let prefs = store.preferences();
    assert_eq!(prefs.version, 1);
    assert!(prefs.use_last_directory);
    assert!(!prefs.debug_mode);
    assert_eq!(prefs.last_directory, "/tmp/plans");
    assert_eq!(prefs.locale, "en-GB");
}

#[test]
fn legacy_version_is_upgraded_on_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(
        &path,
        r#"{
            "version": 0,
            "debug_mode": true,
            "use_last_directory": true,
            "last_directory": "  /home/runner/plans  ",
            "locale": "de_AT"
        }"#,
    )
    .expect("write legacy prefs");

    let store = PreferencesStore::load(&path).expect("load legacy file");
    let prefs = store.preferences();
    assert_eq!(
        prefs.version, 1,
        "legacy preferences should be upgraded to schema version 1"
    );
    assert_eq!(
        prefs.last_directory, "/home/runner/plans",
        "surrounding whitespace should be trimmed from the remembered directory"
    );
    assert_eq!(
        prefs.locale, "de-AT",
        "POSIX-style locale should be normalized"
    );
}

#[test]
fn corrupt_file_is_reported_by_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(&path, "[1, 2").expect("write corrupt prefs");

    assert!(PreferencesStore::load(&path).is_err());
    let store = PreferencesStore::load_or_default(&path);
    assert!(store.preferences().use_last_directory);
}
