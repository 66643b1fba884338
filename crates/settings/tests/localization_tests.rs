use std::fs;

use runplan_settings::{LocalizationError, LocalizationManager, LocalizationParams};
use tempfile::tempdir;

#[test]
fn fallback_returns_builtin_strings() {
    let manager = LocalizationManager::fallback();
    assert_eq!(manager.text("misc.week"), "Week");
    assert_eq!(manager.text("missing.key"), "missing.key");
}

#[test]
fn indexed_placeholders_are_applied() {
    let manager = LocalizationManager::fallback();
    assert_eq!(manager.text_args("row.entry.label", &["3", "5"]), "Week 3, Day 5");
    let values = ["45"];
    let params = LocalizationParams::new(&values);
    assert_eq!(
        manager.text_with_params("row.duration", &params).as_ref(),
        "45 min"
    );
}

#[test]
fn german_catalog_is_selected_from_preferences_tag() {
    let mut manager = LocalizationManager::with_builtin_catalogs().expect("builtin");
    assert!(manager.select_locale("de_DE.UTF-8"));
    assert_eq!(manager.text_args("row.entry.label", &["1", "1"]), "Woche 1, Tag 1");
    assert_eq!(manager.text_count("plan.summary.entries", 1), "1 Eintrag");
    assert_eq!(manager.text_count("plan.summary.entries", 4), "4 Einträge");
}

#[test]
fn english_plurals_follow_locale_rules() {
    let manager = LocalizationManager::fallback();
    assert_eq!(manager.text_count("entry.summary.units", 1), "1 running unit");
    assert_eq!(manager.text_count("entry.summary.units", 0), "0 running units");
}

#[test]
fn installed_catalogs_fall_back_to_english_for_missing_keys() {
    let temp = tempdir().expect("tempdir");
    fs::write(
        temp.path().join("nl-NL.json"),
        r#"{ "locale": "nl-NL", "strings": { "misc.week": "Week", "monday": "maandag" } }"#,
    )
    .expect("write locale");

    let mut manager = LocalizationManager::load_from_dirs([temp.path()]).expect("load");
    assert!(manager.select_locale("nl-NL"));
    assert_eq!(manager.text("monday"), "maandag");
    assert_eq!(manager.text("tuesday"), "Tuesday");
    let missing = manager.missing_keys("nl-NL").expect("locale present");
    assert!(missing.contains(&"tuesday".to_string()));
    assert!(!missing.contains(&"monday".to_string()));
}

#[test]
fn plural_requires_other_category() {
    let temp = tempdir().expect("tempdir");
    fs::write(
        temp.path().join("xx.json"),
        r#"
        {
            "locale": "xx",
            "strings": {
                "sample": {
                    "type": "plural",
                    "one": "only one"
                }
            }
        }
        "#,
    )
    .expect("write locale");

    let error = LocalizationManager::load_from_dirs([temp.path()]).unwrap_err();
    match error {
        LocalizationError::PluralMissingOther { locale, key } => {
            assert_eq!(locale, "xx");
            assert_eq!(key, "sample");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn duplicate_locale_is_rejected() {
    let temp = tempdir().expect("tempdir");
    fs::write(
        temp.path().join("de.json"),
        r#"{ "locale": "de-DE", "strings": { "monday": "Mo" } }"#,
    )
    .expect("write locale");

    let error = LocalizationManager::load_from_dirs([temp.path()]).unwrap_err();
    assert!(matches!(error, LocalizationError::DuplicateLocale(code) if code == "de-DE"));
}
