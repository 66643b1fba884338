//! Session preferences and localized text lookup for the running-plan editor.
//! 跑步計畫編輯器的偏好設定與在地化字串查詢。

pub mod localization;
pub mod preferences;

pub use localization::{
    normalize_locale_tag, LocaleCatalogStats, LocalizationError,
    LocalizationManager, LocalizationParams,
};
pub use preferences::{Preferences, PreferencesError, PreferencesStore};
