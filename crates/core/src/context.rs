use std::sync::Arc;

use runplan_settings::{LocalizationManager, Preferences};

use crate::model::MovementCatalog;

/// Which optional column the unit projection fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitColumns {
    /// Movement type display name (plans imported from JSON).
    #[default]
    MovementName,
    /// Free-text running infos (plans imported from iCal).
    RunningInfos,
}

impl UnitColumns {
    pub fn from_preferences(preferences: &Preferences) -> Self {
        if preferences.ical_mode {
            UnitColumns::RunningInfos
        } else {
            UnitColumns::MovementName
        }
    }
}

/// 注入至各元件的共享編輯環境（語系與運動類型）。 / Shared editing context injected into every component that needs localized text or movement types.
///
/// Cloning is cheap; clones share the same catalogs.
#[derive(Debug, Clone)]
pub struct EditorContext {
    l10n: Arc<LocalizationManager>,
    movements: Arc<MovementCatalog>,
    unit_columns: UnitColumns,
}

impl EditorContext {
    pub fn new(l10n: LocalizationManager, movements: MovementCatalog) -> Self {
        Self {
            l10n: Arc::new(l10n),
            movements: Arc::new(movements),
            unit_columns: UnitColumns::default(),
        }
    }

    /// English strings and the built-in movement catalog.
    pub fn fallback() -> Self {
        let l10n = LocalizationManager::fallback();
        let movements = MovementCatalog::builtin(&l10n);
        Self::new(l10n, movements)
    }

    pub fn with_unit_columns(mut self, unit_columns: UnitColumns) -> Self {
        self.unit_columns = unit_columns;
        self
    }

    pub fn l10n(&self) -> &LocalizationManager {
        &self.l10n
    }

    pub fn movements(&self) -> &MovementCatalog {
        &self.movements
    }

    pub fn unit_columns(&self) -> UnitColumns {
        self.unit_columns
    }

    /// Window title used for dialogs: application name and version.
    pub fn dialog_title(&self) -> String {
        format!("{} {}", self.l10n.text("app.name"), env!("CARGO_PKG_VERSION"))
    }
}
