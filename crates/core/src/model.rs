use std::fmt;

use runplan_settings::LocalizationManager;
use thiserror::Error;

/// 週次選單提供的最大週數。 / Highest week number offered by the week chooser.
pub const MAX_WEEKS: u32 = 52;

/// Localization keys for the weekdays, Monday first (day 1).
pub const DAY_KEYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Built-in movement type keys in chooser order; the first one is the default.
const BUILTIN_MOVEMENT_KEYS: [&str; 4] = ["L", "LS", "G", "P"];

/// 模型欄位驗證錯誤。 / Field-level validation failures of the plan model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("week {0} is outside 1..={max}", max = MAX_WEEKS)]
    InvalidWeek(u32),
    #[error("day {0} is outside 1..=7")]
    InvalidDay(u8),
    #[error("unit duration must be at least one minute")]
    InvalidDuration,
    #[error("unknown movement type '{0}'")]
    UnknownMovementType(String),
    #[error("plan name must not be empty")]
    EmptyPlanName,
}

/// 運動類型參照（鍵與顯示名稱）。 / Movement type reference: key plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovementType {
    key: String,
    name: String,
}

impl MovementType {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// 可選擇的運動類型清單。 / Ordered set of selectable movement types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementCatalog {
    types: Vec<MovementType>,
}

impl MovementCatalog {
    /// Creates a catalog from explicit types. Later duplicates of a key are dropped.
    pub fn new(types: impl IntoIterator<Item = MovementType>) -> Self {
        let mut unique: Vec<MovementType> = Vec::new();
        for movement in types {
            if !unique.iter().any(|known| known.key == movement.key) {
                unique.push(movement);
            }
        }
        Self { types: unique }
    }

    /// Built-in catalog with display names resolved through `movement.<key>`.
    pub fn builtin(l10n: &LocalizationManager) -> Self {
        Self::new(BUILTIN_MOVEMENT_KEYS.iter().map(|key| {
            let name = l10n.text(&format!("movement.{key}")).into_owned();
            MovementType::new(*key, name)
        }))
    }

    /// First available choice; `None` only for an empty catalog.
    pub fn default_type(&self) -> Option<&MovementType> {
        self.types.first()
    }

    pub fn find(&self, key: &str) -> Option<&MovementType> {
        self.types.iter().find(|movement| movement.key == key)
    }

    pub fn resolve(&self, key: &str) -> Result<MovementType, ModelError> {
        self.find(key)
            .cloned()
            .ok_or_else(|| ModelError::UnknownMovementType(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovementType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// 單一訓練單元。 / One atomic activity within an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    duration_minutes: u32,
    movement_type: MovementType,
    running_infos: Option<String>,
}

impl Unit {
    pub fn new(
        duration_minutes: u32,
        movement_type: MovementType,
        running_infos: Option<String>,
    ) -> Result<Self, ModelError> {
        if duration_minutes == 0 {
            return Err(ModelError::InvalidDuration);
        }
        Ok(Self {
            duration_minutes,
            movement_type,
            running_infos: running_infos.filter(|text| !text.trim().is_empty()),
        })
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn movement_type(&self) -> &MovementType {
        &self.movement_type
    }

    pub fn running_infos(&self) -> Option<&str> {
        self.running_infos.as_deref()
    }
}

/// 計畫中的一個排程項目（週、日與訓練單元）。 / One scheduled item of a plan: week, day and its units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    week: u32,
    day: u8,
    remarks: Option<String>,
    units: Vec<Unit>,
}

impl Entry {
    pub fn new(
        week: u32,
        day: u8,
        remarks: Option<String>,
        units: Vec<Unit>,
    ) -> Result<Self, ModelError> {
        if !(1..=MAX_WEEKS).contains(&week) {
            return Err(ModelError::InvalidWeek(week));
        }
        if !(1..=7).contains(&day) {
            return Err(ModelError::InvalidDay(day));
        }
        Ok(Self {
            week,
            day,
            remarks: remarks.filter(|text| !text.trim().is_empty()),
            units,
        })
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Sum of all unit durations in minutes.
    pub fn total_minutes(&self) -> u32 {
        self.units.iter().map(Unit::duration_minutes).sum()
    }

    /// Localization key of the weekday name.
    pub fn day_key(&self) -> &'static str {
        DAY_KEYS[usize::from(self.day - 1)]
    }
}

/// 計畫的名稱與備註（計畫層級編輯器的欄位）。 / Name and remarks of a plan, the fields of the plan-level editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanHeader {
    name: String,
    remarks: Option<String>,
}

impl PlanHeader {
    pub fn new(name: impl Into<String>, remarks: Option<String>) -> Result<Self, ModelError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ModelError::EmptyPlanName);
        }
        Ok(Self {
            name,
            remarks: remarks.filter(|text| !text.trim().is_empty()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }
}

/// 完整的跑步計畫文件。 / A whole running plan document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    header: PlanHeader,
    entries: Vec<Entry>,
}

impl Plan {
    pub fn new(header: PlanHeader, entries: Vec<Entry>) -> Self {
        Self { header, entries }
    }

    pub fn header(&self) -> &PlanHeader {
        &self.header
    }

    pub fn name(&self) -> &str {
        self.header.name()
    }

    pub fn remarks(&self) -> Option<&str> {
        self.header.remarks()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_parts(self) -> (PlanHeader, Vec<Entry>) {
        (self.header, self.entries)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} entries)", self.header.name, self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> MovementType {
        MovementType::new("L", "Running")
    }

    #[test]
    fn entry_rejects_out_of_range_week_and_day() {
        assert_eq!(
            Entry::new(0, 1, None, Vec::new()),
            Err(ModelError::InvalidWeek(0))
        );
        assert_eq!(
            Entry::new(MAX_WEEKS + 1, 1, None, Vec::new()),
            Err(ModelError::InvalidWeek(MAX_WEEKS + 1))
        );
        assert_eq!(
            Entry::new(1, 8, None, Vec::new()),
            Err(ModelError::InvalidDay(8))
        );
    }

    #[test]
    fn blank_remarks_are_dropped() {
        let entry = Entry::new(1, 1, Some("   ".into()), Vec::new()).unwrap();
        assert_eq!(entry.remarks(), None);
        let unit = Unit::new(10, run(), Some(String::new())).unwrap();
        assert_eq!(unit.running_infos(), None);
    }

    #[test]
    fn total_minutes_sums_units() {
        let units = vec![
            Unit::new(30, run(), None).unwrap(),
            Unit::new(5, MovementType::new("G", "Walking"), None).unwrap(),
        ];
        let entry = Entry::new(2, 7, None, units).unwrap();
        assert_eq!(entry.total_minutes(), 35);
        assert_eq!(entry.day_key(), "sunday");
    }

    #[test]
    fn catalog_defaults_to_first_choice() {
        let catalog = MovementCatalog::builtin(&LocalizationManager::fallback());
        assert_eq!(catalog.default_type().map(MovementType::key), Some("L"));
        assert_eq!(catalog.find("G").map(MovementType::name), Some("Walking"));
        assert_eq!(
            catalog.resolve("X"),
            Err(ModelError::UnknownMovementType("X".into()))
        );
    }

    #[test]
    fn plan_header_requires_name() {
        assert_eq!(
            PlanHeader::new("  ", None),
            Err(ModelError::EmptyPlanName)
        );
        assert_eq!(PlanHeader::new(" 10k ", None).unwrap().name(), "10k");
    }
}
