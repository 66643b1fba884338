//! Field state of the plan, entry and unit editors.

use std::ops::RangeInclusive;

use crate::context::EditorContext;
use crate::edit_session::{Draft, EditOutcome, EditSession, RecordChange};
use crate::model::{Entry, ModelError, MovementType, PlanHeader, Unit, DAY_KEYS, MAX_WEEKS};
use crate::projection::{ProjectedList, UnitRow};
use crate::selection::{self, ContextAction};

/// 計畫層級編輯器欄位。 / Fields of the plan-level editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanDraft {
    pub name: String,
    pub remarks: String,
}

impl Draft for PlanDraft {
    type Record = PlanHeader;

    fn blank(_ctx: &EditorContext) -> Self {
        Self::default()
    }

    fn from_record(record: &PlanHeader, _ctx: &EditorContext) -> Self {
        Self {
            name: record.name().to_string(),
            remarks: record.remarks().unwrap_or_default().to_string(),
        }
    }

    fn build(&self) -> Result<PlanHeader, ModelError> {
        PlanHeader::new(self.name.as_str(), Some(self.remarks.clone()))
    }
}

/// 訓練單元編輯器欄位。 / Fields of the unit editor.
#[derive(Debug, Clone)]
pub struct UnitDraft {
    pub duration_minutes: u32,
    /// Key of the chosen movement type.
    pub movement_key: String,
    pub running_infos: String,
    ctx: EditorContext,
}

impl UnitDraft {
    /// Movement types offered by the chooser, in catalog order.
    pub fn movement_choices(&self) -> impl Iterator<Item = &MovementType> {
        self.ctx.movements().iter()
    }
}

impl Draft for UnitDraft {
    type Record = Unit;

    fn blank(ctx: &EditorContext) -> Self {
        let movement_key = ctx
            .movements()
            .default_type()
            .map(|movement| movement.key().to_string())
            .unwrap_or_default();
        Self {
            duration_minutes: 1,
            movement_key,
            running_infos: String::new(),
            ctx: ctx.clone(),
        }
    }

    fn from_record(record: &Unit, ctx: &EditorContext) -> Self {
        Self {
            duration_minutes: record.duration_minutes(),
            movement_key: record.movement_type().key().to_string(),
            running_infos: record.running_infos().unwrap_or_default().to_string(),
            ctx: ctx.clone(),
        }
    }

    fn build(&self) -> Result<Unit, ModelError> {
        let movement = self.ctx.movements().resolve(&self.movement_key)?;
        Unit::new(
            self.duration_minutes,
            movement,
            Some(self.running_infos.clone()),
        )
    }
}

/// 計畫項目編輯器欄位，包含其訓練單元清單。 / Fields of the entry editor, including its own unit list.
///
/// The unit list is a private copy: nested unit sessions only touch it, and
/// it is dropped together with the draft when the entry session is cancelled.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub week: u32,
    pub day: u8,
    pub remarks: String,
    units: ProjectedList<Unit>,
    ctx: EditorContext,
}

impl EntryDraft {
    pub fn week_choices() -> RangeInclusive<u32> {
        1..=MAX_WEEKS
    }

    /// Localized weekday names, Monday first.
    pub fn day_choices(&self) -> Vec<String> {
        DAY_KEYS
            .iter()
            .map(|key| self.ctx.l10n().text(key).into_owned())
            .collect()
    }

    pub fn units(&self) -> &ProjectedList<Unit> {
        &self.units
    }

    pub fn unit_rows(&self) -> &[UnitRow] {
        self.units.rows()
    }

    /// Whether the unit table offers edit and delete.
    pub fn unit_context_menu_enabled(&self) -> bool {
        !self.units.is_empty()
    }

    pub fn begin_add_unit(&self) -> EditSession<UnitDraft> {
        EditSession::blank(&self.ctx)
    }

    pub fn begin_edit_unit(&self, selected: Option<usize>) -> Option<EditSession<UnitDraft>> {
        let index = selection::resolve(selected, self.units.len())?;
        let id = self.units.records().id_at(index)?;
        let unit = self.units.get(index)?;
        Some(EditSession::for_slot(&self.ctx, id, unit))
    }

    /// Applies a finished unit session to this entry's unit list.
    pub fn complete_unit_edit(&mut self, session: EditSession<UnitDraft>) -> RecordChange {
        let outcome: EditOutcome<Unit> = session.finish();
        outcome.apply_to(&mut self.units)
    }

    pub fn delete_unit(&mut self, selected: Option<usize>) -> Option<Unit> {
        let index = selection::resolve(selected, self.units.len())?;
        self.units.remove_at(index)
    }

    /// Context-menu entry point of the unit table. Delete is applied
    /// directly; edit hands back a session for the frontend to drive.
    pub fn unit_context_action(
        &mut self,
        action: ContextAction,
        selected: Option<usize>,
    ) -> Option<EditSession<UnitDraft>> {
        let resolved = selection::resolve_action(action, selected, self.units.len())?;
        match resolved.action {
            ContextAction::Edit => self.begin_edit_unit(Some(resolved.index)),
            ContextAction::Delete => {
                self.units.remove_at(resolved.index);
                None
            }
        }
    }
}

impl Draft for EntryDraft {
    type Record = Entry;

    fn blank(ctx: &EditorContext) -> Self {
        Self {
            week: 1,
            day: 1,
            remarks: String::new(),
            units: ProjectedList::new(ctx.clone()),
            ctx: ctx.clone(),
        }
    }

    fn from_record(record: &Entry, ctx: &EditorContext) -> Self {
        Self {
            week: record.week(),
            day: record.day(),
            remarks: record.remarks().unwrap_or_default().to_string(),
            units: ProjectedList::from_records(ctx.clone(), record.units().iter().cloned()),
            ctx: ctx.clone(),
        }
    }

    fn build(&self) -> Result<Entry, ModelError> {
        Entry::new(
            self.week,
            self.day,
            Some(self.remarks.clone()),
            self.units.to_vec(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> EditorContext {
        EditorContext::fallback()
    }

    fn add_unit(draft: &mut EntryDraft, minutes: u32, key: &str) -> RecordChange {
        let mut session = draft.begin_add_unit();
        {
            let fields = session.draft_mut().unwrap();
            fields.duration_minutes = minutes;
            fields.movement_key = key.to_string();
        }
        session.save().unwrap();
        draft.complete_unit_edit(session)
    }

    #[test]
    fn blank_entry_starts_at_week_one_day_one() {
        let draft = EntryDraft::blank(&ctx());
        assert_eq!((draft.week, draft.day), (1, 1));
        assert!(draft.unit_rows().is_empty());
        assert!(!draft.unit_context_menu_enabled());
        assert_eq!(draft.day_choices()[6], "Sunday");
        assert_eq!(EntryDraft::week_choices().count(), MAX_WEEKS as usize);
    }

    #[test]
    fn nested_units_build_into_entry() {
        let mut draft = EntryDraft::blank(&ctx());
        draft.week = 2;
        assert!(matches!(add_unit(&mut draft, 30, "L"), RecordChange::Added(_)));
        assert!(matches!(add_unit(&mut draft, 5, "G"), RecordChange::Added(_)));
        assert_eq!(add_unit(&mut draft, 5, "G"), RecordChange::Duplicate);

        let entry = draft.build().unwrap();
        assert_eq!(entry.week(), 2);
        assert_eq!(entry.total_minutes(), 35);
        assert_eq!(draft.unit_rows()[1].key, "G");
    }

    #[test]
    fn existing_entry_keeps_repeated_units() {
        let ctx = ctx();
        let run = ctx.movements().resolve("L").unwrap();
        let walk = ctx.movements().resolve("G").unwrap();
        let units = vec![
            Unit::new(5, run.clone(), None).unwrap(),
            Unit::new(2, walk.clone(), None).unwrap(),
            Unit::new(5, run, None).unwrap(),
            Unit::new(2, walk, None).unwrap(),
        ];
        let entry = Entry::new(1, 3, None, units).unwrap();

        let mut draft = EntryDraft::from_record(&entry, &ctx);
        assert_eq!(draft.unit_rows().len(), 4);
        draft.remarks = "intervals".into();
        let rebuilt = draft.build().unwrap();
        assert_eq!(rebuilt.units(), entry.units());
        assert_eq!(rebuilt.remarks(), Some("intervals"));
    }

    #[test]
    fn unknown_movement_key_is_rejected() {
        let mut draft = UnitDraft::blank(&ctx());
        draft.movement_key = "X".into();
        assert_eq!(
            draft.build(),
            Err(ModelError::UnknownMovementType("X".into()))
        );
        assert_eq!(draft.movement_choices().count(), 4);
    }

    #[test]
    fn edit_unit_prepopulates_fields() {
        let mut draft = EntryDraft::blank(&ctx());
        add_unit(&mut draft, 12, "LS");
        let session = draft.begin_edit_unit(Some(0)).unwrap();
        assert_eq!(session.draft().duration_minutes, 12);
        assert_eq!(session.draft().movement_key, "LS");
        assert!(draft.begin_edit_unit(Some(1)).is_none());
        assert!(draft.begin_edit_unit(None).is_none());
    }

    #[test]
    fn context_delete_removes_selected_unit() {
        let mut draft = EntryDraft::blank(&ctx());
        add_unit(&mut draft, 10, "L");
        add_unit(&mut draft, 2, "P");
        assert!(draft
            .unit_context_action(ContextAction::Delete, Some(0))
            .is_none());
        assert_eq!(draft.units().len(), 1);
        assert_eq!(draft.unit_rows()[0].key, "P");
        assert!(draft
            .unit_context_action(ContextAction::Delete, Some(4))
            .is_none());
        assert_eq!(draft.units().len(), 1);
    }

    #[test]
    fn plan_draft_round_trips_header() {
        let header = PlanHeader::new("Couch to 5k", Some("three runs a week".into())).unwrap();
        let draft = PlanDraft::from_record(&header, &ctx());
        assert_eq!(draft.build().unwrap(), header);
        assert_eq!(
            PlanDraft::blank(&ctx()).build(),
            Err(ModelError::EmptyPlanName)
        );
    }
}
