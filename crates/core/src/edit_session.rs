//! Modal edit sessions for plans, entries and units.
//!
//! A session is created open, driven by the frontend through its draft, and
//! handed back to its owner via [`EditSession::finish`], which consumes it.

use thiserror::Error;

use crate::context::EditorContext;
use crate::model::ModelError;
use crate::projection::{Project, ProjectedList};
use crate::records::RecordId;

/// 編輯中欄位的暫存狀態。 / Editable field state behind one session.
pub trait Draft: Sized {
    type Record;

    /// Fields of a brand-new record.
    fn blank(ctx: &EditorContext) -> Self;

    /// Fields pre-populated from an existing record.
    fn from_record(record: &Self::Record, ctx: &EditorContext) -> Self;

    /// Validates the current fields and builds a record from them.
    fn build(&self) -> Result<Self::Record, ModelError>;
}

/// 編輯工作階段狀態。 / Lifecycle state of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Saved,
    Cancelled,
}

/// 編輯工作階段錯誤。 / Errors raised while driving a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("edit session is already closed")]
    Closed,
    #[error("invalid field values: {0}")]
    Invalid(#[from] ModelError),
}

/// 工作階段結束後交回擁有者的結果。 / Result handed back to the owner when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome<R> {
    Saved {
        /// Slot the session was launched for; `None` for a new record.
        target: Option<RecordId>,
        record: R,
    },
    Cancelled,
}

/// 套用編輯結果後清單的變化。 / What applying an outcome did to a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordChange {
    Added(RecordId),
    /// A new record equal to an existing one; the list is unchanged.
    Duplicate,
    Updated(RecordId),
    /// The target slot no longer exists.
    Missing,
    Unchanged,
}

impl<R> EditOutcome<R>
where
    R: Project + PartialEq,
{
    /// Adds a new record or replaces the targeted slot by identity.
    pub fn apply_to(self, list: &mut ProjectedList<R>) -> RecordChange {
        match self {
            EditOutcome::Saved {
                target: None,
                record,
            } => match list.append(record) {
                Some(id) => RecordChange::Added(id),
                None => RecordChange::Duplicate,
            },
            EditOutcome::Saved {
                target: Some(id),
                record,
            } => {
                if list.update(id, record) {
                    RecordChange::Updated(id)
                } else {
                    tracing::debug!(%id, "edited record no longer present");
                    RecordChange::Missing
                }
            }
            EditOutcome::Cancelled => RecordChange::Unchanged,
        }
    }
}

/// 單一紀錄的模態編輯工作階段。 / Single-use modal editor for one record.
#[derive(Debug, Clone)]
pub struct EditSession<D: Draft> {
    target: Option<RecordId>,
    draft: D,
    state: SessionState,
    saved: Option<D::Record>,
}

impl<D: Draft> EditSession<D> {
    pub fn blank(ctx: &EditorContext) -> Self {
        Self::open(None, D::blank(ctx))
    }

    /// Pre-populated session that is not bound to a list slot.
    pub fn for_record(ctx: &EditorContext, record: &D::Record) -> Self {
        Self::open(None, D::from_record(record, ctx))
    }

    /// Pre-populated session bound to the slot `id`.
    pub fn for_slot(ctx: &EditorContext, id: RecordId, record: &D::Record) -> Self {
        Self::open(Some(id), D::from_record(record, ctx))
    }

    fn open(target: Option<RecordId>, draft: D) -> Self {
        Self {
            target,
            draft,
            state: SessionState::Open,
            saved: None,
        }
    }

    pub fn target(&self) -> Option<RecordId> {
        self.target
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> Result<&mut D, EditError> {
        if !self.is_open() {
            return Err(EditError::Closed);
        }
        Ok(&mut self.draft)
    }

    /// 依目前欄位建立紀錄並結束工作階段。 / Builds the record from the current fields and ends the session.
    ///
    /// Invalid fields leave the session open so the user can correct them.
    pub fn save(&mut self) -> Result<&D::Record, EditError> {
        if !self.is_open() {
            return Err(EditError::Closed);
        }
        let record = self.draft.build()?;
        self.state = SessionState::Saved;
        let saved = self.saved.insert(record);
        Ok(&*saved)
    }

    /// Discards the edits. Has no effect on a session that already ended.
    pub fn cancel(&mut self) {
        if self.is_open() {
            self.state = SessionState::Cancelled;
        }
    }

    /// Ends the session; one that was never saved counts as cancelled.
    pub fn finish(self) -> EditOutcome<D::Record> {
        match (self.state, self.saved) {
            (SessionState::Saved, Some(record)) => EditOutcome::Saved {
                target: self.target,
                record,
            },
            _ => EditOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::UnitDraft;
    use crate::model::Unit;

    fn ctx() -> EditorContext {
        EditorContext::fallback()
    }

    #[test]
    fn blank_unit_session_uses_defaults() {
        let session: EditSession<UnitDraft> = EditSession::blank(&ctx());
        assert!(session.is_open());
        assert_eq!(session.target(), None);
        assert_eq!(session.draft().duration_minutes, 1);
        assert_eq!(session.draft().movement_key, "L");
    }

    #[test]
    fn invalid_save_keeps_session_open() {
        let mut session: EditSession<UnitDraft> = EditSession::blank(&ctx());
        session.draft_mut().unwrap().duration_minutes = 0;
        assert_eq!(
            session.save().unwrap_err(),
            EditError::Invalid(ModelError::InvalidDuration)
        );
        assert_eq!(session.state(), SessionState::Open);

        session.draft_mut().unwrap().duration_minutes = 15;
        assert_eq!(session.save().unwrap().duration_minutes(), 15);
        assert_eq!(session.state(), SessionState::Saved);
    }

    #[test]
    fn closed_session_rejects_further_edits() {
        let mut session: EditSession<UnitDraft> = EditSession::blank(&ctx());
        session.cancel();
        assert_eq!(session.draft_mut().unwrap_err(), EditError::Closed);
        assert_eq!(session.save().unwrap_err(), EditError::Closed);
        assert_eq!(session.finish(), EditOutcome::Cancelled);
    }

    #[test]
    fn unsaved_session_finishes_cancelled() {
        let mut session: EditSession<UnitDraft> = EditSession::blank(&ctx());
        session.draft_mut().unwrap().duration_minutes = 40;
        assert_eq!(session.finish(), EditOutcome::Cancelled);
    }

    #[test]
    fn cancel_after_save_keeps_saved_record() {
        let mut session: EditSession<UnitDraft> = EditSession::blank(&ctx());
        session.save().unwrap();
        session.cancel();
        assert!(matches!(session.finish(), EditOutcome::Saved { .. }));
    }

    #[test]
    fn outcome_updates_by_identity() {
        let ctx = ctx();
        let run = ctx.movements().resolve("L").unwrap();
        let a = Unit::new(10, run.clone(), None).unwrap();
        let b = Unit::new(20, run, None).unwrap();
        let mut list = ProjectedList::from_records(ctx.clone(), [a.clone(), b.clone()]);
        let id = list.records().id_at(1).unwrap();

        let mut session: EditSession<UnitDraft> = EditSession::for_slot(&ctx, id, &b);
        session.draft_mut().unwrap().duration_minutes = 10;
        session.save().unwrap();

        assert_eq!(session.finish().apply_to(&mut list), RecordChange::Updated(id));
        assert_eq!(list.to_vec(), vec![a.clone(), a]);
        assert_eq!(list.rows().len(), 2);
    }
}
