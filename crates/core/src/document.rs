//! Top-level owner of the loaded running plan.
//! 目前載入之跑步計畫的最上層擁有者。

use crate::context::EditorContext;
use crate::drafts::{EntryDraft, PlanDraft};
use crate::edit_session::{EditOutcome, EditSession, RecordChange};
use crate::frontend::{Frontend, Notice, Prompt};
use crate::model::{Entry, Plan, PlanHeader};
use crate::persistence::{PersistenceError, PersistenceGateway};
use crate::projection::{EntryRow, ProjectedList};
use crate::selection::{self, ContextAction};

/// 檔案動作的結果。 / Result of a file-level action.
#[derive(Debug)]
pub enum ActionOutcome {
    Completed,
    /// The user declined the destructive-action prompt.
    Declined,
    /// The file chooser was dismissed.
    Cancelled,
    /// Nothing to act on, e.g. saving without a plan.
    Skipped,
    /// Reported to the user already; the in-memory plan is unchanged.
    Failed(PersistenceError),
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }
}

/// 依目前狀態啟用的操作。 / Which controls are enabled for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub edit_plan: bool,
    pub save_plan: bool,
    pub entry_context_menu: bool,
}

/// 編輯中的計畫文件。 / The plan document being edited.
pub struct DocumentSession {
    ctx: EditorContext,
    gateway: PersistenceGateway,
    plan: Option<PlanHeader>,
    entries: ProjectedList<Entry>,
}

impl DocumentSession {
    pub fn new(ctx: EditorContext, gateway: PersistenceGateway) -> Self {
        let entries = ProjectedList::new(ctx.clone());
        Self {
            ctx,
            gateway,
            plan: None,
            entries,
        }
    }

    pub fn ctx(&self) -> &EditorContext {
        &self.ctx
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    pub fn is_loaded(&self) -> bool {
        self.plan.is_some()
    }

    pub fn plan_header(&self) -> Option<&PlanHeader> {
        self.plan.as_ref()
    }

    /// The loaded plan assembled from its header and canonical entries.
    pub fn plan_snapshot(&self) -> Option<Plan> {
        self.plan
            .as_ref()
            .map(|header| Plan::new(header.clone(), self.entries.to_vec()))
    }

    pub fn entries(&self) -> &ProjectedList<Entry> {
        &self.entries
    }

    pub fn entry_rows(&self) -> &[EntryRow] {
        self.entries.rows()
    }

    /// 重新計算啟用狀態。 / Recomputes control enablement from the current state.
    pub fn affordances(&self) -> Affordances {
        let loaded = self.is_loaded();
        Affordances {
            edit_plan: loaded,
            save_plan: loaded,
            entry_context_menu: !self.entries.is_empty(),
        }
    }

    /// Installs `plan` without prompting, replacing whatever was loaded.
    pub fn load_plan(&mut self, plan: Plan) {
        let (header, entries) = plan.into_parts();
        self.entries.replace_all(entries);
        self.plan = Some(header);
    }

    fn discard_plan(&mut self) {
        self.plan = None;
        self.entries.clear();
    }

    fn overwrite_prompt(&self) -> Prompt {
        let l10n = self.ctx.l10n();
        Prompt {
            title: self.ctx.dialog_title(),
            message: l10n.text("alert.runningplan.overwrite").into_owned(),
            confirm_label: l10n.text("action.yes").into_owned(),
            cancel_label: l10n.text("action.cancel").into_owned(),
        }
    }

    /// Asks before a loaded plan would be lost; `true` when nothing is loaded.
    fn confirm_discard(&self, frontend: &mut dyn Frontend) -> bool {
        if !self.is_loaded() {
            return true;
        }
        let confirmed = frontend.confirm(&self.overwrite_prompt());
        if !confirmed {
            tracing::debug!("user kept the loaded plan");
        }
        confirmed
    }

    /// 建立新計畫：確認後捨棄目前計畫並開啟計畫編輯器。 / Starts a new plan.
    ///
    /// After confirmation the loaded plan is discarded and a blank plan editor
    /// is returned; `None` when the user declined.
    pub fn request_new(&mut self, frontend: &mut dyn Frontend) -> Option<EditSession<PlanDraft>> {
        if !self.confirm_discard(frontend) {
            return None;
        }
        self.discard_plan();
        frontend.request_redraw();
        Some(EditSession::blank(&self.ctx))
    }

    /// Plan editor pre-populated with the loaded plan's header.
    pub fn edit_plan(&self) -> Option<EditSession<PlanDraft>> {
        self.plan
            .as_ref()
            .map(|header| EditSession::for_record(&self.ctx, header))
    }

    /// Applies a finished plan editor. Installs an empty plan when none is
    /// loaded; returns whether anything changed.
    pub fn complete_plan_edit(
        &mut self,
        session: EditSession<PlanDraft>,
        frontend: &mut dyn Frontend,
    ) -> bool {
        match session.finish() {
            EditOutcome::Saved { record, .. } => {
                if self.plan.is_none() {
                    self.entries.clear();
                    tracing::info!(plan = record.name(), "created plan");
                }
                self.plan = Some(record);
                frontend.request_redraw();
                true
            }
            EditOutcome::Cancelled => false,
        }
    }

    /// 開啟計畫檔案。 / Opens a plan file through the gateway.
    pub fn open(&mut self, frontend: &mut dyn Frontend) -> ActionOutcome {
        if !self.confirm_discard(frontend) {
            return ActionOutcome::Declined;
        }
        match self.gateway.import_plan(frontend) {
            Ok(Some(imported)) => {
                self.load_plan(imported.plan);
                frontend.request_redraw();
                ActionOutcome::Completed
            }
            Ok(None) => ActionOutcome::Cancelled,
            Err(err) => {
                tracing::warn!(error = %err, "import failed");
                let l10n = self.ctx.l10n();
                let detail = if err.is_file_access() {
                    l10n.text("alert.import.wrong.file.info").into_owned()
                } else {
                    err.to_string()
                };
                frontend.show_warning(&Notice {
                    title: self.ctx.dialog_title(),
                    header: l10n.text("alert.import.failed").into_owned(),
                    detail: Some(detail),
                });
                ActionOutcome::Failed(err)
            }
        }
    }

    /// 儲存計畫；未載入時不做任何事。 / Saves the loaded plan; a no-op without one.
    pub fn save(&mut self, frontend: &mut dyn Frontend) -> ActionOutcome {
        let Some(plan) = self.plan_snapshot() else {
            return ActionOutcome::Skipped;
        };
        let fallback_name = self.ctx.l10n().text("export.file.name").into_owned();
        match self.gateway.export_plan(&plan, frontend, &fallback_name) {
            Ok(Some(_)) => ActionOutcome::Completed,
            Ok(None) => ActionOutcome::Cancelled,
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                frontend.show_warning(&Notice {
                    title: self.ctx.dialog_title(),
                    header: self.ctx.l10n().text("alert.export.failed").into_owned(),
                    detail: Some(err.to_string()),
                });
                ActionOutcome::Failed(err)
            }
        }
    }

    /// Whether the application may terminate.
    pub fn request_quit(&self, frontend: &mut dyn Frontend) -> bool {
        self.confirm_discard(frontend)
    }

    /// 新增計畫項目；未載入計畫時顯示提示。 / Starts a new entry, or tells the user to load a plan first.
    pub fn begin_new_entry(
        &self,
        frontend: &mut dyn Frontend,
    ) -> Option<EditSession<EntryDraft>> {
        if !self.is_loaded() {
            frontend.show_info(&Notice {
                title: self.ctx.dialog_title(),
                header: self.ctx.l10n().text("alert.runningplan.null").into_owned(),
                detail: None,
            });
            return None;
        }
        Some(EditSession::blank(&self.ctx))
    }

    pub fn begin_edit_entry(&self, selected: Option<usize>) -> Option<EditSession<EntryDraft>> {
        let index = selection::resolve(selected, self.entries.len())?;
        let id = self.entries.records().id_at(index)?;
        let entry = self.entries.get(index)?;
        Some(EditSession::for_slot(&self.ctx, id, entry))
    }

    /// Applies a finished entry editor: new entries are appended, edited ones
    /// replace their own slot.
    pub fn complete_entry_edit(
        &mut self,
        session: EditSession<EntryDraft>,
        frontend: &mut dyn Frontend,
    ) -> RecordChange {
        if !self.is_loaded() {
            tracing::debug!("dropping entry edit, no plan loaded");
            return RecordChange::Unchanged;
        }
        let change = session.finish().apply_to(&mut self.entries);
        if matches!(change, RecordChange::Added(_) | RecordChange::Updated(_)) {
            frontend.request_redraw();
        }
        change
    }

    pub fn delete_entry(
        &mut self,
        selected: Option<usize>,
        frontend: &mut dyn Frontend,
    ) -> Option<Entry> {
        let index = selection::resolve(selected, self.entries.len())?;
        let removed = self.entries.remove_at(index)?;
        frontend.request_redraw();
        Some(removed)
    }

    /// Context-menu entry point of the entry table. Delete is applied
    /// directly; edit hands back a session for the frontend to drive.
    pub fn apply_context_action(
        &mut self,
        action: ContextAction,
        selected: Option<usize>,
        frontend: &mut dyn Frontend,
    ) -> Option<EditSession<EntryDraft>> {
        let resolved = selection::resolve_action(action, selected, self.entries.len())?;
        match resolved.action {
            ContextAction::Edit => self.begin_edit_entry(Some(resolved.index)),
            ContextAction::Delete => {
                self.delete_entry(Some(resolved.index), frontend);
                None
            }
        }
    }
}
