//! Display projection kept in lock-step with a canonical record list.
//! 與正式清單同步的顯示列投影。
//!
//! Rows are never patched in place: every mutation of a [`ProjectedList`]
//! regenerates the full row list from the canonical records, so row `i`
//! always describes record `i`.

use std::fmt;

use crate::context::{EditorContext, UnitColumns};
use crate::model::{Entry, Unit};
use crate::records::{RecordId, RecordList};

/// Translation of a domain record into a read-only display row.
pub trait Project {
    type Row: Clone + fmt::Debug + PartialEq;

    fn project(&self, ctx: &EditorContext) -> Self::Row;
}

/// 計畫項目表格的一列。 / One row of the entry table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub week: String,
    pub day: String,
    pub duration: String,
    pub units: String,
    /// Short label such as `Week 1, Day 1`.
    pub label: String,
}

/// 訓練單元表格的一列。 / One row of the unit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRow {
    pub duration: String,
    pub key: String,
    /// Empty unless [`UnitColumns::MovementName`] is active.
    pub name: String,
    /// Empty unless [`UnitColumns::RunningInfos`] is active.
    pub running_infos: String,
}

impl Project for Entry {
    type Row = EntryRow;

    fn project(&self, ctx: &EditorContext) -> EntryRow {
        let l10n = ctx.l10n();
        let week = self.week().to_string();
        let day = self.day().to_string();
        let units = self
            .units()
            .iter()
            .map(|unit| {
                let minutes = unit.duration_minutes().to_string();
                l10n.text_args("row.unit.summary", &[&minutes, unit.movement_type().key()])
            })
            .collect::<Vec<_>>()
            .join(", ");
        EntryRow {
            label: l10n.text_args("row.entry.label", &[&week, &day]),
            week,
            day: l10n.text(self.day_key()).into_owned(),
            duration: l10n.text_args("row.duration", &[&self.total_minutes().to_string()]),
            units,
        }
    }
}

impl Project for Unit {
    type Row = UnitRow;

    fn project(&self, ctx: &EditorContext) -> UnitRow {
        let (name, running_infos) = match ctx.unit_columns() {
            UnitColumns::MovementName => (self.movement_type().name().to_string(), String::new()),
            UnitColumns::RunningInfos => (
                String::new(),
                self.running_infos().unwrap_or_default().to_string(),
            ),
        };
        UnitRow {
            duration: ctx
                .l10n()
                .text_args("row.duration", &[&self.duration_minutes().to_string()]),
            key: self.movement_type().key().to_string(),
            name,
            running_infos,
        }
    }
}

/// 由正式紀錄重建顯示列（純函式）。 / Rebuilds display rows from canonical records; pure and total.
pub fn rebuild<'a, R>(records: impl IntoIterator<Item = &'a R>, ctx: &EditorContext) -> Vec<R::Row>
where
    R: Project + 'a,
{
    records.into_iter().map(|record| record.project(ctx)).collect()
}

/// 正式清單與其投影的組合，確保兩者長度與順序一致。 / A canonical list bundled with its projection, equal in length and order after every call.
#[derive(Debug, Clone)]
pub struct ProjectedList<R: Project> {
    records: RecordList<R>,
    rows: Vec<R::Row>,
    generation: u64,
    ctx: EditorContext,
}

impl<R> ProjectedList<R>
where
    R: Project + PartialEq,
{
    pub fn new(ctx: EditorContext) -> Self {
        Self {
            records: RecordList::new(),
            rows: Vec::new(),
            generation: 0,
            ctx,
        }
    }

    pub fn from_records(ctx: EditorContext, records: impl IntoIterator<Item = R>) -> Self {
        let mut list = Self::new(ctx);
        list.replace_all(records);
        list
    }

    pub fn records(&self) -> &RecordList<R> {
        &self.records
    }

    pub fn rows(&self) -> &[R::Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bumped on every rebuild; frontends redraw when it changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    /// Appends a record unless an equal one exists; the projection is rebuilt either way.
    pub fn append(&mut self, record: R) -> Option<RecordId> {
        let id = self.records.append(record);
        self.resync();
        id
    }

    pub fn update(&mut self, id: RecordId, record: R) -> bool {
        let updated = self.records.update(id, record);
        self.resync();
        updated
    }

    pub fn remove_at(&mut self, index: usize) -> Option<R> {
        let removed = self.records.remove_at(index);
        self.resync();
        removed
    }

    pub fn replace_all(&mut self, records: impl IntoIterator<Item = R>) {
        self.records.replace_all(records);
        self.resync();
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.resync();
    }

    fn resync(&mut self) {
        self.rows = rebuild(self.records.iter(), &self.ctx);
        self.generation += 1;
        tracing::debug!(
            rows = self.rows.len(),
            generation = self.generation,
            "projection rebuilt"
        );
    }
}

impl<R> ProjectedList<R>
where
    R: Project + PartialEq + Clone,
{
    pub fn to_vec(&self) -> Vec<R> {
        self.records.to_vec()
    }
}
