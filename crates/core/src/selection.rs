//! Maps a selected table row to an index that is safe to act on.
//! 將表格選取列轉換為可安全操作的索引。

/// 驗證選取列；超出範圍時回傳 `None`。 / Validates a selected row against the canonical length.
///
/// `None` stands for "no selection"; out-of-range rows also resolve to `None`
/// and the caller skips the action.
pub fn resolve(selected: Option<usize>, len: usize) -> Option<usize> {
    match selected {
        Some(index) if index < len => Some(index),
        Some(index) => {
            tracing::debug!(index, len, "ignoring stale selection");
            None
        }
        None => None,
    }
}

/// 表格右鍵選單動作。 / Context-menu actions offered on a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    Edit,
    Delete,
}

/// An action bound to a validated row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAction {
    pub action: ContextAction,
    pub index: usize,
}

pub fn resolve_action(
    action: ContextAction,
    selected: Option<usize>,
    len: usize,
) -> Option<ResolvedAction> {
    let index = resolve(selected, len)?;
    Some(ResolvedAction { action, index })
}
