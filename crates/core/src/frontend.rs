//! Seam between the editing engine and whatever presents it.
//! 編輯引擎與呈現層之間的介面。

use std::path::PathBuf;

/// 破壞性動作前的確認提示。 / Binary confirm/cancel prompt shown before destructive actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

/// 檔案選擇對話框請求。 / Request for a file chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub initial_directory: PathBuf,
    /// Pre-filled file name; only set for save choosers.
    pub suggested_name: Option<String>,
    pub extension: String,
}

/// 警告或資訊訊息。 / Warning or informational message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub header: String,
    pub detail: Option<String>,
}

/// 呈現層需提供的互動能力。 / Interactions a presentation layer provides to the document session.
pub trait Frontend {
    /// Returns `true` when the user confirms.
    fn confirm(&mut self, prompt: &Prompt) -> bool;

    /// `None` when the chooser was dismissed.
    fn choose_open_file(&mut self, request: &FileRequest) -> Option<PathBuf>;

    fn choose_save_file(&mut self, request: &FileRequest) -> Option<PathBuf>;

    fn show_warning(&mut self, notice: &Notice);

    fn show_info(&mut self, notice: &Notice);

    /// Called after the visible plan state changed.
    fn request_redraw(&mut self) {}
}
