use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use runplan_core::{FileRequest, Frontend, Notice, Prompt};

/// 終端機前端：檔案路徑由命令列參數提供。 / Terminal frontend; file choosers answer with paths given on the command line.
pub struct CliFrontend {
    pub open_path: Option<PathBuf>,
    pub save_path: Option<PathBuf>,
    assume_yes: bool,
}

impl CliFrontend {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            open_path: None,
            save_path: None,
            assume_yes,
        }
    }

    fn read_answer(&self, prompt: &Prompt) -> io::Result<bool> {
        let mut stderr = io::stderr().lock();
        write!(
            stderr,
            "{} [{}/{}] ",
            prompt.message, prompt.confirm_label, prompt.cancel_label
        )?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            writeln!(stderr)?;
            return Ok(false);
        }
        let answer = line.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes" || answer == prompt.confirm_label.to_lowercase())
    }
}

impl Frontend for CliFrontend {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        if self.assume_yes {
            return true;
        }
        match self.read_answer(prompt) {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(error = %err, "could not read confirmation");
                false
            }
        }
    }

    fn choose_open_file(&mut self, _request: &FileRequest) -> Option<PathBuf> {
        self.open_path.clone()
    }

    /// Falls back to the suggested name in the working directory.
    fn choose_save_file(&mut self, request: &FileRequest) -> Option<PathBuf> {
        self.save_path
            .clone()
            .or_else(|| request.suggested_name.as_ref().map(PathBuf::from))
    }

    fn show_warning(&mut self, notice: &Notice) {
        eprintln!("{}", notice.header);
        if let Some(detail) = &notice.detail {
            eprintln!("  {detail}");
        }
    }

    fn show_info(&mut self, notice: &Notice) {
        println!("{}", notice.header);
        if let Some(detail) = &notice.detail {
            println!("  {detail}");
        }
    }
}
