use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use runplan_settings::{Preferences, PreferencesStore};
use thiserror::Error;

use crate::codec::{CodecError, PlanCodec};
use crate::frontend::{FileRequest, Frontend};
use crate::model::Plan;
use crate::util::write_atomic;

/// 匯入與匯出計畫時的錯誤。 / Errors raised while importing or exporting a plan.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("plan file {path} does not exist")]
    Missing { path: PathBuf },
    #[error("{path} is not a regular file")]
    NotAFile { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
    #[error("failed to serialize plan for {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    /// Whether the chosen path itself was unusable, as opposed to its contents.
    pub fn is_file_access(&self) -> bool {
        matches!(
            self,
            PersistenceError::Missing { .. }
                | PersistenceError::NotAFile { .. }
                | PersistenceError::Unreadable { .. }
        )
    }

    pub fn path(&self) -> &Path {
        match self {
            PersistenceError::Missing { path }
            | PersistenceError::NotAFile { path }
            | PersistenceError::Unreadable { path, .. }
            | PersistenceError::Parse { path, .. }
            | PersistenceError::Serialization { path, .. }
            | PersistenceError::Write { path, .. } => path,
        }
    }
}

/// 匯入成功的計畫與其來源路徑。 / A successfully imported plan and the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedPlan {
    pub path: PathBuf,
    pub plan: Plan,
}

/// 透過檔案選擇器讀寫整份計畫。 / Reads and writes whole plans through file choosers.
///
/// Owns the preference store because the last used directory is written back
/// as soon as a file has been chosen.
pub struct PersistenceGateway {
    preferences: PreferencesStore,
    codec: Box<dyn PlanCodec>,
}

impl PersistenceGateway {
    pub fn new(preferences: PreferencesStore, codec: Box<dyn PlanCodec>) -> Self {
        Self { preferences, codec }
    }

    pub fn preferences(&self) -> &Preferences {
        self.preferences.preferences()
    }

    pub fn extension(&self) -> &'static str {
        self.codec.extension()
    }

    /// 檔案選擇器的起始目錄。 / Starting directory for file choosers.
    pub fn initial_directory(&self) -> PathBuf {
        let prefs = self.preferences.preferences();
        if prefs.use_last_directory {
            if let Some(dir) = prefs.last_directory() {
                return dir.to_path_buf();
            }
        }
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
    }

    /// Persists the parent directory of `chosen`. Failures are logged only.
    pub fn remember_directory(&mut self, chosen: &Path) {
        let Some(parent) = chosen.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
            return;
        };
        if let Err(err) = self.preferences.remember_directory(parent) {
            tracing::warn!(error = %err, "could not remember last directory");
        }
    }

    /// File name offered by the save chooser: the plan name without whitespace.
    pub fn suggested_file_name(&self, plan_name: &str, fallback_name: &str) -> String {
        let stem: String = plan_name.chars().filter(|c| !c.is_whitespace()).collect();
        let stem = if stem.is_empty() { fallback_name } else { &stem };
        format!("{stem}.{}", self.codec.extension())
    }

    /// Decodes the plan stored at `path`.
    pub fn load(&self, path: &Path) -> Result<Plan, PersistenceError> {
        let bytes = fs::read(path).map_err(|source| PersistenceError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.codec
            .decode(&bytes)
            .map_err(|source| PersistenceError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Encodes `plan` and writes it atomically to `path`.
    pub fn store(&self, plan: &Plan, path: &Path) -> Result<(), PersistenceError> {
        let bytes = self
            .codec
            .encode(plan)
            .map_err(|source| PersistenceError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;
        write_atomic(path, &bytes).map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 經由開啟對話框匯入計畫。 / Imports a plan through the open chooser.
    ///
    /// `Ok(None)` means the chooser was dismissed. The chosen directory is
    /// remembered once the path is known to be a readable file, even when
    /// decoding then fails.
    pub fn import_plan(
        &mut self,
        frontend: &mut dyn Frontend,
    ) -> Result<Option<ImportedPlan>, PersistenceError> {
        let request = FileRequest {
            initial_directory: self.initial_directory(),
            suggested_name: None,
            extension: self.codec.extension().to_string(),
        };
        let Some(path) = frontend.choose_open_file(&request) else {
            return Ok(None);
        };
        check_readable(&path)?;
        self.remember_directory(&path);
        let plan = self.load(&path)?;
        tracing::info!(path = %path.display(), plan = %plan, "imported plan");
        Ok(Some(ImportedPlan { path, plan }))
    }

    /// 經由儲存對話框匯出計畫。 / Exports a plan through the save chooser.
    ///
    /// A chosen path without an extension gets the codec's extension.
    pub fn export_plan(
        &mut self,
        plan: &Plan,
        frontend: &mut dyn Frontend,
        fallback_name: &str,
    ) -> Result<Option<PathBuf>, PersistenceError> {
        let request = FileRequest {
            initial_directory: self.initial_directory(),
            suggested_name: Some(self.suggested_file_name(plan.name(), fallback_name)),
            extension: self.codec.extension().to_string(),
        };
        let Some(mut path) = frontend.choose_save_file(&request) else {
            return Ok(None);
        };
        if path.extension().is_none() {
            path.set_extension(self.codec.extension());
        }
        self.remember_directory(&path);
        self.store(plan, &path)?;
        tracing::info!(path = %path.display(), plan = %plan, "exported plan");
        Ok(Some(path))
    }
}

fn check_readable(path: &Path) -> Result<(), PersistenceError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(PersistenceError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(PersistenceError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if !metadata.is_file() {
        return Err(PersistenceError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    fs::File::open(path)
        .map(drop)
        .map_err(|source| PersistenceError::Unreadable {
            path: path.to_path_buf(),
            source,
        })
}
