use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::localization::{normalize_locale_tag, system_locale};

const PREFERENCES_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 編輯工作階段共用的使用者偏好。 / User preferences shared by the whole editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default = "default_true")]
    pub use_last_directory: bool,
    #[serde(default)]
    pub last_directory: String,
    #[serde(default = "system_locale")]
    pub locale: String,
    /// Units carry running infos instead of movement names (iCal import mode).
    #[serde(default)]
    pub ical_mode: bool,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            debug_mode: false,
            use_last_directory: true,
            last_directory: String::new(),
            locale: system_locale(),
            ical_mode: false,
        }
    }
}

impl Preferences {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
        self.locale = normalize_locale_tag(&self.locale).unwrap_or_else(system_locale);
        let trimmed = self.last_directory.trim();
        if trimmed.len() != self.last_directory.len() {
            self.last_directory = trimmed.to_string();
        }
    }

    /// 回傳記住的最後目錄（若有）。 / Returns the remembered directory, if any.
    pub fn last_directory(&self) -> Option<&Path> {
        if self.last_directory.is_empty() {
            None
        } else {
            Some(Path::new(&self.last_directory))
        }
    }
}

#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut data = Preferences::default();
            data.sanitize();
            return Ok(Self { path, data });
        }

        let contents = fs::read_to_string(&path).map_err(|source| PreferencesError::Read {
            path: path.clone(),
            source,
        })?;
        let mut data: Preferences =
            serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
                path: path.clone(),
                source,
            })?;
        data.sanitize();
        Ok(Self { path, data })
    }

    /// 載入偏好；失敗時記錄警告並改用預設值。 / Loads preferences, falling back to defaults when the store is unusable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "preferences unavailable, using defaults");
                let mut data = Preferences::default();
                data.sanitize();
                Self::new(path, data)
            }
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    pub fn update<F>(&mut self, mut op: F) -> Result<(), PreferencesError>
    where
        F: FnMut(&mut Preferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    /// 記住最後使用的目錄並立即寫回。 / Remembers the last used directory and writes it through.
    ///
    /// The in-memory value changes even when the write fails.
    pub fn remember_directory(&mut self, directory: &Path) -> Result<(), PreferencesError> {
        let value = directory.to_string_lossy().into_owned();
        if self.data.last_directory == value {
            return Ok(());
        }
        self.update(|prefs| prefs.last_directory = value.clone())
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&self.data).map_err(|source| {
            PreferencesError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
