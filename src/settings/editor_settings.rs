use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::HISTORY_LIMIT;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Directory holding the profiles
    pub profiles_dir: PathBuf,
    /// Extension of files treated as profiles
    pub extension: String,
    /// File backing the draft cache
    pub draft_file: PathBuf,
    /// Number of undo steps kept
    pub history_limit: usize,
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            profiles_dir: PathBuf::from("cfg"),
            extension: "ini".to_string(),
            draft_file: PathBuf::from(".ini-editor-drafts.json"),
            history_limit: HISTORY_LIMIT,
            log_level: "info".to_string(),
        }
    }
}

impl EditorSettings {
    /// Parse settings from TOML content
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load settings from a file if one is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
