// Table settings
// Loaded from ~/.config/gridform/settings.json

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors from reading or writing a settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    Io(String),
    /// File contents are not valid settings JSON.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    // Field identifiers
    #[serde(rename = "fields.filler")]
    pub field_filler: char,

    // Cell defaults
    #[serde(rename = "cells.linkDefault")]
    pub link_default: String,

    #[serde(rename = "cells.tagSeparator")]
    pub tag_separator: String,

    // Choice matching for select and tag columns
    #[serde(rename = "choices.caseSensitive")]
    pub case_sensitive_choices: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            field_filler: '_',
            link_default: String::from("https://"),
            tag_separator: String::from(", "),
            case_sensitive_choices: true,
        }
    }
}

impl TableSettings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridform");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}: {}; using default settings", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Separator used when splitting typed tag text.
    /// Surrounding whitespace is not significant ("a, b" and "a,b" split alike).
    pub fn tag_split_separator(&self) -> &str {
        match self.tag_separator.trim() {
            "" => ",",
            sep => sep,
        }
    }
}
