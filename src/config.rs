//! Parser and import settings.
//!
//! Settings are read from an `excerpts.toml` when one is present; every field
//! falls back to a default so partial files are fine.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Name of the config file looked up by [`Config::discover`]
pub const CONFIG_FILE_NAME: &str = "excerpts.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub import: ImportConfig,
}

/// Settings for line classification in the Markdown parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct ParserConfig {
    /// Columns a leading tab counts for
    pub tab_size: u32,
    /// Prefixes that mark a list item; stripped from excerpt content
    pub list_markers: Vec<String>,
    /// Prefixes that mark a section break
    pub section_break_markers: Vec<String>,
    /// Round list-item indentation down to a multiple of `tab_size`
    pub normalize_list_indent: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            list_markers: vec!["- ".to_string(), "* ".to_string(), "| ".to_string()],
            section_break_markers: vec!["---".to_string(), "===".to_string()],
            normalize_list_indent: true,
        }
    }
}

/// Settings applied by the import manager to every source in a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct ImportConfig {
    /// Tags added to every excerpt
    pub default_tags: Vec<String>,
    /// Regex whose matches in a file name become tags
    pub filename_tag_pattern: Option<String>,
    /// Splits each filename match into several tags
    pub filename_tag_separator: Option<String>,
}

impl Config {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has wrongly typed fields
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load `excerpts.toml` from the working directory, or defaults if absent
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed
    pub fn discover() -> ConfigResult<Self> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
