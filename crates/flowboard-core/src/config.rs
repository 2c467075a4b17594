//! Configuration for flowboard
//!
//! Stored in $XDG_CONFIG_HOME/flowboard/config.toml. Only settings live on
//! disk; the board itself is session state.

use crate::ViewOptions;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "flowboard";
const CONFIG_FILE: &str = "config.toml";

/// flowboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for generated column and task ids
    pub id_prefix: String,

    /// Start with the sample board and team
    pub seed_sample_data: bool,

    /// Base URL for task share links
    pub share_base_url: String,

    /// Log filter used when RUST_LOG is unset
    pub log_level: String,

    /// Log file for the TUI (defaults to the temp dir)
    pub log_file: Option<PathBuf>,

    /// Initial view settings
    #[serde(default)]
    pub view: ViewConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_prefix: "fb".to_string(),
            seed_sample_data: true,
            share_base_url: "http://localhost:3000".to_string(),
            log_level: "info".to_string(),
            log_file: None,
            view: ViewConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Initial card view options and archive visibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub show_description: bool,
    pub show_priority: bool,
    pub show_due_dates: bool,
    pub show_assignees: bool,
    pub show_archived: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_description: true,
            show_priority: true,
            show_due_dates: true,
            show_assignees: true,
            show_archived: false,
        }
    }
}

impl ViewConfig {
    pub fn options(&self) -> ViewOptions {
        ViewOptions {
            show_description: self.show_description,
            show_priority: self.show_priority,
            show_due_dates: self.show_due_dates,
            show_assignees: self.show_assignees,
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use colors in output
    pub colors: bool,

    /// Date format for due dates (strftime format)
    pub date_format: String,

    /// Column width in the TUI
    pub column_width: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            date_format: "%Y-%m-%d".to_string(),
            column_width: 32,
        }
    }
}

impl DisplayConfig {
    /// Format a due date with `date_format`, or ISO form if the pattern
    /// is not valid strftime.
    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            return date.to_string();
        }
        out
    }
}

impl Config {
    /// Default config location, None if no config dir can be determined
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load config from a TOML file; a missing file yields the defaults
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Other(format!("Invalid config: {}", e)))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from `path` if given, else from the default location
    pub fn load_or_default(path: Option<&Path>) -> crate::Result<Self> {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Save config to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Other(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generate a default config file with comments
    pub fn default_with_comments() -> String {
        r#"# flowboard configuration

# Prefix for generated column and task ids
id_prefix = "fb"

# Start with the sample board and team
seed_sample_data = true

# Base URL for task share links ({base}/{column}/{task})
share_base_url = "http://localhost:3000"

# Log filter used when RUST_LOG is unset
log_level = "info"

# Log file for the TUI (defaults to flowboard.log in the temp dir)
# log_file = "/tmp/flowboard.log"

[view]
show_description = true
show_priority = true
show_due_dates = true
show_assignees = true

# Show archived tasks and columns
show_archived = false

[display]
# Use colors in output
colors = true

# Date format for due dates (strftime format)
date_format = "%Y-%m-%d"

# Column width in the TUI
column_width = 32
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commented_default_matches_default() {
        let parsed: Config = toml::from_str(&Config::default_with_comments()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("id_prefix = \"task\"\n[view]\nshow_archived = true\n").unwrap();
        assert_eq!(parsed.id_prefix, "task");
        assert!(parsed.view.show_archived);
        assert!(parsed.view.show_priority);
        assert_eq!(parsed.display.column_width, 32);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = Config::default();
        config.seed_sample_data = false;
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_format_date_falls_back_to_iso() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
        let mut display = DisplayConfig::default();
        assert_eq!(display.format_date(date), "2025-04-30");

        display.date_format = "%d/%m/%Y".to_string();
        assert_eq!(display.format_date(date), "30/04/2025");

        display.date_format = "%Q".to_string();
        assert_eq!(display.format_date(date), "2025-04-30");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
