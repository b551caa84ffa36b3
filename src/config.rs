//! Configuration management for the food catalogue TUI.
//!
//! Handles loading and saving configuration from JSONC files.
//! Manages the catalogue endpoint, category buttons, storage and logging paths.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config directory.
const APP_DIR: &str = "foody-tui";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalogue endpoint; relative image paths are resolved against it
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Category buttons, the first one should be "All"
    pub categories: Vec<String>,
    /// Rating storage directory (relative to config dir or absolute)
    pub storage_dir: String,
    /// Log filter directive, overridden by `RUST_LOG`
    pub log_level: String,
    /// Log file path (relative to config dir or absolute)
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            request_timeout_secs: 30,
            categories: ["All", "Breakfast", "Lunch", "Dinner"]
                .map(String::from)
                .to_vec(),
            storage_dir: "storage".to_string(),
            log_level: "info".to_string(),
            log_file: "foody-tui.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// Searches for config file in:
    /// 1. Provided path (if given)
    /// 2. `$XDG_CONFIG_HOME/foody-tui/config.jsonc`
    /// 3. `~/.config/foody-tui/config.jsonc`
    ///
    /// If no config file exists, returns default configuration. An empty
    /// category list falls back to the default buttons.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = serde_json::from_str(&strip_line_comments(&content))
            .with_context(|| "Failed to deserialize config")?;

        if config.categories.is_empty() {
            config.categories = Self::default().categories;
        }

        Ok(config)
    }

    /// Save configuration to file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Details
    /// Creates config directory if it doesn't exist.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, json)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get default configuration file path.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - `$XDG_CONFIG_HOME/foody-tui/config.jsonc` or
    ///   `~/.config/foody-tui/config.jsonc`
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(app_dir()?.join("config.jsonc"))
    }

    /// Rating storage directory.
    pub fn storage_dir_path(&self) -> Result<PathBuf> {
        resolve(&self.storage_dir)
    }

    /// Log file path.
    pub fn log_file_path(&self) -> Result<PathBuf> {
        resolve(&self.log_file)
    }
}

fn app_dir() -> Result<PathBuf> {
    let config_dir =
        config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
    Ok(config_dir.join(APP_DIR))
}

/// Absolute paths are returned as-is, relative ones land in the app config dir.
fn resolve(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(app_dir()?.join(path))
    }
}

/// Strip `//` comments so JSONC parses as JSON.
///
/// A `//` preceded by an odd number of quotes on its line is treated as part
/// of a string (escaped quotes are not handled).
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(strip_comment)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_comment(line: &str) -> &str {
    let mut start = 0;
    while let Some(offset) = line[start..].find("//") {
        let pos = start + offset;
        if line[..pos].matches('"').count() % 2 == 0 {
            return line[..pos].trim_end();
        }
        start = pos + 2;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.categories, vec!["All", "Breakfast", "Lunch", "Dinner"]);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load(Some(&temp_dir.path().join("nope.jsonc"))).unwrap();
        assert_eq!(loaded.base_url, Config::default().base_url);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");

        let config = Config {
            base_url: "http://food.local:8080".to_string(),
            categories: vec!["All".to_string(), "Snacks".to_string()],
            ..Config::default()
        };

        config.save(Some(&config_path)).unwrap();
        assert!(config_path.exists());

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.base_url, "http://food.local:8080");
        assert_eq!(loaded.categories, vec!["All", "Snacks"]);
    }

    #[test]
    fn test_config_jsonc_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");

        let jsonc_content = r#"{
            // Where the catalogue lives
            "base_url": "http://127.0.0.1:9000", // trailing comment
            "categories": [],
            "storage_dir": "/tmp/foody"
        }"#;

        fs::write(&config_path, jsonc_content).unwrap();

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.base_url, "http://127.0.0.1:9000");
        assert_eq!(loaded.categories, Config::default().categories);
        assert_eq!(loaded.storage_dir_path().unwrap(), PathBuf::from("/tmp/foody"));
    }

    #[test]
    fn test_strip_comment_keeps_urls() {
        assert_eq!(
            strip_comment(r#""base_url": "http://x", // note"#),
            r#""base_url": "http://x","#
        );
        assert_eq!(strip_comment("// whole line"), "");
        assert_eq!(strip_comment(r#""a": "b""#), r#""a": "b""#);
    }

    #[test]
    fn test_config_rejects_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");
        fs::write(&config_path, "{ base_url: nope }").unwrap();
        assert!(Config::load(Some(&config_path)).is_err());
    }
}
