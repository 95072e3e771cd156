/// Application configuration
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::AwardCounting;
use crate::models::{Category, Priority};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides the platform data directory (tasks, UI state, logs).
    pub data_dir: Option<PathBuf>,
    /// Counter source for awards: `live` or `lifetime`.
    pub award_counting: AwardCounting,
    /// Log level spec for the file logger (`info`, `debug`, `studyflow=trace`...).
    pub log_level: String,
    /// Pre-selected category in the new-task form.
    pub default_category: Category,
    /// Pre-selected priority in the new-task form.
    pub default_priority: Priority,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            award_counting: AwardCounting::Live,
            log_level: "info".to_string(),
            default_category: Category::School,
            default_priority: Priority::Medium,
        }
    }
}

impl Config {
    /// Directory holding the key-value store.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

/// Config file path
/// Linux: ~/.config/studyflow/config.toml
/// macOS: ~/Library/Application Support/studyflow/config.toml
/// Windows: %APPDATA%\studyflow\config.toml
pub fn get_config_path() -> Result<PathBuf> {
    let base = directories::BaseDirs::new().context("Failed to get user directories")?;
    Ok(base.config_dir().join("studyflow").join("config.toml"))
}

/// Platform data directory
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "studyflow")
        .context("Failed to get user directories")?;
    Ok(dirs.data_dir().to_path_buf())
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;

    Ok(config)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// First-run check: writes a default config when none exists.
/// Returns (config, is_first_run)
pub fn check_first_run() -> Result<(Config, bool)> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        let config = Config::default();
        save_config_to(&config, &config_path)?;
        Ok((config, true))
    } else {
        Ok((load_config_from(&config_path)?, false))
    }
}

/// Print the current configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current configuration:");
    println!("  data_dir:         {}", config.resolved_data_dir()?.display());
    println!("  award_counting:   {}", config.award_counting);
    println!("  log_level:        {}", config.log_level);
    println!("  default_category: {}", config.default_category);
    println!("  default_priority: {}", config.default_priority);
    println!();
    println!("Config file: {}", get_config_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "award_counting = \"lifetime\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.award_counting, AwardCounting::Lifetime);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.default_priority, Priority::Medium);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            data_dir: Some(dir.path().join("data")),
            default_category: Category::Personal,
            default_priority: Priority::High,
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
        assert_eq!(config.resolved_data_dir().unwrap(), dir.path().join("data"));
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "award_counting = \"forever\"\n").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
