use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Name given to the user created on first launch
    #[serde(default = "default_user_name")]
    pub user_name: String,

    #[serde(default)]
    pub language: Language,

    #[serde(default = "default_routines")]
    pub default_routines: Vec<String>,

    #[serde(default = "default_seed_quotes")]
    pub seed_quotes: bool,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hugmi");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("hugmi.db").to_string_lossy().to_string()
}

fn default_user_name() -> String {
    "Friend".to_string()
}

fn default_routines() -> Vec<String> {
    vec![
        "Drink a glass of water".to_string(),
        "Stretch for five minutes".to_string(),
        "Make the bed".to_string(),
    ]
}

fn default_seed_quotes() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_name: default_user_name(),
            language: Language::default(),
            default_routines: default_routines(),
            seed_quotes: default_seed_quotes(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hugmi")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
db_path = "/tmp/hugmi-test.db"
language = "en"
"#,
        )
        .unwrap();

        assert_eq!(config.db_path, "/tmp/hugmi-test.db");
        assert_eq!(config.language, Language::En);
        assert_eq!(config.user_name, "Friend");
        assert_eq!(config.default_routines.len(), 3);
        assert!(config.seed_quotes);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let parsed: std::result::Result<Config, _> = toml::from_str(r#"language = "fr""#);
        assert!(parsed.is_err());
    }
}
