//! Application configuration.

use std::path::Path;

use northwind_observability::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// File names searched for when no explicit config path is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["northwind.toml", ".northwind.toml", "northwind.json"];

/// Application configuration file. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub queries: QueryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parse TOML config text.
    pub fn from_toml(content: &str) -> Result<Self, AppError> {
        toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Parse JSON config text.
    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load a config file; `.json` files are JSON, anything else TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        let parsed = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        };
        parsed.map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSection {
    /// Title shown in the browser tab and sidebar.
    #[serde(default = "default_title")]
    pub title: String,
    /// Workload name attached to logs.
    #[serde(default = "default_workload")]
    pub workload: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            workload: default_workload(),
        }
    }
}

fn default_title() -> String {
    "Northwind Traders".to_string()
}

fn default_workload() -> String {
    "northwind".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Spin SQLite database label.
    #[serde(default = "default_label")]
    pub name: String,
    /// SQLite file used by native builds.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: default_label(),
            path: default_db_path(),
        }
    }
}

fn default_label() -> String {
    "default".to_string()
}

fn default_db_path() -> String {
    "northwind.db".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Spin key-value store label.
    #[serde(default = "default_label")]
    pub store: String,
    /// Name of the session cookie.
    #[serde(default = "default_cookie")]
    pub cookie: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: default_label(),
            cookie: default_cookie(),
        }
    }
}

fn default_cookie() -> String {
    "nw_session".to_string()
}

/// Fixed fetch limits. Offsets are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            list_limit: default_list_limit(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_list_limit() -> u32 {
    20
}

fn default_search_limit() -> u32 {
    50
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.app.title, "Northwind Traders");
        assert_eq!(config.session.cookie, "nw_session");
        assert_eq!(config.queries.list_limit, 20);
        assert_eq!(config.queries.search_limit, 50);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [app]
            title = "Traders"

            [queries]
            list_limit = 5

            [logging]
            level = "debug"
            format = "human"
            "#,
        )
        .unwrap();
        assert_eq!(config.app.title, "Traders");
        assert_eq!(config.app.workload, "northwind");
        assert_eq!(config.queries.list_limit, 5);
        assert_eq!(config.queries.search_limit, 50);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Human);
    }

    #[test]
    fn test_json_and_toml_agree() {
        let json = AppConfig::from_json(r#"{"database": {"path": "/tmp/nw.db"}}"#).unwrap();
        assert_eq!(json.database.path, "/tmp/nw.db");
        assert_eq!(json.database.name, "default");

        let text = json.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), json);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let err = AppConfig::from_toml("[logging]\nlevel = \"loud\"").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
