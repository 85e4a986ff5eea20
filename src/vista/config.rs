//! # Configuration
//!
//! `config.json` in the data directory, read with serde defaults so a partial
//! or missing file still loads.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `backend` | `file` | `file` or `rest` |
//! | `database_file` | `<data dir>/database.json` | Document used by the file backend |
//! | `database_url` | none | Base URL of the hosted database |
//! | `auth_token` | none | `auth` parameter sent with every REST request |
//! | `timeout_secs` | `10` | Per-request REST timeout |
//! | `cascade_workspace_tasks` | `false` | Delete a workspace's tasks along with it |
//!
//! `VISTA_DATABASE_URL` and `VISTA_AUTH_TOKEN` override the stored values at
//! startup without being written back. `VISTA_HOME` replaces the data directory.

use crate::error::{Result, VistaError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_HOME: &str = "VISTA_HOME";
pub const ENV_DATABASE_URL: &str = "VISTA_DATABASE_URL";
pub const ENV_AUTH_TOKEN: &str = "VISTA_AUTH_TOKEN";

pub const KEYS: &[&str] = &[
    "backend",
    "database_file",
    "database_url",
    "auth_token",
    "timeout_secs",
    "cascade_workspace_tasks",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Rest,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::File => "file",
            Backend::Rest => "rest",
        })
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "rest" => Ok(Backend::Rest),
            other => Err(format!("unknown backend {other:?} (expected file or rest)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VistaConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Relative paths resolve against the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub cascade_workspace_tasks: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for VistaConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            database_file: None,
            database_url: None,
            auth_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cascade_workspace_tasks: false,
        }
    }
}

impl VistaConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Apply `VISTA_DATABASE_URL` / `VISTA_AUTH_TOKEN` when set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(ENV_DATABASE_URL).ok(),
            std::env::var(ENV_AUTH_TOKEN).ok(),
        )
    }

    fn with_overrides(mut self, url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.auth_token = Some(token);
        }
        self
    }

    pub fn database_file(&self, data_dir: &Path) -> PathBuf {
        match &self.database_file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => data_dir.join(file),
            None => data_dir.join("database.json"),
        }
    }

    /// Keys may be written `snake_case` or `kebab-case`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match normalize_key(key).as_str() {
            "backend" => self.backend.to_string(),
            "database_file" => self
                .database_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "database_url" => self.database_url.clone().unwrap_or_default(),
            "auth_token" => self
                .auth_token
                .as_ref()
                .map(|_| "********".to_string())
                .unwrap_or_default(),
            "timeout_secs" => self.timeout_secs.to_string(),
            "cascade_workspace_tasks" => self.cascade_workspace_tasks.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// An empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        match normalize_key(key).as_str() {
            "backend" => self.backend = value.parse().map_err(VistaError::Config)?,
            "database_file" => self.database_file = optional(value).map(PathBuf::from),
            "database_url" => {
                if let Some(url) = optional(value) {
                    reqwest::Url::parse(&url).map_err(|e| {
                        VistaError::Config(format!("invalid database_url {url:?}: {e}"))
                    })?;
                    self.database_url = Some(url);
                } else {
                    self.database_url = None;
                }
            }
            "auth_token" => self.auth_token = optional(value),
            "timeout_secs" => {
                self.timeout_secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        VistaError::Config(format!(
                            "timeout_secs must be a positive number of seconds, got {value:?}"
                        ))
                    })?
            }
            "cascade_workspace_tasks" => {
                self.cascade_workspace_tasks = parse_bool(value).ok_or_else(|| {
                    VistaError::Config(format!(
                        "cascade_workspace_tasks must be true or false, got {value:?}"
                    ))
                })?
            }
            _ => return Err(VistaError::Config(format!("Unknown config key: {key}"))),
        }
        Ok(())
    }
}

/// `VISTA_HOME`, else the platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(ENV_HOME).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("io", "projectvista", "vista")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| VistaError::Config("could not determine a data directory".to_string()))
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let config = VistaConfig::default();
        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.cascade_workspace_tasks);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let temp = tempdir().unwrap();
        assert_eq!(VistaConfig::load(temp.path()).unwrap(), VistaConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), r#"{"backend": "rest"}"#).unwrap();
        let config = VistaConfig::load(temp.path()).unwrap();
        assert_eq!(config.backend, Backend::Rest);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn save_and_load() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("nested");
        let mut config = VistaConfig::default();
        config.set("cascade-workspace-tasks", "true").unwrap();
        config.set("database_url", "https://demo.firebaseio.com").unwrap();
        config.save(&dir).unwrap();

        let loaded = VistaConfig::load(&dir).unwrap();
        assert!(loaded.cascade_workspace_tasks);
        assert_eq!(loaded.database_url.as_deref(), Some("https://demo.firebaseio.com"));
    }

    #[test]
    fn rejects_bad_values_and_keys() {
        let mut config = VistaConfig::default();
        assert!(config.set("backend", "postgres").is_err());
        assert!(config.set("backend", "memory").is_err());
        assert!(config.set("timeout_secs", "0").is_err());
        assert!(config.set("cascade_workspace_tasks", "maybe").is_err());
        assert!(config.set("database_url", "not a url").is_err());
        let err = config.set("colour", "blue").unwrap_err();
        assert_eq!(err.to_string(), "Config error: Unknown config key: colour");
        assert_eq!(config, VistaConfig::default());
    }

    #[test]
    fn get_masks_the_token() {
        let mut config = VistaConfig::default();
        config.set("auth_token", "secret").unwrap();
        assert_eq!(config.get("auth-token").as_deref(), Some("********"));
        assert_eq!(config.get("nope"), None);
    }

    #[test]
    fn overrides_replace_stored_values() {
        let config = VistaConfig::default().with_overrides(
            Some("https://override.example".to_string()),
            Some(String::new()),
        );
        assert_eq!(config.database_url.as_deref(), Some("https://override.example"));
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn database_file_resolves_against_data_dir() {
        let dir = Path::new("/data");
        let mut config = VistaConfig::default();
        assert_eq!(config.database_file(dir), dir.join("database.json"));
        config.set("database_file", "backup.json").unwrap();
        assert_eq!(config.database_file(dir), dir.join("backup.json"));
    }
}
