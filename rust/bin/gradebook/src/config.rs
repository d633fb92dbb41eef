//! Client configuration.
//!
//! Reads `~/.gradebook/config.toml`. Every key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use gradebook_client::{DEFAULT_BASE_URL, DEFAULT_PRIVILEGED_ROLES};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service URL (e.g. "http://127.0.0.1:8000").
    #[serde(default = "default_server")]
    pub server: String,

    /// Roles that may open group grades.
    #[serde(rename = "privileged-roles", default = "default_privileged_roles")]
    pub privileged_roles: Vec<String>,

    /// Where the bearer token is kept (default: ~/.gradebook/session.toml).
    #[serde(rename = "session-file", default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            privileged_roles: default_privileged_roles(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Default config file path: ~/.gradebook/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| dirs_path().join("session.toml"))
    }
}

fn default_server() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_privileged_roles() -> Vec<String> {
    DEFAULT_PRIVILEGED_ROLES.iter().map(|r| r.to_string()).collect()
}

/// Return the client directory (~/.gradebook).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".gradebook")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server, "http://127.0.0.1:8000");
        assert!(config.privileged_roles.iter().any(|r| r == "Teacher"));
        assert!(config.session_path().ends_with(".gradebook/session.toml"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = \"https://grades.example.edu\"\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.server, "https://grades.example.edu");
        assert_eq!(config.privileged_roles.len(), DEFAULT_PRIVILEGED_ROLES.len());
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_roundtrip() {
        let config = ClientConfig {
            server: "http://localhost:9000".to_string(),
            privileged_roles: vec!["Dean".to_string()],
            session_file: Some(PathBuf::from("/tmp/gb-session.toml")),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.server, "http://localhost:9000");
        assert_eq!(back.privileged_roles, vec!["Dean".to_string()]);
        assert_eq!(back.session_path(), PathBuf::from("/tmp/gb-session.toml"));
    }
}
