//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Address to bind
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for any path without a route
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            web_root: default_web_root(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding `status.json`
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Working tree that publishes are committed in
    #[serde(default = "default_repo_dir")]
    pub repo_dir: PathBuf,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            repo_dir: default_repo_dir(),
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

fn default_bind() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }
fn default_web_root() -> PathBuf { PathBuf::from(".") }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_repo_dir() -> PathBuf { PathBuf::from(".") }
fn default_remote() -> String { "origin".to_string() }
fn default_branch() -> String { "main".to_string() }

impl ServerConfig {
    /// Parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn status_path(&self) -> PathBuf {
        self.data.dir.join("status.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.git.remote, "origin");
        assert_eq!(config.git.branch, "main");
        assert_eq!(config.status_path(), PathBuf::from("data/status.json"));
    }

    #[test]
    fn test_partial_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            [http]
            port = 8080

            [git]
            branch = "pages"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.bind, "0.0.0.0");
        assert_eq!(config.git.branch, "pages");
        assert_eq!(config.git.remote, "origin");
        assert_eq!(config.data.dir, PathBuf::from("data"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load_or_default("/nonexistent/lifehub-server.toml").unwrap();
        assert_eq!(config.http.port, 3000);
    }
}
