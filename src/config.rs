use std::path::{Path, PathBuf};
use thiserror::Error;

/// A custom error describing an unusable configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the remote repository URL cannot be empty")]
    EmptyRemoteUrl,
    #[error("the base directory {0} does not exist")]
    MissingBaseDir(String),
    #[error("the base directory {0} is not a directory")]
    NotADirectory(String),
}

/// The configured upstream and the directory holding one checkout per branch.
///
/// It is constructed once at startup and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    remote_url: String,
    base_dir: PathBuf,
}

impl Config {
    pub fn new(remote_url: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Config {
            remote_url: remote_url.into(),
            base_dir: base_dir.into(),
        }
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Check that the remote is set and the base directory is an existing directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote_url.trim().is_empty() {
            return Err(ConfigError::EmptyRemoteUrl);
        }

        let base_dir = self.base_dir.display().to_string();
        if !self.base_dir.exists() {
            Err(ConfigError::MissingBaseDir(base_dir))
        } else if !self.base_dir.is_dir() {
            Err(ConfigError::NotADirectory(base_dir))
        } else {
            Ok(())
        }
    }
}
