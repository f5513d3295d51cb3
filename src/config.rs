//! Resolution settings.
//!
//! Every option a host can set is a field of [`HeadConfig`]. Hosts build it in
//! code, or load it from a TOML file where every key is optional:
//!
//! ```toml
//! repo_location = "."
//! search_parent_directories = true
//! default_branch = "unknown"
//! default_commit = "unknown"
//! fail_on_failure = false
//! property_prefix = "githead"
//! ```
//!
//! # Example
//!
//! ```
//! use githead::HeadConfig;
//!
//! let config = HeadConfig::from_toml_str("fail_on_failure = true").unwrap();
//! assert!(config.fail_on_failure);
//! assert_eq!(config.default_branch, "unknown");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Label used for a value that could not be resolved.
pub const UNKNOWN: &str = "unknown";

/// Prefix of the published property names (`githead.branch`, `githead.commit`).
pub const DEFAULT_PROPERTY_PREFIX: &str = "githead";

/// Configuration for resolving the branch and commit of a repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadConfig {
    /// Directory the repository search starts from.
    pub repo_location: PathBuf,
    /// Whether ancestors of `repo_location` are searched.
    pub search_parent_directories: bool,
    /// Branch reported when it cannot be resolved or `HEAD` is detached.
    pub default_branch: String,
    /// Commit reported when it cannot be resolved.
    pub default_commit: String,
    /// When `true`, any failure is returned as an error instead of being
    /// replaced by a default.
    pub fail_on_failure: bool,
    /// Prefix for the published property names.
    pub property_prefix: String,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            repo_location: PathBuf::from("."),
            search_parent_directories: true,
            default_branch: UNKNOWN.to_string(),
            default_commit: UNKNOWN.to_string(),
            fail_on_failure: false,
            property_prefix: DEFAULT_PROPERTY_PREFIX.to_string(),
        }
    }
}

impl HeadConfig {
    /// Default configuration searching from `repo_location`.
    pub fn new<P: Into<PathBuf>>(repo_location: P) -> Self {
        Self {
            repo_location: repo_location.into(),
            ..Default::default()
        }
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Loads a TOML file.
    ///
    /// A relative `repo_location` inside the file is taken relative to the
    /// directory containing the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        let mut config: HeadConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        if config.repo_location.is_relative() {
            if let Some(dir) = path.parent() {
                config.repo_location = dir.join(&config.repo_location);
            }
        }

        Ok(config)
    }

    /// Sets whether ancestor directories are searched.
    pub fn with_search_parent_directories(mut self, search: bool) -> Self {
        self.search_parent_directories = search;
        self
    }

    /// Sets the branch reported when it cannot be resolved.
    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }

    /// Sets the commit reported when it cannot be resolved.
    pub fn with_default_commit(mut self, commit: impl Into<String>) -> Self {
        self.default_commit = commit.into();
        self
    }

    /// Sets strict mode.
    pub fn with_fail_on_failure(mut self, strict: bool) -> Self {
        self.fail_on_failure = strict;
        self
    }

    /// Sets the prefix for published property names.
    pub fn with_property_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.property_prefix = prefix.into();
        self
    }
}
