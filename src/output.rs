//! Publishing a resolved [`GitHead`] to a host.
//!
//! A host receives the two values as named properties
//! (`<prefix>.branch`, `<prefix>.commit`). They can be rendered as
//! `key=value` lines, as a JSON object, or as Cargo build-script directives.
//!
//! # Example
//!
//! A `build.rs` exposing `GITHEAD_BRANCH` and `GITHEAD_COMMIT` to the crate:
//!
//! ```no_run
//! fn main() {
//!     let config = githead::HeadConfig::new(env!("CARGO_MANIFEST_DIR"));
//!     githead::emit_cargo_directives(&config).unwrap();
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::HeadConfig;
use crate::error::Result;
use crate::refs::resolver::HEAD_FILE_NAME;
use crate::resolve::GitHead;

/// Named branch and commit values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Builds `<prefix>.branch` and `<prefix>.commit` from `head`.
    pub fn new(head: &GitHead, prefix: &str) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(format!("{}.branch", prefix), head.branch.clone());
        entries.insert(format!("{}.commit", prefix), head.commit.clone());
        Properties { entries }
    }

    /// Returns the value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates over the properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders one `key=value` line per property.
    pub fn to_text(&self) -> String {
        self.iter().map(|(k, v)| format!("{}={}\n", k, v)).collect()
    }

    /// Renders the properties as a pretty-printed JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Environment variable name for `<prefix>` and `suffix`: `githead` and
/// `BRANCH` give `GITHEAD_BRANCH`.
pub fn env_var_name(prefix: &str, suffix: &str) -> String {
    let prefix: String = prefix
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}", prefix, suffix)
}

/// Cargo build-script directives for `head`.
///
/// Sets `<PREFIX>_BRANCH` and `<PREFIX>_COMMIT` and asks Cargo to re-run the
/// build script whenever one of the metadata files that were read changes.
/// If `HEAD` itself could not be read, the expected `HEAD` path of the
/// located repository is watched instead.
pub fn cargo_directives(head: &GitHead, prefix: &str) -> Vec<String> {
    let mut directives = vec![
        format!(
            "cargo:rustc-env={}={}",
            env_var_name(prefix, "BRANCH"),
            head.branch
        ),
        format!(
            "cargo:rustc-env={}={}",
            env_var_name(prefix, "COMMIT"),
            head.commit
        ),
    ];

    let watched: Vec<PathBuf> = match (&head.root, head.files_read.is_empty()) {
        (Some(root), true) => vec![root.git_dir().join(HEAD_FILE_NAME)],
        _ => head.files_read.clone(),
    };

    directives.extend(
        watched
            .iter()
            .map(|path| format!("cargo:rerun-if-changed={}", path.display())),
    );

    directives
}

/// Resolves `config` and prints Cargo directives to stdout.
///
/// Intended for `build.rs`. Fails only in strict mode.
pub fn emit_cargo_directives(config: &HeadConfig) -> Result<GitHead> {
    let head = GitHead::resolve(config)?;
    for directive in cargo_directives(&head, &config.property_prefix) {
        println!("{}", directive);
    }
    Ok(head)
}
