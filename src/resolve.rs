//! The caller-facing entry point: locate, resolve, substitute defaults.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::HeadConfig;
use crate::error::{Error, Result};
use crate::repository::RepositoryRoot;

/// The branch and commit of a repository, ready to publish.
///
/// Both values are always populated. Whatever could not be resolved holds
/// the configured default and the reason is kept in
/// [`failures`](Self::failures).
#[derive(Debug)]
pub struct GitHead {
    /// The branch label.
    pub branch: String,
    /// The commit hash.
    pub commit: String,
    /// The repository that was found, if any.
    pub root: Option<RepositoryRoot>,
    /// Metadata files read while resolving, `HEAD` first.
    pub files_read: Vec<PathBuf>,
    /// Failures that caused a default to be substituted.
    pub failures: Vec<Error>,
}

impl GitHead {
    /// Resolves the branch and commit described by `config`.
    ///
    /// In the default mode this never fails: each failure is logged as a
    /// warning and the affected half falls back to `default_branch` or
    /// `default_commit`. With `fail_on_failure` set, the first failure is
    /// returned instead and no defaults are substituted.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use githead::{GitHead, HeadConfig};
    ///
    /// let head = GitHead::resolve(&HeadConfig::new(".")).unwrap();
    /// println!("{}/{}", head.branch, head.commit);
    /// ```
    pub fn resolve(config: &HeadConfig) -> Result<GitHead> {
        let mut head = GitHead {
            branch: config.default_branch.clone(),
            commit: config.default_commit.clone(),
            root: None,
            files_read: Vec::new(),
            failures: Vec::new(),
        };

        match RepositoryRoot::locate(
            &config.repo_location,
            config.search_parent_directories,
        ) {
            Ok(root) => {
                match root.refs().resolve_head(&config.default_branch) {
                    Ok(resolution) => {
                        info!(head = ?resolution.head, "read HEAD");
                        head.branch = resolution.branch;
                        if let Some(commit) = resolution.commit {
                            head.commit = commit;
                        }
                        head.files_read = resolution.files_read;
                        head.failures = resolution.failures;
                    }
                    Err(e) => head.failures.push(e),
                }
                head.root = Some(root);
            }
            Err(e) => head.failures.push(e),
        }

        if config.fail_on_failure && !head.failures.is_empty() {
            return Err(head.failures.remove(0));
        }

        for failure in &head.failures {
            warn!(error = %failure, "failed to resolve branch and/or commit; using defaults");
        }
        info!(branch = %head.branch, commit = %head.commit, "resolved git head");

        Ok(head)
    }

    /// Returns `true` if no default had to be substituted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
