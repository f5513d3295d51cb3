//! HEAD resolution results and branch naming.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::refs::RefValue;

/// The outcome of resolving `HEAD` in one repository.
///
/// The branch is always populated (with the caller's default when it could
/// not be derived); the commit is `None` when the ref chain could not be
/// followed to a hash.
#[derive(Debug)]
pub struct HeadResolution {
    /// The classified content of `HEAD`.
    pub head: RefValue,
    /// The branch label.
    pub branch: String,
    /// The commit hash, if the ref chain resolved.
    pub commit: Option<String>,
    /// Every metadata file read, `HEAD` first.
    pub files_read: Vec<PathBuf>,
    /// Failures encountered after `HEAD` was read, in the order they occurred.
    pub failures: Vec<Error>,
}

impl HeadResolution {
    /// Returns `true` if `HEAD` holds a commit hash directly.
    pub fn is_detached(&self) -> bool {
        !self.head.is_symbolic()
    }

    /// Returns the ref `HEAD` points at, e.g. `refs/heads/main`.
    pub fn symbolic_target(&self) -> Option<&str> {
        match &self.head {
            RefValue::Symbolic(target) => Some(target),
            RefValue::Direct(_) => None,
        }
    }

    /// Returns `true` if nothing had to be defaulted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.commit.is_some()
    }
}

/// Derives a branch label from a symbolic ref target.
///
/// The label is the last `/`-separated component, so `refs/heads/feature/x`
/// yields `x`. A target with no `/` is its own label.
///
/// # Errors
///
/// [`Error::BranchUndeterminable`] if the last component is empty, e.g. for
/// `refs/heads/` or a blank target.
pub fn branch_from_target(target: &str) -> Result<String> {
    let last = target.rsplit('/').next().unwrap_or_default().trim();

    if last.is_empty() {
        Err(Error::BranchUndeterminable {
            target: target.to_string(),
        })
    } else {
        Ok(last.to_string())
    }
}
