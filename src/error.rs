//! Error types for githead.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for githead operations.
///
/// Every variant is recoverable at the [`GitHead`](crate::GitHead) boundary:
/// in the default mode the failing half of the result is replaced by its
/// configured default, in strict mode the error is returned to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// No `.git` directory was found at or above the search start.
    #[error("failed to find a git repository going upwards from: {}", start.display())]
    RepositoryNotFound {
        /// The directory the search started from.
        start: PathBuf,
    },

    /// The `HEAD` file is missing, unreadable, or blank.
    #[error("failed to read HEAD at {}: {reason}", path.display())]
    HeadUnreadable {
        /// Path of the `HEAD` file.
        path: PathBuf,
        /// Why the file could not be used.
        reason: String,
    },

    /// A ref file named by a symbolic ref is missing, unreadable, or blank.
    #[error("failed to read ref {name} at {}: {reason}", path.display())]
    TargetUnreadable {
        /// The ref name as written in the symbolic ref (e.g. `refs/heads/main`).
        name: String,
        /// The file the ref name maps to.
        path: PathBuf,
        /// Why the file could not be used.
        reason: String,
    },

    /// Symbolic ref indirection did not reach a commit within the depth bound.
    #[error("reference loop or too many levels of indirection resolving {name} (depth {depth})")]
    RefCycle {
        /// The ref the resolution started from.
        name: String,
        /// The depth at which resolution gave up.
        depth: usize,
    },

    /// A symbolic ref target has no usable trailing path segment.
    #[error("cannot derive a branch name from ref target: {target:?}")]
    BranchUndeterminable {
        /// The symbolic ref target.
        target: String,
    },

    /// A configuration file could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for githead operations.
pub type Result<T> = std::result::Result<T, Error>;
