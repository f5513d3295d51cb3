//! Locating a git repository on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::infra::absolutize;
use crate::refs::RefStore;

/// Name of the metadata folder at a repository root.
pub const GIT_DIR_NAME: &str = ".git";

/// A located git repository.
///
/// Holds the absolute working directory and the `.git` directory inside it.
/// The `.git` directory was verified to be a directory when the value was
/// created; nothing else about its contents is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRoot {
    /// The root directory of the working tree.
    work_dir: PathBuf,
    /// The path to the `.git` directory.
    git_dir: PathBuf,
}

impl RepositoryRoot {
    /// Finds the repository containing `start`.
    ///
    /// `start` is canonicalized first (falling back to an absolute path if
    /// that fails). If `start/.git` is a directory, `start` is the root.
    /// Otherwise, when `search_parents` is set, each ancestor is tried in
    /// turn until one matches or the filesystem root is passed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RepositoryNotFound`] when no directory matches.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use githead::RepositoryRoot;
    ///
    /// let root = RepositoryRoot::locate("path/to/repo/src", true).unwrap();
    /// println!("found {}", root.git_dir().display());
    /// ```
    pub fn locate<P: AsRef<Path>>(start: P, search_parents: bool) -> Result<Self> {
        let base = absolutize(start.as_ref());
        info!(location = %base.display(), "searching for git repository");

        let mut current: Option<&Path> = Some(&base);

        while let Some(dir) = current {
            debug!(dir = %dir.display(), "probing for .git directory");

            let git_dir = dir.join(GIT_DIR_NAME);
            if git_dir.is_dir() {
                info!(root = %dir.display(), "found git repository");
                return Ok(RepositoryRoot {
                    work_dir: dir.to_path_buf(),
                    git_dir,
                });
            }

            if !search_parents {
                break;
            }
            current = dir.parent();
        }

        Err(Error::RepositoryNotFound { start: base })
    }

    /// Opens the repository rooted exactly at `path`, without searching
    /// parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::locate(path, false)
    }

    /// Discovers the nearest repository at or above `path`.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::locate(path, true)
    }

    /// Returns the path to the repository root (working directory).
    pub fn path(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the path to the `.git` directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Returns a ref store reading from this repository's `.git` directory.
    pub fn refs(&self) -> RefStore {
        RefStore::new(&self.git_dir)
    }
}
