//! Git reference resolution.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::infra::{io_reason, read_first_line};
use crate::refs::head::{branch_from_target, HeadResolution};

/// Maximum number of symbolic indirections followed before giving up.
///
/// A well-formed repository needs one (`HEAD -> refs/heads/<branch>`).
pub const MAX_REF_DEPTH: usize = 10;

/// Name of the HEAD file inside the `.git` directory.
pub const HEAD_FILE_NAME: &str = "HEAD";

/// Marker that introduces a symbolic ref. Matched case-insensitively.
const REF_MARKER: &str = "ref:";

/// The value stored in a ref file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    /// A direct reference to a commit hash.
    Direct(String),
    /// A symbolic reference to another ref (e.g., HEAD -> refs/heads/main).
    Symbolic(String),
}

impl RefValue {
    /// Classifies a single trimmed line read from a ref file.
    ///
    /// Lines starting with `ref:` (in any letter case) are symbolic; the
    /// target is trimmed and stripped of leading `/` so it always stays
    /// relative to the `.git` directory. Everything else is taken verbatim as
    /// a commit hash; no hex validation is applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use githead::RefValue;
    ///
    /// assert_eq!(
    ///     RefValue::parse("ref: refs/heads/main"),
    ///     RefValue::Symbolic("refs/heads/main".to_string())
    /// );
    /// assert_eq!(
    ///     RefValue::parse("da39a3ee5e6b4b0d3255bfef95601890afd80709"),
    ///     RefValue::Direct("da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string())
    /// );
    /// ```
    pub fn parse(line: &str) -> RefValue {
        let line = line.trim();

        match strip_ref_marker(line) {
            Some(target) => {
                let target = target.trim().trim_start_matches('/');
                RefValue::Symbolic(target.to_string())
            }
            None => RefValue::Direct(line.to_string()),
        }
    }

    /// Returns `true` for a symbolic ref.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, RefValue::Symbolic(_))
    }
}

fn strip_ref_marker(line: &str) -> Option<&str> {
    let prefix = line.get(..REF_MARKER.len())?;
    if prefix.eq_ignore_ascii_case(REF_MARKER) {
        Some(&line[REF_MARKER.len()..])
    } else {
        None
    }
}

/// A fully dereferenced reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// The name of the last ref file read (e.g., "refs/heads/main"), or the
    /// starting name when it held a hash directly.
    pub name: String,
    /// The commit hash the chain ends at.
    pub commit: String,
}

/// A store for reading and resolving loose git references.
///
/// References are read from individual files below the `.git` directory.
/// `packed-refs` is not consulted, so a ref that only exists in packed form
/// reports [`Error::TargetUnreadable`].
#[derive(Debug, Clone)]
pub struct RefStore {
    /// Path to the `.git` directory.
    git_dir: PathBuf,
}

impl RefStore {
    /// Creates a new RefStore for the given `.git` directory.
    pub fn new<P: AsRef<Path>>(git_dir: P) -> Self {
        RefStore {
            git_dir: git_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the `.git` directory this store reads from.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Returns the path of the `HEAD` file.
    pub fn head_path(&self) -> PathBuf {
        self.git_dir.join(HEAD_FILE_NAME)
    }

    /// Maps a ref name such as `refs/heads/feature/x` to its file.
    ///
    /// Each `/`-separated component is joined with the platform separator.
    /// Names that would leave the `.git` directory are rejected.
    pub fn ref_path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let invalid = |reason: &str| Error::TargetUnreadable {
            name: name.to_string(),
            path: self.git_dir.join(relative),
            reason: reason.to_string(),
        };

        if name.split('/').all(str::is_empty) {
            return Err(invalid("ref name is empty"));
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(invalid("ref name does not stay inside the git directory"));
        }

        Ok(name
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.git_dir.clone(), |path, part| path.join(part)))
    }

    /// Reads and classifies `HEAD`.
    ///
    /// # Errors
    ///
    /// [`Error::HeadUnreadable`] if the file is missing, unreadable, not
    /// UTF-8, or contains no non-blank line.
    pub fn read_head(&self) -> Result<RefValue> {
        let path = self.head_path();

        match read_first_line(&path) {
            Ok(Some(line)) => Ok(RefValue::parse(&line)),
            Ok(None) => Err(Error::HeadUnreadable {
                path,
                reason: "file is empty".to_string(),
            }),
            Err(e) => Err(Error::HeadUnreadable {
                reason: io_reason(&e),
                path,
            }),
        }
    }

    /// Reads and classifies the ref file for `name` (e.g. `refs/heads/main`).
    ///
    /// # Errors
    ///
    /// [`Error::TargetUnreadable`] if the file is missing, unreadable, not
    /// UTF-8, blank, or the name escapes the `.git` directory.
    pub fn read_ref_file(&self, name: &str) -> Result<RefValue> {
        let path = self.ref_path(name)?;
        self.read_target(name, path)
    }

    fn read_target(&self, name: &str, path: PathBuf) -> Result<RefValue> {
        match read_first_line(&path) {
            Ok(Some(line)) => Ok(RefValue::parse(&line)),
            Ok(None) => Err(Error::TargetUnreadable {
                name: name.to_string(),
                path,
                reason: "file is empty".to_string(),
            }),
            Err(e) => Err(Error::TargetUnreadable {
                name: name.to_string(),
                reason: io_reason(&e),
                path,
            }),
        }
    }

    /// Dereferences the ref `name` until a commit hash is reached.
    ///
    /// `HEAD` is read through [`read_head`](Self::read_head); any other name
    /// through [`read_ref_file`](Self::read_ref_file).
    pub fn dereference(&self, name: &str) -> Result<ResolvedRef> {
        let value = if name == HEAD_FILE_NAME {
            self.read_head()?
        } else {
            self.read_ref_file(name)?
        };

        self.follow(name, value, &mut Vec::new())
    }

    /// Follows `value` through symbolic refs with a bounded loop.
    ///
    /// Every ref file read is appended to `files_read`.
    fn follow(
        &self,
        origin: &str,
        mut value: RefValue,
        files_read: &mut Vec<PathBuf>,
    ) -> Result<ResolvedRef> {
        let mut name = origin.to_string();
        let mut depth = 0;

        loop {
            match value {
                RefValue::Direct(commit) => {
                    debug!(name = %name, commit = %commit, depth, "dereferenced ref");
                    return Ok(ResolvedRef { name, commit });
                }
                RefValue::Symbolic(target) => {
                    if depth >= MAX_REF_DEPTH {
                        return Err(Error::RefCycle {
                            name: origin.to_string(),
                            depth,
                        });
                    }
                    depth += 1;

                    trace!(from = %name, to = %target, depth, "following symbolic ref");
                    let path = self.ref_path(&target)?;
                    files_read.push(path.clone());
                    value = self.read_target(&target, path)?;
                    name = target;
                }
            }
        }
    }

    /// Resolves `HEAD` into a branch label and a commit hash.
    ///
    /// Only an unreadable `HEAD` fails the whole call. Everything after
    /// that is recorded in [`HeadResolution::failures`]:
    ///
    /// - a symbolic target without a usable last segment keeps
    ///   `default_branch` and records [`Error::BranchUndeterminable`];
    /// - a detached `HEAD` keeps `default_branch` without a failure;
    /// - a broken or cyclic ref chain leaves `commit` unset and records the
    ///   error, while the branch stays resolved.
    pub fn resolve_head(&self, default_branch: &str) -> Result<HeadResolution> {
        let head = self.read_head()?;
        let mut files_read = vec![self.head_path()];
        let mut failures = Vec::new();

        let branch = match &head {
            RefValue::Symbolic(target) => match branch_from_target(target) {
                Ok(branch) => branch,
                Err(e) => {
                    failures.push(e);
                    default_branch.to_string()
                }
            },
            RefValue::Direct(_) => default_branch.to_string(),
        };

        let commit = match self.follow(HEAD_FILE_NAME, head.clone(), &mut files_read) {
            Ok(resolved) => Some(resolved.commit),
            Err(e) => {
                failures.push(e);
                None
            }
        };

        Ok(HeadResolution {
            head,
            branch,
            commit,
            files_read,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_git_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path();

        fs::create_dir_all(git_dir.join("refs/heads")).unwrap();
        fs::create_dir_all(git_dir.join("refs/tags")).unwrap();

        temp
    }

    const TEST_OID: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
    const TEST_OID2: &str = "0123456789abcdef0123456789abcdef01234567";

    // R-001: parse recognises symbolic and direct values
    #[test]
    fn test_parse() {
        assert_eq!(
            RefValue::parse("ref: refs/heads/main"),
            RefValue::Symbolic("refs/heads/main".to_string())
        );
        assert_eq!(
            RefValue::parse(TEST_OID),
            RefValue::Direct(TEST_OID.to_string())
        );
    }

    // R-002: the marker is case-insensitive and spacing is optional
    #[test]
    fn test_parse_marker_case_and_spacing() {
        for line in [
            "REF: refs/heads/main",
            "Ref:refs/heads/main",
            "ref:   refs/heads/main  ",
            "ref: /refs/heads/main",
        ] {
            assert_eq!(
                RefValue::parse(line),
                RefValue::Symbolic("refs/heads/main".to_string()),
                "line {:?}",
                line
            );
        }
    }

    // R-003: short or multibyte lines do not panic
    #[test]
    fn test_parse_short_lines() {
        assert_eq!(RefValue::parse("re"), RefValue::Direct("re".to_string()));
        assert_eq!(
            RefValue::parse("rëf:x"),
            RefValue::Direct("rëf:x".to_string())
        );
    }

    // R-004: read_ref_file reads direct reference
    #[test]
    fn test_read_ref_file_direct() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("refs/heads/main"), format!("{}\n", TEST_OID)).unwrap();

        let store = RefStore::new(git_dir);
        let value = store.read_ref_file("refs/heads/main").unwrap();

        assert_eq!(value, RefValue::Direct(TEST_OID.to_string()));
    }

    // R-005: read_head reads symbolic reference
    #[test]
    fn test_read_head_symbolic() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();

        let store = RefStore::new(git_dir);
        let value = store.read_head().unwrap();

        assert_eq!(value, RefValue::Symbolic("refs/heads/main".to_string()));
    }

    // R-006: missing and blank HEAD are HeadUnreadable
    #[test]
    fn test_read_head_unreadable() {
        let temp = setup_git_dir();
        let store = RefStore::new(temp.path());

        assert!(matches!(store.read_head(), Err(Error::HeadUnreadable { .. })));

        fs::write(temp.path().join("HEAD"), "\n   \n").unwrap();
        match store.read_head() {
            Err(Error::HeadUnreadable { reason, .. }) => assert_eq!(reason, "file is empty"),
            other => panic!("Expected HeadUnreadable, got {:?}", other),
        }
    }

    // R-007: missing ref file is TargetUnreadable
    #[test]
    fn test_read_ref_not_found() {
        let temp = setup_git_dir();
        let store = RefStore::new(temp.path());

        let result = store.read_ref_file("refs/heads/nonexistent");
        match result {
            Err(Error::TargetUnreadable { name, path, reason }) => {
                assert_eq!(name, "refs/heads/nonexistent");
                assert_eq!(
                    path,
                    temp.path().join("refs").join("heads").join("nonexistent")
                );
                assert_eq!(reason, "file not found");
            }
            other => panic!("Expected TargetUnreadable, got {:?}", other),
        }
    }

    // R-008: ref names cannot escape the git directory
    #[test]
    fn test_ref_path_rejects_escape() {
        let temp = setup_git_dir();
        let store = RefStore::new(temp.path());

        assert!(matches!(
            store.ref_path("../outside"),
            Err(Error::TargetUnreadable { .. })
        ));
        assert!(matches!(
            store.ref_path("refs/heads/../../../etc/passwd"),
            Err(Error::TargetUnreadable { .. })
        ));
        assert!(store.ref_path("refs/heads/feature/x").is_ok());
    }

    // R-008a: empty ref names report their own reason
    #[test]
    fn test_ref_path_empty_name() {
        let temp = setup_git_dir();
        let store = RefStore::new(temp.path());

        for name in ["", "/", "//"] {
            match store.ref_path(name) {
                Err(Error::TargetUnreadable { reason, .. }) => {
                    assert_eq!(reason, "ref name is empty", "name {:?}", name)
                }
                other => panic!("Expected TargetUnreadable, got {:?}", other),
            }
        }
    }

    // R-008b: a bare `ref:` HEAD keeps the default branch and names the empty ref
    #[test]
    fn test_resolve_head_empty_target() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("HEAD"), "ref: /\n").unwrap();

        let store = RefStore::new(git_dir);
        assert_eq!(store.git_dir(), git_dir);

        let resolution = store.resolve_head("unknown").unwrap();
        assert!(resolution.head.is_symbolic());
        assert_eq!(resolution.branch, "unknown");
        assert_eq!(resolution.commit, None);
        assert!(resolution.failures[1].to_string().contains("ref name is empty"));
    }

    // R-009: dereference follows HEAD to a commit
    #[test]
    fn test_dereference_head() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::write(git_dir.join("refs/heads/main"), format!("{}\n", TEST_OID)).unwrap();

        let store = RefStore::new(git_dir);
        let resolved = store.dereference("HEAD").unwrap();

        assert_eq!(resolved.name, "refs/heads/main");
        assert_eq!(resolved.commit, TEST_OID);
    }

    // R-010: dereference handles multiple levels
    #[test]
    fn test_dereference_multiple_symbolic() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("HEAD"), "ref: refs/heads/alias\n").unwrap();
        fs::write(git_dir.join("refs/heads/alias"), "ref: refs/heads/main\n").unwrap();
        fs::write(git_dir.join("refs/heads/main"), format!("{}\n", TEST_OID)).unwrap();

        let store = RefStore::new(git_dir);
        let resolved = store.dereference("HEAD").unwrap();

        assert_eq!(resolved.name, "refs/heads/main");
        assert_eq!(resolved.commit, TEST_OID);
    }

    // R-011: a ref cycle terminates with RefCycle
    #[test]
    fn test_dereference_cycle() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("refs/heads/a"), "ref: refs/heads/b\n").unwrap();
        fs::write(git_dir.join("refs/heads/b"), "ref: refs/heads/a\n").unwrap();

        let store = RefStore::new(git_dir);
        match store.dereference("refs/heads/a") {
            Err(Error::RefCycle { name, depth }) => {
                assert_eq!(name, "refs/heads/a");
                assert_eq!(depth, MAX_REF_DEPTH);
            }
            other => panic!("Expected RefCycle, got {:?}", other),
        }
    }

    // R-012: a self-referencing ref terminates with RefCycle
    #[test]
    fn test_dereference_self_reference() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("HEAD"), "ref: HEAD\n").unwrap();

        let store = RefStore::new(git_dir);
        assert!(matches!(store.dereference("HEAD"), Err(Error::RefCycle { .. })));
    }

    // R-013: a chain exactly at the bound still resolves
    #[test]
    fn test_dereference_at_bound() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        // HEAD -> l1 -> ... -> l9 -> main is MAX_REF_DEPTH hops
        fs::write(git_dir.join("HEAD"), "ref: refs/heads/l1\n").unwrap();
        for i in 1..MAX_REF_DEPTH - 1 {
            fs::write(
                git_dir.join(format!("refs/heads/l{}", i)),
                format!("ref: refs/heads/l{}\n", i + 1),
            )
            .unwrap();
        }
        fs::write(
            git_dir.join(format!("refs/heads/l{}", MAX_REF_DEPTH - 1)),
            "ref: refs/heads/main\n",
        )
        .unwrap();
        fs::write(git_dir.join("refs/heads/main"), format!("{}\n", TEST_OID2)).unwrap();

        let store = RefStore::new(git_dir);
        let resolved = store.dereference("HEAD").unwrap();
        assert_eq!(resolved.commit, TEST_OID2);
    }

    // R-014: resolve_head on a branch
    #[test]
    fn test_resolve_head_branch() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::write(git_dir.join("refs/heads/main"), format!("{}\n", TEST_OID)).unwrap();

        let store = RefStore::new(git_dir);
        let resolution = store.resolve_head("unknown").unwrap();

        assert_eq!(resolution.branch, "main");
        assert_eq!(resolution.commit.as_deref(), Some(TEST_OID));
        assert!(resolution.is_complete());
        assert_eq!(
            resolution.files_read,
            vec![
                git_dir.join("HEAD"),
                git_dir.join("refs").join("heads").join("main")
            ]
        );
    }

    // R-015: resolve_head on a detached HEAD
    #[test]
    fn test_resolve_head_detached() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("HEAD"), format!("{}\n", TEST_OID)).unwrap();

        let store = RefStore::new(git_dir);
        let resolution = store.resolve_head("fallback").unwrap();

        assert!(resolution.is_detached());
        assert_eq!(resolution.branch, "fallback");
        assert_eq!(resolution.commit.as_deref(), Some(TEST_OID));
        assert!(resolution.failures.is_empty());
    }

    // R-016: missing branch file keeps the branch and records the failure
    #[test]
    fn test_resolve_head_unborn_branch() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();

        let store = RefStore::new(git_dir);
        let resolution = store.resolve_head("unknown").unwrap();

        assert_eq!(resolution.branch, "main");
        assert_eq!(resolution.commit, None);
        assert_eq!(resolution.failures.len(), 1);
        assert!(matches!(resolution.failures[0], Error::TargetUnreadable { .. }));
    }

    // R-017: trailing slash target defaults the branch
    #[test]
    fn test_resolve_head_trailing_slash() {
        let temp = setup_git_dir();
        let git_dir = temp.path();

        fs::write(git_dir.join("HEAD"), "ref: refs/heads/\n").unwrap();

        let store = RefStore::new(git_dir);
        let resolution = store.resolve_head("unknown").unwrap();

        assert_eq!(resolution.branch, "unknown");
        assert_eq!(resolution.commit, None);
        assert!(matches!(resolution.failures[0], Error::BranchUndeterminable { .. }));
    }
}
