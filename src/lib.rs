//! # githead
//!
//! Resolve the current git branch and commit of a repository for use as
//! build-time variables.
//!
//! This crate reads `.git/HEAD` and the loose ref files it points through
//! directly, without libgit2 or the git command-line tool.
//!
//! ## Features
//!
//! - Locate a repository from any directory inside it
//! - Follow symbolic refs to a commit with a bounded, cycle-safe loop
//! - Substitute configurable defaults for anything that cannot be resolved,
//!   or fail hard in strict mode
//! - Publish the values as properties, JSON, or Cargo `build.rs` directives
//!
//! Packed refs (`.git/packed-refs`) are not read.
//!
//! ## Quick Start
//!
//! ```no_run
//! use githead::{GitHead, HeadConfig, Result};
//!
//! fn main() -> Result<()> {
//!     let config = HeadConfig::new("path/to/repo/src")
//!         .with_default_branch("unknown")
//!         .with_default_commit("unknown");
//!
//!     let head = GitHead::resolve(&config)?;
//!     println!("On branch {} at {}", head.branch, head.commit);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and Result alias
//! - [`repository`] - Locating the `.git` directory
//! - [`refs`] - Reading and dereferencing HEAD and ref files
//! - [`resolve`] - Default substitution and strict mode
//! - [`config`] - Resolution settings
//! - [`output`] - Properties, JSON, and Cargo directives

pub mod config;
pub mod error;
pub mod output;
pub mod refs;
pub mod repository;
pub mod resolve;

// Internal modules (not part of public API)
pub(crate) mod infra;

// Re-export primary types for convenient access
pub use config::HeadConfig;
pub use error::{Error, Result};
pub use repository::RepositoryRoot;
pub use resolve::GitHead;

// Re-export reference types
pub use refs::{HeadResolution, RefStore, RefValue, ResolvedRef};

// Re-export output helpers
pub use output::{cargo_directives, emit_cargo_directives, Properties};
