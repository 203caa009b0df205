//! Version-control abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! operations the release workflow performs, allowing for a real
//! implementation driving the system `git` binary and a mock implementation
//! for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Vcs] trait. The concrete implementations
//! include:
//!
//! - [system::SystemGit]: discovers the repository with the `git2` crate and
//!   shells out to the system `git` binary for the mutating operations
//! - [mock::MockVcs]: a recording implementation for testing
//!
//! Most code should depend on the [Vcs] trait rather than concrete
//! implementations to enable easy testing.
//!
//! ```rust
//! # use shipit::vcs::Vcs;
//! # fn example<V: Vcs>(vcs: &V) -> Result<(), Box<dyn std::error::Error>> {
//! vcs.commit_files("chore: release version 1.2.4", &["CHANGELOG.md", "Cargo.toml"])?;
//! vcs.tag_annotated("v1.2.4", "v1.2.4", "- fixed bug X\n")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod system;

pub use mock::{FailAt, MockVcs, VcsCall};
pub use system::SystemGit;

use crate::error::Result;

/// Common version-control operations used by the release workflow.
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` to allow safe sharing across
/// threads.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying failures (a non-zero subprocess exit, a `git2::Error`) to the
/// appropriate [crate::error::ReleaseError] variants.
pub trait Vcs: Send + Sync {
    /// Create a signed commit restricted to exactly `files`.
    ///
    /// Only the listed paths are committed; anything else already staged in
    /// the index is left staged and untouched.
    ///
    /// # Arguments
    /// * `message` - Full commit message (summary line, blank line, body)
    /// * `files` - Paths relative to the work tree, committed as given
    ///
    /// # Returns
    /// * `Ok(())` - Commit created
    /// * `Err` - If the commit command exits non-zero
    fn commit_files(&self, message: &str, files: &[&str]) -> Result<()>;

    /// Create a signed annotated tag.
    ///
    /// # Arguments
    /// * `name` - Tag name (e.g., "v1.2.4")
    /// * `summary` - First annotation paragraph
    /// * `body` - Second annotation paragraph (the release notes)
    ///
    /// # Returns
    /// * `Ok(())` - Tag created
    /// * `Err` - If the tag command exits non-zero
    fn tag_annotated(&self, name: &str, summary: &str, body: &str) -> Result<()>;

    /// Push the current branch along with its reachable annotated tags.
    ///
    /// # Returns
    /// * `Ok(())` - Push accepted by the remote
    /// * `Err` - If the push command exits non-zero
    fn push_with_tags(&self) -> Result<()>;
}
