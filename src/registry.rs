//! Package registry client abstraction.
//!
//! Mirrors the shape of the [crate::vcs] layer: one trait, a system
//! implementation shelling out to `cargo publish`, and a recording mock for
//! tests.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use crate::error::{ReleaseError, Result};

/// Publishing interface of the package registry client.
pub trait Registry: Send + Sync {
    /// Publish the package in the work tree, blocking until the client
    /// exits.
    ///
    /// # Returns
    /// * `Ok(())` - Package accepted by the registry
    /// * `Err` - If the publish command exits non-zero
    fn publish(&self) -> Result<()>;
}

/// Registry client shelling out to `cargo publish`.
///
/// The subprocess inherits stdio, so cargo's progress output and any
/// credential prompts reach the terminal.
pub struct CargoRegistry {
    work_tree: PathBuf,
}

impl CargoRegistry {
    /// Create a client publishing the package rooted at `work_tree`
    pub fn new<P: AsRef<Path>>(work_tree: P) -> Self {
        CargoRegistry {
            work_tree: work_tree.as_ref().to_path_buf(),
        }
    }
}

impl Registry for CargoRegistry {
    fn publish(&self) -> Result<()> {
        let status = Command::new("cargo")
            .arg("publish")
            .current_dir(&self.work_tree)
            .status()?;
        if !status.success() {
            return Err(ReleaseError::command("cargo publish", status));
        }
        Ok(())
    }
}

/// Mock registry for testing the release workflow without publishing.
pub struct MockRegistry {
    published: Mutex<usize>,
    fail: bool,
}

impl MockRegistry {
    /// Create a mock where publishing succeeds
    pub fn new() -> Self {
        MockRegistry {
            published: Mutex::new(0),
            fail: false,
        }
    }

    /// Create a mock where publishing fails
    pub fn failing() -> Self {
        MockRegistry {
            published: Mutex::new(0),
            fail: true,
        }
    }

    /// Number of publish calls seen so far
    pub fn publish_count(&self) -> usize {
        *self
            .published
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for MockRegistry {
    fn publish(&self) -> Result<()> {
        *self
            .published
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) += 1;
        if self.fail {
            return Err(ReleaseError::command("cargo publish", "mock failure"));
        }
        Ok(())
    }
}
