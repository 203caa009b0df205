use std::sync::Mutex;

use crate::error::{ReleaseError, Result};

use super::Vcs;

/// A single recorded VCS invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum VcsCall {
    Commit { message: String, files: Vec<String> },
    Tag { name: String, summary: String, body: String },
    Push,
}

/// Which operation a [MockVcs] should fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Commit,
    Tag,
    Push,
}

/// Mock VCS for testing the release workflow without actual git operations.
///
/// Records every invocation; optionally fails at one operation to exercise
/// the abort paths.
pub struct MockVcs {
    calls: Mutex<Vec<VcsCall>>,
    fail_at: Option<FailAt>,
}

impl MockVcs {
    /// Create a mock where every operation succeeds
    pub fn new() -> Self {
        MockVcs {
            calls: Mutex::new(Vec::new()),
            fail_at: None,
        }
    }

    /// Create a mock that fails at the given operation
    pub fn failing(fail_at: FailAt) -> Self {
        MockVcs {
            calls: Mutex::new(Vec::new()),
            fail_at: Some(fail_at),
        }
    }

    /// Snapshot of the recorded invocations, in call order
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: VcsCall, failure: FailAt, program: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
        if self.fail_at == Some(failure) {
            return Err(ReleaseError::command(program, "mock failure"));
        }
        Ok(())
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for MockVcs {
    fn commit_files(&self, message: &str, files: &[&str]) -> Result<()> {
        self.record(
            VcsCall::Commit {
                message: message.to_string(),
                files: files.iter().map(|f| f.to_string()).collect(),
            },
            FailAt::Commit,
            "git commit",
        )
    }

    fn tag_annotated(&self, name: &str, summary: &str, body: &str) -> Result<()> {
        self.record(
            VcsCall::Tag {
                name: name.to_string(),
                summary: summary.to_string(),
                body: body.to_string(),
            },
            FailAt::Tag,
            "git tag",
        )
    }

    fn push_with_tags(&self) -> Result<()> {
        self.record(VcsCall::Push, FailAt::Push, "git push")
    }
}
