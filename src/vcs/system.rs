use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ReleaseError, Result};

use super::Vcs;

/// Vcs implementation driving the system `git` binary.
///
/// Repository discovery and read-only queries go through the `git2` crate;
/// the mutating operations (commit, tag, push) are subprocess invocations of
/// `git` itself, because commit and tag signing has to run through the
/// operator's configured git and GPG setup. Subprocesses inherit stdio so
/// pinentry dialogs and git's own output reach the terminal, and each one
/// blocks until it exits.
pub struct SystemGit {
    work_tree: PathBuf,
    sign: bool,
}

impl SystemGit {
    /// Discover the repository containing `path` and root all operations at
    /// its work tree. Commits and tags will be signed.
    ///
    /// # Returns
    /// * `Ok(SystemGit)` - Successfully discovered repository
    /// * `Err` - If not in a git repository, or the repository is bare
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = git2::Repository::discover(path.as_ref())
            .map_err(|e| ReleaseError::repository(format!("not in a git repository: {}", e)))?;
        let work_tree = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::repository("bare repository has no work tree"))?;

        Ok(SystemGit {
            work_tree,
            sign: true,
        })
    }

    /// Build an unsigned instance rooted at an explicit work tree.
    ///
    /// Used by tests, which have no signing key available.
    pub fn unsigned<P: AsRef<Path>>(work_tree: P) -> Self {
        SystemGit {
            work_tree: work_tree.as_ref().to_path_buf(),
            sign: false,
        }
    }

    /// The work tree all operations are rooted at.
    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// Short name of the branch HEAD currently points at.
    pub fn current_branch(&self) -> Result<String> {
        let repo = git2::Repository::open(&self.work_tree)?;
        let head = repo.head()?;
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    /// Create a git command rooted at the work tree.
    fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.work_tree);
        cmd
    }

    /// Run a command to completion, mapping a non-zero exit to an error.
    fn run(&self, mut cmd: Command, program: &str) -> Result<()> {
        let status = cmd.status()?;
        if !status.success() {
            return Err(ReleaseError::command(program, status));
        }
        Ok(())
    }
}

impl Vcs for SystemGit {
    fn commit_files(&self, message: &str, files: &[&str]) -> Result<()> {
        let mut cmd = self.git_cmd();
        cmd.args(["commit", "-m", message]);
        if self.sign {
            cmd.arg("-S");
        }
        // With -- the file list goes directly to git commit, which then
        // ignores whatever else is staged in the index.
        cmd.arg("--");
        cmd.args(files);
        self.run(cmd, "git commit")
    }

    fn tag_annotated(&self, name: &str, summary: &str, body: &str) -> Result<()> {
        let mut cmd = self.git_cmd();
        cmd.arg("tag");
        if self.sign {
            cmd.arg("-s");
        }
        cmd.args(["-m", summary, "-m", body]);
        cmd.arg(name);
        self.run(cmd, "git tag")
    }

    fn push_with_tags(&self) -> Result<()> {
        let mut cmd = self.git_cmd();
        cmd.args(["push", "--follow-tags"]);
        self.run(cmd, "git push")
    }
}
