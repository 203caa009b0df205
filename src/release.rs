//! End-to-end release workflow.
//!
//! One forward path with two operator gates:
//! parse version, rewrite manifest, [gate], relabel changelog, commit, tag,
//! [gate], push, publish. Any error or abort halts at the current step;
//! nothing already done is rolled back. Version and release-notes data flow
//! explicitly between steps.

use std::path::Path;

use chrono::Local;

use crate::changelog;
use crate::error::Result;
use crate::manifest;
use crate::registry::Registry;
use crate::ui::{self, Gate};
use crate::vcs::Vcs;
use crate::version::{BumpKind, Version};

/// Manifest file name, relative to the work tree.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Changelog file name, relative to the work tree.
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for the workflow logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseArgs {
    /// Which version component to bump
    pub bump: BumpKind,

    /// Skip confirmation gates
    pub force: bool,

    /// Preview mode - stop before any file is modified
    pub dry_run: bool,
}

/// Result of a completed (or previewed) release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// The version found in the manifest
    pub previous: Version,

    /// The version that was released
    pub version: Version,

    /// The tag that was created
    pub tag: String,

    /// Whether push and publish actually ran (false for dry runs)
    pub published: bool,
}

/// Build the release commit message: a summary line, a blank line, then the
/// notes collected from the changelog.
fn commit_message(version: &Version, changes: &str) -> String {
    format!("chore: release version {}\n\n{}", version, changes)
}

/// Main release workflow
///
/// Orchestrates the entire release:
/// 1. Parse the current version from the manifest and compute the next one
/// 2. Rewrite the manifest
/// 3. First operator gate
/// 4. Relabel the changelog's Unreleased section, collecting the notes
/// 5. Commit the two rewritten files and create the annotated tag
/// 6. Second operator gate
/// 7. Push the current branch with tags, then publish the package
///
/// An abort at the first gate leaves the manifest rewritten but nothing
/// committed; an abort at the second gate leaves commit and tag local but
/// nothing pushed or published.
///
/// # Arguments
///
/// * `work_tree` - Repository root holding the manifest and changelog
/// * `args` - Workflow arguments (bump kind, force, dry_run)
/// * `gate` - Confirmation gate, consulted at the two fixed points
/// * `vcs` - Version-control backend
/// * `registry` - Package registry client
pub fn run_release(
    work_tree: &Path,
    args: ReleaseArgs,
    gate: &mut dyn Gate,
    vcs: &dyn Vcs,
    registry: &dyn Registry,
) -> Result<ReleaseOutcome> {
    let manifest_path = work_tree.join(MANIFEST_FILE);
    let changelog_path = work_tree.join(CHANGELOG_FILE);

    let manifest_text = manifest::load(&manifest_path)?;
    let current = manifest::parse_version(&manifest_text)?;
    let next = current.bump(args.bump);
    let tag = format!("v{}", next);

    ui::display_version_change(&current, &next);

    if args.dry_run {
        ui::display_status("Dry run - no changes were made:");
        ui::display_status(&format!("  would update {} to version {}", MANIFEST_FILE, next));
        ui::display_status(&format!(
            "  would relabel the Unreleased section in {}",
            CHANGELOG_FILE
        ));
        ui::display_status(&format!("  would commit, tag {}, push and publish", tag));
        return Ok(ReleaseOutcome {
            previous: current,
            version: next,
            tag,
            published: false,
        });
    }

    // The manifest is rewritten before the first gate: an abort from here on
    // leaves the new version on disk with nothing committed.
    let rewritten = manifest::substitute_version(&manifest_text, &next)?;
    manifest::store(&manifest_path, &rewritten)?;

    if !args.force {
        gate.wait(&format!(
            "Updating to version {}. Press enter to continue or ctrl+C to abort.",
            next
        ))?;
    }

    let changelog_text = changelog::load(&changelog_path)?;
    let today = Local::now().date_naive();
    let relabeled = changelog::relabel_unreleased(&changelog_text, &next, today);
    if !relabeled.marker_found {
        ui::display_warning(&format!(
            "no '{}' line found in {}; release notes will be empty",
            changelog::UNRELEASED_MARKER.trim_end(),
            CHANGELOG_FILE
        ));
    }
    changelog::store(&changelog_path, &relabeled.text)?;

    ui::display_status(&format!("Committing {} and {}", CHANGELOG_FILE, MANIFEST_FILE));
    vcs.commit_files(
        &commit_message(&next, &relabeled.changes),
        &[CHANGELOG_FILE, MANIFEST_FILE],
    )?;

    ui::display_status(&format!("Tagging {}", tag));
    vcs.tag_annotated(&tag, &format!("v{}", next), &relabeled.changes)?;

    if !args.force {
        gate.wait(&format!(
            "Press enter to publish release {}. Last chance to abort via ctrl+C.",
            next
        ))?;
    }

    ui::display_status("Pushing current branch and tags");
    vcs.push_with_tags()?;

    ui::display_status("Publishing package");
    registry.publish()?;

    if relabeled.marker_found {
        // The marker was consumed above and is not re-created.
        ui::display_status(&format!(
            "Add a fresh '{}' section to {} before the next release",
            changelog::UNRELEASED_MARKER.trim_end(),
            CHANGELOG_FILE
        ));
    }

    Ok(ReleaseOutcome {
        previous: current,
        version: next,
        tag,
        published: true,
    })
}
