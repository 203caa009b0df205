use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{ReleaseError, Result};
use crate::version::Version;

/// The marker line that opens the unreleased notes, newline included.
///
/// The comparison is exact: a file whose last line is `## Unreleased`
/// without a trailing newline does not match.
pub const UNRELEASED_MARKER: &str = "## Unreleased\n";

/// Outcome of relabeling the unreleased section.
#[derive(Debug, Clone, PartialEq)]
pub struct Relabeled {
    /// The full changelog text with the new version header inserted.
    pub text: String,
    /// The lines of the unreleased section, later used for commit and tag
    /// messages. Empty when the marker is missing or the section is empty.
    pub changes: String,
    /// Whether the `## Unreleased` marker was found at all.
    pub marker_found: bool,
}

/// Read the changelog file into memory.
pub fn load(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| ReleaseError::changelog(format!("cannot read {}: {}", path.display(), e)))
}

/// Write the full changelog text back, truncating the previous contents.
pub fn store(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text)
        .map_err(|e| ReleaseError::changelog(format!("cannot write {}: {}", path.display(), e)))
}

/// Turn the unreleased section into the section for `version`.
///
/// Scans the text line by line. Directly below the `## Unreleased` marker a
/// blank line and a `## [<version>] - <date>` header are inserted, so the
/// previously unreleased notes now sit under the new version header. The
/// lines of that section, up to the next `## [` header or the end of the
/// file, are also collected into `changes`. Every line outside the section
/// is copied through byte for byte.
///
/// Note the marker itself is consumed: no fresh `## Unreleased` section is
/// created, so one has to be added by hand before the next release.
pub fn relabel_unreleased(text: &str, version: &Version, date: NaiveDate) -> Relabeled {
    let mut buffer = String::with_capacity(text.len() + 64);
    let mut changes = String::new();
    let mut marker_found = false;
    let mut in_section = false;

    for line in text.split_inclusive('\n') {
        buffer.push_str(line);

        if line.starts_with("## [") {
            in_section = false;
        }

        if in_section {
            changes.push_str(line);
        }

        if line == UNRELEASED_MARKER {
            buffer.push('\n');
            buffer.push_str(&format!("## [{}] - {}\n", version, date.format("%Y-%m-%d")));
            marker_found = true;
            in_section = true;
        }
    }

    Relabeled {
        text: buffer,
        changes,
        marker_found,
    }
}
