use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{ReleaseError, Result};
use crate::version::Version;

/// Pattern for the `version = "X.Y.Z"` assignment in a Cargo manifest.
///
/// The assignment prefix is captured so a substitution can keep it
/// byte-identical and rewrite only the quoted literal.
const VERSION_PATTERN: &str = r#"(version\s*=\s*)"(\d+)\.(\d+)\.(\d+)""#;

fn version_regex() -> Result<Regex> {
    Regex::new(VERSION_PATTERN)
        .map_err(|e| ReleaseError::manifest(format!("invalid version pattern: {}", e)))
}

/// Read the manifest file into memory.
pub fn load(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| ReleaseError::manifest(format!("cannot read {}: {}", path.display(), e)))
}

/// Write the full manifest text back, truncating the previous contents.
pub fn store(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text)
        .map_err(|e| ReleaseError::manifest(format!("cannot write {}: {}", path.display(), e)))
}

/// Extract the package version from the manifest text.
///
/// The first `version = "X.Y.Z"` match wins; in a Cargo manifest that is the
/// `[package]` version, ahead of any dependency tables.
///
/// # Returns
/// * `Ok(Version)` - Parsed version triple
/// * `Err` - If no assignment matches the pattern
pub fn parse_version(text: &str) -> Result<Version> {
    let re = version_regex()?;
    let caps = re
        .captures(text)
        .ok_or_else(|| ReleaseError::manifest("no `version = \"X.Y.Z\"` assignment found"))?;

    let component = |idx: usize| -> Result<u32> {
        caps[idx]
            .parse::<u32>()
            .map_err(|e| ReleaseError::manifest(format!("invalid version component: {}", e)))
    };

    Ok(Version::new(component(2)?, component(3)?, component(4)?))
}

/// Substitute the package version literal with `next`.
///
/// Rewrites only the first match, keeping the assignment prefix and every
/// other byte of the text unchanged. Substituting a version the text already
/// carries is a no-op, so re-running on updated text cannot double-bump.
pub fn substitute_version(text: &str, next: &Version) -> Result<String> {
    let re = version_regex()?;
    let rewritten = re.replace(text, |caps: &regex::Captures<'_>| {
        format!("{}\"{}\"", &caps[1], next)
    });
    Ok(rewritten.into_owned())
}
