//! Build provenance, embedded by `build.rs` through vergen.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder for git metadata missing at build time (tarball builds).
const UNKNOWN: &str = "unknown";

/// Length of the abbreviated commit hash.
const SHORT_COMMIT_LEN: usize = 7;

/// Where the running binary came from.
///
/// Displays as `{version}+{branch}.{commit}`, with a `.dirty` suffix when the
/// working tree had uncommitted changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Crate version from Cargo.toml.
    pub version: String,
    pub branch: String,
    /// Abbreviated commit hash.
    pub commit: String,
    pub dirty: bool,
}

impl BuildInfo {
    /// Metadata of this build.
    pub fn current() -> Self {
        Self::new(
            env!("CARGO_PKG_VERSION"),
            option_env!("VERGEN_GIT_BRANCH"),
            option_env!("VERGEN_GIT_SHA"),
            option_env!("VERGEN_GIT_DIRTY") == Some("true"),
        )
    }

    fn new(version: &str, branch: Option<&str>, sha: Option<&str>, dirty: bool) -> Self {
        let commit = sha.filter(|sha| !sha.is_empty()).unwrap_or(UNKNOWN);
        Self {
            version: version.to_string(),
            branch: branch.filter(|b| !b.is_empty()).unwrap_or(UNKNOWN).to_string(),
            commit: commit.chars().take(SHORT_COMMIT_LEN).collect(),
            dirty,
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}.{}", self.version, self.branch, self.commit)?;
        if self.dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}
