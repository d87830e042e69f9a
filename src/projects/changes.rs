// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Changed-file detection
//!
//! Affected projects are derived from `git diff --name-only <base>...HEAD`.
//! Builds of the base branch itself (or runs with --no-diff) use the `All`
//! variant, which treats every project as affected.

use tokio::process::Command;
use tracing::debug;

use crate::errors::BuildpipeError;

/// The set of files changed relative to the base branch.
#[derive(Debug, Clone)]
pub enum ChangeSet {
    /// Every project counts as affected (full fan-out).
    All,
    /// Paths reported by git, relative to the repository root.
    Files(Vec<String>),
}

impl ChangeSet {
    /// Full fan-out: every project is affected.
    pub fn all() -> Self {
        Self::All
    }

    /// Build a change set from an explicit file list.
    pub fn from_files(files: Vec<String>) -> Self {
        Self::Files(files)
    }

    /// Pick the change set for the current build.
    ///
    /// Builds of the base branch itself (per `BUILDKITE_BRANCH`) fan out to
    /// every project; anything else diffs against the base branch.
    pub async fn detect(base_branch: &str) -> Result<Self, BuildpipeError> {
        let on_base = std::env::var("BUILDKITE_BRANCH")
            .map_or(false, |branch| branch == base_branch);
        if on_base {
            debug!(base_branch, "building base branch, full fan-out");
            return Ok(Self::All);
        }
        Self::from_git(base_branch).await
    }

    /// Diff the working tree against the merge base with `base`.
    pub async fn from_git(base: &str) -> Result<Self, BuildpipeError> {
        let range = format!("{}...HEAD", base);
        let output = Command::new("git")
            .args(["diff", "--name-only", &range])
            .output()
            .await
            .map_err(|e| BuildpipeError::GitNotAvailable { error: e.to_string() })?;

        if !output.status.success() {
            return Err(BuildpipeError::GitDiffFailed {
                base: base.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let files: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        debug!(base, changed = files.len(), "collected git diff");
        Ok(Self::Files(files))
    }

    /// Whether any changed file lives under `path`.
    ///
    /// `path` is a directory prefix relative to the repository root; `.` or an
    /// empty path matches everything.
    pub fn touches(&self, path: &str) -> bool {
        let prefix = path.trim_end_matches('/');
        match self {
            Self::All => true,
            Self::Files(files) => {
                if prefix.is_empty() || prefix == "." {
                    return !files.is_empty();
                }
                files.iter().any(|file| {
                    file.as_str() == prefix || file.starts_with(&format!("{}/", prefix))
                })
            }
        }
    }
}
