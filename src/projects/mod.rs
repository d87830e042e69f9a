// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Project registry
//!
//! A project is one independently-buildable unit of the monorepo. Projects are
//! read-only input to expansion: the step cloner asks each project whether it
//! participates in a given step via [`Project::rules_match`].

mod changes;

pub use changes::ChangeSet;

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::collections::BTreeMap;

use crate::pipeline::step;

/// A single monorepo project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique short name, embedded in expanded labels and keys.
    pub label: String,

    /// Directory (or directories) owned by this project, relative to the
    /// repository root. The first path is the main path exported as
    /// `BUILDPIPE_PROJECT_PATH`.
    pub path: ProjectPath,

    /// Project-level env vars, overlaid onto every expanded clone.
    /// Highest precedence in the three-tier merge.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Glob patterns matched against step labels; a match excludes this
    /// project from that step.
    #[serde(default)]
    pub skip: Vec<String>,
}

/// One or many project paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectPath {
    /// Single directory
    Single(String),

    /// Multiple directories; changes under any of them affect the project
    Multiple(Vec<String>),
}

impl ProjectPath {
    /// All paths, in declaration order.
    pub fn all(&self) -> Vec<&str> {
        match self {
            Self::Single(p) => vec![p.as_str()],
            Self::Multiple(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

impl Project {
    /// The path exported as `BUILDPIPE_PROJECT_PATH` on expanded clones.
    pub fn main_path(&self) -> &str {
        match &self.path {
            ProjectPath::Single(p) => p,
            ProjectPath::Multiple(v) => v.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Whether the change set touches any of this project's paths.
    pub fn affected_by(&self, changes: &ChangeSet) -> bool {
        self.path.all().iter().any(|p| changes.touches(p))
    }

    /// Inclusion predicate: does this project participate in `step_record`?
    ///
    /// A project is in when it is affected by the change set and none of its
    /// skip patterns match the step label. An invalid skip pattern degrades to
    /// a literal comparison; `validate` reports it separately.
    pub fn rules_match(&self, step_record: &Mapping, changes: &ChangeSet) -> bool {
        let label = step::field_str(step_record, "label")
            .or_else(|| step::field_str(step_record, "key"))
            .unwrap_or("");

        let skipped = self.skip.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|glob| glob.matches(label))
                .unwrap_or(pattern == label)
        });

        !skipped && self.affected_by(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn project(yaml: &str) -> Project {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn step_record(yaml: &str) -> Mapping {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        value.as_mapping().unwrap().clone()
    }

    #[test]
    fn test_single_and_multiple_paths() {
        let single = project("{label: app, path: app/}");
        assert_eq!(single.main_path(), "app/");

        let multi = project("{label: app, path: [app/, lib/]}");
        assert_eq!(multi.main_path(), "app/");
        assert_eq!(multi.path.all(), vec!["app/", "lib/"]);
    }

    #[test]
    fn test_affected_by_any_path() {
        let multi = project("{label: app, path: [app/, lib/]}");
        let changes = ChangeSet::from_files(vec!["lib/util.rs".into()]);
        assert!(multi.affected_by(&changes));

        let unrelated = ChangeSet::from_files(vec!["docs/README.md".into()]);
        assert!(!multi.affected_by(&unrelated));
    }

    #[test]
    fn test_skip_glob_excludes_step() {
        let p = project("{label: app, path: app/, skip: ['deploy-*']}");
        let deploy = step_record("{label: deploy-staging}");
        let build = step_record("{label: build}");

        assert!(!p.rules_match(&deploy, &ChangeSet::all()));
        assert!(p.rules_match(&build, &ChangeSet::all()));
    }

    #[test]
    fn test_skip_falls_back_to_key() {
        let p = project("{label: app, path: app/, skip: [lint]}");
        let keyed = step_record("{key: lint, command: make lint}");
        assert!(!p.rules_match(&keyed, &ChangeSet::all()));
    }

    #[test]
    fn test_unaffected_project_never_matches() {
        let p = project("{label: app, path: app/}");
        let build = step_record("{label: build}");
        let changes = ChangeSet::from_files(vec!["other/file.go".into()]);
        assert!(!p.rules_match(&build, &changes));
    }

    #[test]
    fn test_invalid_skip_pattern_degrades_to_literal() {
        let p = project("{label: app, path: app/, skip: ['[bad']}");
        let literal = step_record("{label: '[bad'}");
        let other = step_record("{label: build}");

        assert!(!p.rules_match(&literal, &ChangeSet::all()));
        assert!(p.rules_match(&other, &ChangeSet::all()));
    }
}
