// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Configuration and expansion validation
//!
//! The expander itself is permissive: a rewritten dependency may name a key
//! that no matching project produced, and upload only logs a warning for it.
//! `buildpipe validate` runs these checks strictly, against a full fan-out
//! expansion, so template mistakes surface before they reach the agent.

use std::collections::HashSet;

use crate::config::Config;
use crate::pipeline::{expand, step, Pipeline};
use crate::projects::ChangeSet;

/// Static validator for a buildpipe configuration.
pub struct ExpansionValidator;

impl ExpansionValidator {
    /// Validate a configuration, including a simulated full-fan-out expansion.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::new();

        if config.steps.is_empty() {
            result.add_error("Pipeline has no steps defined");
        }
        if config.projects.is_empty() {
            result.add_warning(
                "No projects defined; project-scoped steps will expand to nothing",
            );
        }

        // Duplicate labels would make expanded keys collide too
        let mut seen = HashSet::new();
        for project in &config.projects {
            if !seen.insert(&project.label) {
                result.add_error(&format!("Duplicate project label: '{}'", project.label));
            }
            for pattern in &project.skip {
                if let Err(e) = glob::Pattern::new(pattern) {
                    result.add_warning(&format!(
                        "Project '{}': invalid skip pattern '{}' ({}); it will only match literally",
                        project.label, pattern, e
                    ));
                }
            }
        }

        // Duplicate template keys survive expansion as duplicate output keys
        let mut keys = HashSet::new();
        for record in config.steps.iter().filter_map(serde_yaml::Value::as_mapping) {
            if let Some(k) = step::field_str(record, "key") {
                if !keys.insert(k.to_string()) {
                    result.add_error(&format!("Duplicate step key: '{}'", k));
                }
            }
        }

        // Full fan-out is the widest expansion; a dependency that dangles here
        // is broken for every change set.
        let pipeline = expand(
            &config.steps,
            &config.env,
            &config.projects,
            &ChangeSet::all(),
        );
        for dangling in Self::dangling_dependencies(&pipeline) {
            result.add_error(&format!(
                "Dependency '{}' does not resolve to any expanded step",
                dangling
            ));
        }

        result
    }

    /// Dependency strings in the expanded output that name no output key.
    pub fn dangling_dependencies(pipeline: &Pipeline) -> Vec<String> {
        let keys: HashSet<&str> = pipeline.step_keys().into_iter().collect();
        let mut dangling = Vec::new();

        for record in pipeline
            .steps
            .iter()
            .filter_map(serde_yaml::Value::as_mapping)
        {
            let Some(deps) = record.get(&step::key("depends_on")) else {
                continue;
            };
            let names: Vec<&str> = match deps {
                serde_yaml::Value::String(s) => vec![s.as_str()],
                serde_yaml::Value::Sequence(seq) => {
                    seq.iter().filter_map(serde_yaml::Value::as_str).collect()
                }
                _ => continue,
            };
            for name in names {
                if !keys.contains(name) {
                    dangling.push(name.to_string());
                }
            }
        }

        dangling
    }
}

/// Result of configuration validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> Config {
        Config::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        let cfg = config(
            r#"
            projects:
              - {label: app, path: app/}
            steps:
              - {label: build, key: build, env: {BUILDPIPE_SCOPE: project}}
              - {label: test, key: test, depends_on: build, env: {BUILDPIPE_SCOPE: project}}
            "#,
        );
        let result = ExpansionValidator::validate(&cfg);
        assert!(result.is_valid(), "errors: {:?}", result.errors);
    }

    #[test]
    fn test_dangling_dependency_is_error() {
        // deploy is skipped for app, so test's rewritten dependency dangles
        let cfg = config(
            r#"
            projects:
              - {label: app, path: app/, skip: [deploy]}
            steps:
              - {label: deploy, key: deploy, env: {BUILDPIPE_SCOPE: project}}
              - {label: test, key: test, depends_on: deploy, env: {BUILDPIPE_SCOPE: project}}
            "#,
        );
        let result = ExpansionValidator::validate(&cfg);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("deploy:app")));
    }

    #[test]
    fn test_duplicate_project_labels_rejected() {
        let cfg = config(
            r#"
            projects:
              - {label: app, path: a/}
              - {label: app, path: b/}
            steps:
              - {label: build}
            "#,
        );
        let result = ExpansionValidator::validate(&cfg);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("Duplicate project label")));
    }

    #[test]
    fn test_invalid_skip_pattern_is_warning() {
        let cfg = config(
            r#"
            projects:
              - {label: app, path: app/, skip: ['[oops']}
            steps:
              - {label: build}
            "#,
        );
        let result = ExpansionValidator::validate(&cfg);
        assert!(result.is_valid());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_duplicate_step_keys_rejected() {
        let cfg = config(
            r#"
            projects:
              - {label: app, path: app/}
            steps:
              - {label: one, key: same}
              - {label: two, key: same}
            "#,
        );
        let result = ExpansionValidator::validate(&cfg);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_empty_steps_rejected() {
        let cfg = config("{projects: [{label: app, path: app/}], steps: []}");
        assert!(!ExpansionValidator::validate(&cfg).is_valid());
    }
}
