// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Accessors for untyped step records
//!
//! Buildkite steps are schema-less YAML: a step is either a mapping or a bare
//! control marker such as `wait`. All field access goes through these helpers,
//! which treat any shape mismatch as an absent field rather than an error.

use serde_yaml::{Mapping, Value};

/// Env var marking a step for per-project expansion.
pub const SCOPE_VAR: &str = "BUILDPIPE_SCOPE";

/// Value of [`SCOPE_VAR`] that enables expansion.
pub const PROJECT_SCOPE: &str = "project";

/// Synthetic env var carrying the project label on every clone.
pub const PROJECT_LABEL_VAR: &str = "BUILDPIPE_PROJECT_LABEL";

/// Synthetic env var carrying the project's main path on every clone.
pub const PROJECT_PATH_VAR: &str = "BUILDPIPE_PROJECT_PATH";

/// Build a string mapping key.
pub(crate) fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

/// Get a string field from a step mapping.
pub fn field_str<'a>(step: &'a Mapping, name: &str) -> Option<&'a str> {
    step.get(&key(name)).and_then(Value::as_str)
}

/// Get the step's env mapping, if it has one of mapping shape.
pub fn env_map(step: &Mapping) -> Option<&Mapping> {
    step.get(&key("env")).and_then(Value::as_mapping)
}

/// Get the step's env mapping, creating an empty one if absent or malformed.
pub fn ensure_env(step: &mut Mapping) -> &mut Mapping {
    let present = matches!(step.get(&key("env")), Some(Value::Mapping(_)));
    if !present {
        step.insert(key("env"), Value::Mapping(Mapping::new()));
    }
    match step.get_mut(&key("env")) {
        Some(Value::Mapping(env)) => env,
        _ => unreachable!("env was just initialized as a mapping"),
    }
}

/// Whether a step is marked for per-project expansion.
pub fn is_project_scoped(step: &Mapping) -> bool {
    env_map(step)
        .and_then(|env| env.get(&key(SCOPE_VAR)))
        .and_then(Value::as_str)
        .map_or(false, |value| value == PROJECT_SCOPE)
}

/// Whether a step is an interactive block step.
///
/// Block steps pause the pipeline for manual input and carry no environment
/// semantics, so pipeline-level env injection skips them.
pub fn is_block_step(step: &Mapping) -> bool {
    matches!(step.get(&key("block")), Some(Value::String(_)))
}

/// Find a step mapping by its `key` field among the original step list.
///
/// Control markers and steps without a `key` are skipped.
pub fn find_step_by_key<'a>(steps: &'a [Value], wanted: &str) -> Option<&'a Mapping> {
    steps
        .iter()
        .filter_map(Value::as_mapping)
        .find(|step| field_str(step, "key") == Some(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_project_scope_detection() {
        let scoped = step("{label: test, env: {BUILDPIPE_SCOPE: project}}");
        assert!(is_project_scoped(scoped.as_mapping().unwrap()));

        let unscoped = step("{label: test, env: {BUILDPIPE_SCOPE: pipeline}}");
        assert!(!is_project_scoped(unscoped.as_mapping().unwrap()));

        let no_env = step("{label: test}");
        assert!(!is_project_scoped(no_env.as_mapping().unwrap()));
    }

    #[test]
    fn test_non_string_scope_is_not_project() {
        let odd = step("{env: {BUILDPIPE_SCOPE: 1}}");
        assert!(!is_project_scoped(odd.as_mapping().unwrap()));
    }

    #[test]
    fn test_ensure_env_creates_mapping() {
        let mut value = step("{label: test}");
        let map = value.as_mapping_mut().unwrap();
        ensure_env(map).insert(key("FOO"), Value::String("bar".into()));
        assert_eq!(
            env_map(value.as_mapping().unwrap()).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_ensure_env_replaces_malformed_env() {
        let mut value = step("{label: test, env: not-a-mapping}");
        let map = value.as_mapping_mut().unwrap();
        assert!(ensure_env(map).is_empty());
    }

    #[test]
    fn test_find_step_by_key_skips_markers() {
        let steps: Vec<Value> = serde_yaml::from_str(
            r#"
            - wait
            - {label: build, key: build}
            - {label: test, key: test}
            "#,
        )
        .unwrap();

        assert!(find_step_by_key(&steps, "build").is_some());
        assert!(find_step_by_key(&steps, "deploy").is_none());
    }

    #[test]
    fn test_block_step_detection() {
        let block = step("{block: ':rocket: Release'}");
        assert!(is_block_step(block.as_mapping().unwrap()));

        let command = step("{label: build, command: make}");
        assert!(!is_block_step(command.as_mapping().unwrap()));
    }
}
