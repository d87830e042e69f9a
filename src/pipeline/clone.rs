// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Step cloner
//!
//! Produces the per-project clones of one project-scoped step: label and key
//! uniquification, env injection, project-label interpolation in nested
//! Buildkite structures, and dependency rewriting.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::pipeline::step::{
    self, key, PROJECT_LABEL_VAR, PROJECT_PATH_VAR,
};
use crate::projects::{ChangeSet, Project};

/// Plugin identifier whose `id` field carries a project-label token.
pub const CACHE_PLUGIN_KEY: &str =
    "ssh://git@github.com/Vkt0r/cache-buildkite-plugin.git#skip_restore_upload";

/// The four escaping forms of the project-label token, doubly-escaped forms
/// first so `$${...}` is never left as `${...}` residue by a shorter match.
const LABEL_TOKENS: [&str; 4] = [
    "$${BUILDPIPE_PROJECT_LABEL}",
    "${BUILDPIPE_PROJECT_LABEL}",
    "$$BUILDPIPE_PROJECT_LABEL",
    "$BUILDPIPE_PROJECT_LABEL",
];

/// Expand one project-scoped step into its per-project clones.
///
/// `all_steps` is the original template step list: dependency lookups must see
/// every step, not just the ones already expanded. Projects whose rules reject
/// the step are skipped silently; zero matches yields an empty result.
pub fn clone_for_projects(
    all_steps: &[Value],
    source: &Value,
    projects: &[Project],
    changes: &ChangeSet,
) -> Vec<Value> {
    let mut clones = Vec::new();

    for project in projects {
        // Independent deep copy per project; each clone is mutated on its own.
        let mut clone = source.clone();
        let Some(record) = clone.as_mapping_mut() else {
            continue;
        };

        if !project.rules_match(record, changes) {
            debug!(project = %project.label, "project rules rejected step");
            continue;
        }

        relabel(record, project);
        inject_project_env(record, project);
        rewrite_key(record, project);
        interpolate_notify(record, project);
        interpolate_plugins(record, project);
        rewrite_dependencies(record, all_steps, project);

        clones.push(clone);
    }

    clones
}

/// Replace every escaping form of the project-label token with the
/// lower-cased project label.
pub fn interpolate_project_label(input: &str, project: &Project) -> String {
    let lower = project.label.to_lowercase();
    LABEL_TOKENS
        .iter()
        .fold(input.to_string(), |acc, token| acc.replace(token, &lower))
}

fn relabel(record: &mut Mapping, project: &Project) {
    let label = match step::field_str(record, "label") {
        Some(original) => format!("{} {}", original, project.label),
        None => project.label.clone(),
    };
    record.insert(key("label"), Value::String(label));
}

fn inject_project_env(record: &mut Mapping, project: &Project) {
    let env = step::ensure_env(record);
    env.insert(
        key(PROJECT_LABEL_VAR),
        Value::String(project.label.clone()),
    );
    env.insert(
        key(PROJECT_PATH_VAR),
        Value::String(project.main_path().to_string()),
    );
    // Project env is the most specific tier and wins over pipeline-level
    // values injected by the expander.
    for (name, value) in &project.env {
        env.insert(key(name), Value::String(value.clone()));
    }
}

fn rewrite_key(record: &mut Mapping, project: &Project) {
    if let Some(original) = step::field_str(record, "key") {
        let unique = format!("{}:{}", original, project.label);
        record.insert(key("key"), Value::String(unique));
    }
}

/// Interpolate the label token in `notify[*].github_commit_status.context`.
fn interpolate_notify(record: &mut Mapping, project: &Project) {
    let Some(Value::Sequence(entries)) = record.get_mut(&key("notify")) else {
        return;
    };
    for entry in entries {
        let Some(status) = entry
            .as_mapping_mut()
            .and_then(|m| m.get_mut(&key("github_commit_status")))
            .and_then(Value::as_mapping_mut)
        else {
            continue;
        };
        if let Some(Value::String(context)) = status.get_mut(&key("context")) {
            *context = interpolate_project_label(context, project);
        }
    }
}

/// Interpolate the label token in the cache plugin's `id`.
fn interpolate_plugins(record: &mut Mapping, project: &Project) {
    let Some(Value::Sequence(entries)) = record.get_mut(&key("plugins")) else {
        return;
    };
    for entry in entries {
        let Some(plugin) = entry
            .as_mapping_mut()
            .and_then(|m| m.get_mut(&key(CACHE_PLUGIN_KEY)))
            .and_then(Value::as_mapping_mut)
        else {
            continue;
        };
        if let Some(Value::String(id)) = plugin.get_mut(&key("id")) {
            *id = interpolate_project_label(id, project);
        }
    }
}

/// Rewrite dependencies on project-scoped steps to the same-project sibling.
///
/// A bare string `depends_on` is normalized into a single-element list first.
/// Dependencies that name a pipeline-level step, or no known step at all, are
/// left unchanged.
fn rewrite_dependencies(record: &mut Mapping, all_steps: &[Value], project: &Project) {
    let Some(deps) = record.get_mut(&key("depends_on")) else {
        return;
    };

    if !deps.is_sequence() {
        let single = deps.clone();
        *deps = Value::Sequence(vec![single]);
    }
    let Some(list) = deps.as_sequence_mut() else {
        return;
    };

    for dep in list {
        let Some(name) = dep.as_str() else {
            continue;
        };
        let scoped = step::find_step_by_key(all_steps, name)
            .map_or(false, step::is_project_scoped);
        if scoped {
            *dep = Value::String(format!("{}:{}", name, project.label));
        }
    }
}
