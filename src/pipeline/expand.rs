// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Pipeline expander
//!
//! Walks the template step list once and replaces each project-scoped step
//! with its per-project clones. Control markers and pipeline-level steps pass
//! through in place.

use serde_yaml::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::pipeline::clone::clone_for_projects;
use crate::pipeline::step::{self, key};
use crate::pipeline::Pipeline;
use crate::projects::{ChangeSet, Project};

/// Expand a template step list into a concrete pipeline.
///
/// Env precedence is a three-tier merge: project env (applied by the cloner)
/// over pipeline env (applied here) over values already set on the step.
pub fn expand(
    steps: &[Value],
    pipeline_env: &BTreeMap<String, String>,
    projects: &[Project],
    changes: &ChangeSet,
) -> Pipeline {
    let mut expanded = Vec::new();

    for source in steps {
        if source.as_mapping().is_none() {
            // Bare control marker such as `wait`, passed through verbatim.
            expanded.push(source.clone());
            continue;
        }

        let mut current = source.clone();
        if let Some(record) = current.as_mapping_mut() {
            if !step::is_block_step(record) {
                let env = step::ensure_env(record);
                for (name, value) in pipeline_env {
                    env.insert(key(name), Value::String(value.clone()));
                }
            }

            if step::is_project_scoped(record) {
                // Dependency lookups inside the cloner run against the
                // original template list, not the partially-expanded output.
                let clones = clone_for_projects(steps, &current, projects, changes);
                let label = source
                    .as_mapping()
                    .and_then(|m| step::field_str(m, "label"))
                    .unwrap_or("");
                debug!(label, clones = clones.len(), "expanded project-scoped step");
                expanded.extend(clones);
                continue;
            }
        }

        expanded.push(current);
    }

    Pipeline::new(expanded)
}
