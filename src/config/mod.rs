// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Configuration loading
//!
//! A single YAML document (by convention `.buildpipe.yml`) carries the
//! pipeline-level env, the project registry, and the raw step template. Steps
//! are deliberately kept untyped: buildpipe rewrites a handful of well-known
//! fields and passes everything else through to the agent untouched.

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::BuildpipeError;
use crate::projects::Project;

fn default_base_branch() -> String {
    "main".to_string()
}

/// Top-level buildpipe configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Pipeline-level env vars, merged into every non-block step.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Branch that full builds run on; also the git diff base for
    /// affected-project detection.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// The monorepo's projects, in fan-out order.
    pub projects: Vec<Project>,

    /// Template steps: control markers or untyped step mappings.
    pub steps: Vec<Value>,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, BuildpipeError> {
        if !path.exists() {
            return Err(BuildpipeError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            BuildpipeError::FileReadError {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, BuildpipeError> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }
}
