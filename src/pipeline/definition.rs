// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Expanded pipeline document
//!
//! The output of expansion, shaped for `buildkite-agent pipeline upload`.

use serde::Serialize;
use serde_yaml::Value;

use crate::errors::BuildpipeError;
use crate::pipeline::step;

/// The expanded pipeline handed to the agent.
#[derive(Debug, Clone, Serialize)]
pub struct Pipeline {
    /// Concrete steps, in output order.
    pub steps: Vec<Value>,
}

impl Pipeline {
    /// Wrap an expanded step list.
    pub fn new(steps: Vec<Value>) -> Self {
        Self { steps }
    }

    /// Serialize to the YAML document the agent consumes.
    pub fn to_yaml(&self) -> Result<String, BuildpipeError> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// All `key` values present in the output, in order.
    pub fn step_keys(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(Value::as_mapping)
            .filter_map(|record| step::field_str(record, "key"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_under_steps_key() {
        let pipeline = Pipeline::new(vec![
            serde_yaml::from_str("{label: build, command: make}").unwrap(),
            Value::String("wait".into()),
        ]);

        let yaml = pipeline.to_yaml().unwrap();
        assert!(yaml.starts_with("steps:"));
        assert!(yaml.contains("label: build"));
        assert!(yaml.contains("- wait"));
    }

    #[test]
    fn test_step_keys_ignore_markers_and_keyless_steps() {
        let pipeline = Pipeline::new(vec![
            Value::String("wait".into()),
            serde_yaml::from_str("{label: build, key: 'build:app'}").unwrap(),
            serde_yaml::from_str("{label: lint}").unwrap(),
        ]);

        assert_eq!(pipeline.step_keys(), vec!["build:app"]);
    }
}
