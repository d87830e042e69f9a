// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Buildkite agent invocation
//!
//! The expanded pipeline is written to a temporary file and handed to
//! `buildkite-agent pipeline upload`. The temp file lives until the upload
//! returns and is removed on drop.

use std::path::PathBuf;
use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::BuildpipeError;
use crate::pipeline::Pipeline;

/// Handle to a discovered buildkite-agent binary.
#[derive(Debug, Clone)]
pub struct BuildkiteAgent {
    binary: PathBuf,
}

impl BuildkiteAgent {
    /// Locate `buildkite-agent` on PATH.
    pub fn discover() -> Result<Self, BuildpipeError> {
        let binary = which::which("buildkite-agent").map_err(|_| BuildpipeError::AgentNotFound)?;
        Ok(Self { binary })
    }

    /// Use an explicit agent binary (tests, non-standard installs).
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Serialize the pipeline and upload it through the agent.
    ///
    /// The agent's exit status is logged but not treated as an error; failures
    /// to write or spawn are.
    pub async fn upload(&self, pipeline: &Pipeline) -> Result<(), BuildpipeError> {
        let yaml = pipeline.to_yaml()?;

        let file = tempfile::Builder::new()
            .prefix("buildpipe-")
            .suffix(".yml")
            .tempfile()?;
        std::fs::write(file.path(), &yaml).map_err(|e| BuildpipeError::PipelineWriteError {
            path: file.path().to_path_buf(),
            error: e.to_string(),
        })?;

        info!(
            steps = pipeline.steps.len(),
            path = %file.path().display(),
            "uploading expanded pipeline"
        );

        let status = Command::new(&self.binary)
            .arg("pipeline")
            .arg("upload")
            .arg(file.path())
            .status()
            .await
            .map_err(|e| BuildpipeError::AgentInvocationFailed { error: e.to_string() })?;

        if !status.success() {
            warn!(code = status.code(), "buildkite-agent exited non-zero");
        }

        Ok(())
    }
}
