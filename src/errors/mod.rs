// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Error types for buildpipe
//!
//! Data-shape problems in step records are handled permissively (treated as
//! absent fields, see the step accessors); these errors cover configuration,
//! git, and agent I/O, which are fatal.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for buildpipe operations
pub type BuildpipeResult<T> = Result<T, BuildpipeError>;

/// Main error type for buildpipe
#[derive(Error, Debug, Diagnostic)]
pub enum BuildpipeError {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(buildpipe::config_not_found),
        help("Create a .buildpipe.yml with 'env', 'projects' and 'steps' sections")
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(buildpipe::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(code(buildpipe::invalid_config))]
    InvalidConfig {
        reason: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Change Detection Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("git diff against '{base}' failed: {stderr}")]
    #[diagnostic(
        code(buildpipe::git_diff_failed),
        help("Ensure '{base}' exists locally (a CI checkout may need 'git fetch origin {base}')")
    )]
    GitDiffFailed { base: String, stderr: String },

    #[error("Failed to run git: {error}")]
    #[diagnostic(
        code(buildpipe::git_not_available),
        help("git must be installed and on PATH for changed-project detection; use --no-diff to skip it")
    )]
    GitNotAvailable { error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Agent Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("buildkite-agent not found")]
    #[diagnostic(
        code(buildpipe::agent_not_found),
        help("Install the Buildkite agent and ensure 'buildkite-agent' is on PATH, or run with --dry-run")
    )]
    AgentNotFound,

    #[error("Failed to invoke buildkite-agent: {error}")]
    #[diagnostic(code(buildpipe::agent_invocation_failed))]
    AgentInvocationFailed { error: String },

    #[error("Failed to write pipeline file '{path}': {error}")]
    #[diagnostic(code(buildpipe::pipeline_write_error))]
    PipelineWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(buildpipe::io_error))]
    Io { message: String },

    #[error("YAML error: {message}")]
    #[diagnostic(code(buildpipe::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(buildpipe::json_error))]
    Json { message: String },

    #[error("Glob pattern error: {message}")]
    #[diagnostic(code(buildpipe::glob_error))]
    GlobPattern { message: String },
}

impl From<std::io::Error> for BuildpipeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for BuildpipeError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for BuildpipeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<glob::PatternError> for BuildpipeError {
    fn from(e: glob::PatternError) -> Self {
        Self::GlobPattern { message: e.to_string() }
    }
}
