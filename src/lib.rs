// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! # buildpipe - Dynamic Buildkite pipeline generator for monorepos
//!
//! `buildpipe` expands a templated pipeline definition into one concrete step
//! per step-project combination, and uploads the result through
//! `buildkite-agent`.
//!
//! ## How it works
//!
//! - Steps with `env.BUILDPIPE_SCOPE: project` are cloned once per matching
//!   project, with unique labels and keys (`build` becomes `build:app`).
//! - A project matches when the git diff against the base branch touches one
//!   of its paths and none of its `skip` globs match the step label.
//! - Clones get `BUILDPIPE_PROJECT_LABEL` and `BUILDPIPE_PROJECT_PATH` plus
//!   the project's own env vars; `depends_on` references to other
//!   project-scoped steps are rewritten to the same-project sibling.
//!
//! ## Quick Start
//!
//! ```bash
//! # In a Buildkite bootstrap step:
//! buildpipe upload
//!
//! # Inspect the expansion locally
//! buildpipe upload --dry-run --no-diff
//!
//! # Check the configuration
//! buildpipe validate
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod projects;

// Re-export commonly used types
pub use config::Config;
pub use errors::{BuildpipeError, BuildpipeResult};
pub use pipeline::{expand, Pipeline};
pub use projects::{ChangeSet, Project};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
