// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Pipeline expansion
//!
//! The core of buildpipe: turning a templated step list into the concrete
//! per-project pipeline that gets uploaded to Buildkite.

mod clone;
mod definition;
mod expand;
pub mod step;
mod validation;

pub use clone::{clone_for_projects, interpolate_project_label, CACHE_PLUGIN_KEY};
pub use definition::Pipeline;
pub use expand::expand;
pub use validation::{ExpansionValidator, ValidationResult};
