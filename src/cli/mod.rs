// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for buildpipe.

pub mod projects;
pub mod upload;
pub mod validate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dynamic Buildkite pipeline generator for monorepos
#[derive(Parser, Debug)]
#[clap(
    name = "buildpipe",
    version,
    about = "Expand a templated Buildkite pipeline per monorepo project",
    long_about = None,
    after_help = "Examples:\n\
        buildpipe upload                Expand and upload the pipeline\n\
        buildpipe upload --dry-run      Print the expanded pipeline instead\n\
        buildpipe validate              Check the configuration\n\
        buildpipe projects              List projects and affected status\n\n\
        See 'buildpipe <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file
    #[clap(short, long, global = true, default_value = ".buildpipe.yml", value_name = "FILE")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand the pipeline and upload it via buildkite-agent
    Upload {
        /// Print the expanded pipeline instead of uploading
        #[clap(long)]
        dry_run: bool,

        /// Skip git diff detection and expand for every project
        #[clap(long)]
        no_diff: bool,
    },

    /// Validate the configuration and a full-fan-out expansion
    Validate,

    /// List projects and whether each is affected by the current changes
    Projects {
        /// Treat every project as affected (skip git diff)
        #[clap(long)]
        no_diff: bool,

        /// Output format (text or json)
        #[clap(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for the projects command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
