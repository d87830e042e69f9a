// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Validate command - strict checks on the configuration

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::pipeline::ExpansionValidator;

/// Validate the configuration, including a full-fan-out expansion.
pub async fn run(config_path: PathBuf, verbose: bool) -> Result<()> {
    let config = Config::from_file(&config_path)?;

    let result = ExpansionValidator::validate(&config);

    if result.has_warnings() && (verbose || result.is_valid()) {
        eprintln!("{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            eprintln!("  {} {}", "⚠".yellow(), warning);
        }
    }

    if !result.is_valid() {
        eprintln!("{}", "Validation failed:".red().bold());
        for error in &result.errors {
            eprintln!("  {} {}", "✗".red(), error);
        }
        return Err(miette::miette!("Configuration is invalid"));
    }

    println!(
        "{} {} projects, {} template steps",
        "Valid:".green().bold(),
        config.projects.len(),
        config.steps.len()
    );

    Ok(())
}
