// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Projects command - show the registry and affected status

use colored::Colorize;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;
use crate::projects::ChangeSet;

#[derive(Serialize)]
struct ProjectStatus<'a> {
    label: &'a str,
    main_path: &'a str,
    affected: bool,
}

/// List projects and whether each is affected by the current change set.
pub async fn run(config_path: PathBuf, no_diff: bool, format: OutputFormat) -> Result<()> {
    let config = Config::from_file(&config_path)?;

    let changes = if no_diff {
        ChangeSet::all()
    } else {
        ChangeSet::detect(&config.base_branch).await?
    };

    let statuses: Vec<ProjectStatus<'_>> = config
        .projects
        .iter()
        .map(|project| ProjectStatus {
            label: &project.label,
            main_path: project.main_path(),
            affected: project.affected_by(&changes),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&statuses)
                .map_err(crate::errors::BuildpipeError::from)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for status in &statuses {
                let marker = if status.affected {
                    "●".green()
                } else {
                    "○".dimmed()
                };
                println!("{} {} ({})", marker, status.label.bold(), status.main_path);
            }
        }
    }

    Ok(())
}
