// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! Upload command - expand the pipeline and hand it to buildkite-agent

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;
use tracing::warn;

use crate::agent::BuildkiteAgent;
use crate::config::Config;
use crate::pipeline::{expand, ExpansionValidator};
use crate::projects::ChangeSet;

/// Expand the pipeline and upload (or print) it.
pub async fn run(config_path: PathBuf, dry_run: bool, no_diff: bool, verbose: bool) -> Result<()> {
    let config = Config::from_file(&config_path)?;

    let changes = if no_diff {
        ChangeSet::all()
    } else {
        ChangeSet::detect(&config.base_branch).await?
    };

    let pipeline = expand(&config.steps, &config.env, &config.projects, &changes);

    // Upload stays permissive about dangling dependencies; validate is the
    // strict path.
    for dangling in ExpansionValidator::dangling_dependencies(&pipeline) {
        warn!(dependency = %dangling, "dependency does not resolve to any expanded step");
    }

    if verbose {
        eprintln!(
            "{} {} template steps -> {} concrete steps",
            "Expanded".green().bold(),
            config.steps.len(),
            pipeline.steps.len()
        );
    }

    if dry_run {
        let yaml = pipeline.to_yaml()?;
        print!("{}", yaml);
        return Ok(());
    }

    let agent = BuildkiteAgent::discover()?;
    agent.upload(&pipeline).await?;

    Ok(())
}
