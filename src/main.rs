// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 buildpipe contributors

//! buildpipe - Dynamic Buildkite pipeline generator for monorepos

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use buildpipe::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buildpipe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { dry_run, no_diff } => {
            buildpipe::cli::upload::run(cli.config, dry_run, no_diff, cli.verbose).await
        }
        Commands::Validate => buildpipe::cli::validate::run(cli.config, cli.verbose).await,
        Commands::Projects { no_diff, format } => {
            buildpipe::cli::projects::run(cli.config, no_diff, format).await
        }
    }
}
