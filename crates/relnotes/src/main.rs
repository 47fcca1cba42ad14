// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! relnotes: incremental CHANGELOG generator from git tags and
//! conventional commits
//!
//! This binary crate wires the configuration to the pipeline in the library
//! and initializes logging. Logs go to stderr so stdout stays clean for
//! shell use.

use anyhow::Context;
use clap::Parser;

use relnotes::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    relnotes::run(&config).context("changelog generation failed")?;
    Ok(())
}
