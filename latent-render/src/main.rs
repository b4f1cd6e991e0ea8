// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! latent-render - transformer animation preview tool
//!
//! # Commands
//!
//! - `list` - List registered compositions
//! - `preview` - Write a self-contained HTML preview of one frame
//! - `frames` - Dump per-frame state (camera, captions, groups, labels) as JSON
//! - `dataset` - Dump the synthetic dataset behind a composition as JSON

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::{execute_command, Cli};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    execute_command(&cli.command)
}
