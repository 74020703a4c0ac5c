// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

use clap::Parser;
use std::process::ExitCode;
use trieconf_cli::Cli;
use trieconf_core::TrieError;

/// Exit status for a request path that names no section
const EXIT_LOOKUP_MISS: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = cli.logging.init("trieconf-cli") {
        eprintln!("Warning: failed to initialize logging: {e:#}");
    }

    let stdout = std::io::stdout();
    match cli.run(&mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e:#}");
            match e.downcast_ref::<TrieError>() {
                Some(err) if err.is_lookup_miss() => ExitCode::from(EXIT_LOOKUP_MISS),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
