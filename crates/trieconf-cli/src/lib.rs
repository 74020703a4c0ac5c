// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! trieconf command-line interface

pub mod render;
pub mod settings;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use render::SectionSummary;
use settings::{FlagOverrides, OutputFormat, Settings};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use trieconf_core::{BuildOptions, ConfigIndex};
use trieconf_logging::CliLoggingArgs;

#[derive(Parser, Debug)]
#[command(
    name = "trieconf",
    version,
    about = "Query a section trie built from a JSON configuration document"
)]
pub struct Cli {
    /// JSON document holding the section trie (`-` reads stdin)
    #[arg(long, short = 's', global = true)]
    pub source: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, global = true, env = "TRIECONF_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Reject sections whose siblings share an identifier
    #[arg(long, global = true)]
    pub unique_siblings: bool,

    /// Output format (default: text)
    #[arg(long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    #[command(flatten)]
    pub logging: CliLoggingArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve a request path such as `/applications/news`
    Lookup {
        /// Slash-delimited request path
        path: String,
    },
    /// List the route of every section
    Routes,
    /// Print the full JSON payload of a section
    Payload {
        /// Slash-delimited request path
        path: String,
    },
    /// Build the trie with duplicate-sibling checks and report its size
    Check,
}

impl Cli {
    pub fn flag_overrides(&self) -> FlagOverrides {
        FlagOverrides {
            source: self.source.clone(),
            unique_siblings: self.unique_siblings,
            output: self.output,
        }
    }

    /// Resolve settings and run the selected command, writing results to `out`
    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        let settings = settings::load(self.settings.as_deref(), &self.flag_overrides())?;
        run_command(&self.command, &settings, out)
    }
}

pub fn run_command<W: Write>(command: &Commands, settings: &Settings, out: &mut W) -> Result<()> {
    let mut options = BuildOptions {
        unique_siblings: settings.unique_siblings,
    };
    if matches!(command, Commands::Check) {
        options.unique_siblings = true;
    }

    let Some(source) = settings.source.as_deref() else {
        bail!("no trie source configured; pass --source or set `source` in the settings file");
    };
    let index = load_index(source, &options)?;

    match command {
        Commands::Lookup { path } => {
            let summary = SectionSummary::from(index.lookup(path)?);
            match settings.output {
                OutputFormat::Text => render::write_summary_text(out, &summary)?,
                OutputFormat::Json => render::write_json(out, &summary)?,
            }
        }
        Commands::Routes => match settings.output {
            OutputFormat::Text => render::write_routes_text(out, index.root().walk())?,
            OutputFormat::Json => {
                let summaries: Vec<_> = index.root().walk().map(SectionSummary::from).collect();
                render::write_json(out, &summaries)?
            }
        },
        Commands::Payload { path } => {
            let payload: serde_json::Value = index.lookup(path)?.project()?;
            render::write_json(out, &payload)?;
        }
        Commands::Check => match settings.output {
            OutputFormat::Text => writeln!(out, "ok: {} sections", index.len())?,
            OutputFormat::Json => {
                render::write_json(out, &serde_json::json!({ "sections": index.len() }))?
            }
        },
    }

    Ok(())
}

/// Build the index from a file, or from stdin when `source` is `-`
pub fn load_index(source: &Path, options: &BuildOptions) -> Result<ConfigIndex> {
    let index = if source == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes).context("reading trie from stdin")?;
        ConfigIndex::from_slice_with(&bytes, options)?
    } else {
        let file = std::fs::File::open(source)
            .with_context(|| format!("opening trie source {:?}", source))?;
        ConfigIndex::from_reader_with(std::io::BufReader::new(file), options)?
    };

    tracing::info!(source = %source.display(), sections = index.len(), "loaded section trie");
    Ok(index)
}
