use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod converter;
mod handle_manifest;
mod manifest;

use handle_manifest::handle_manifest_command;
use manifest::Manifest;

#[derive(Subcommand)]
pub enum ManifestCommands {
    /// Write the built-in image list to a manifest file
    Init {
        /// Overwrite an existing manifest file
        #[arg(long)]
        force: bool,
        /// Where to write the manifest (default: ./patterns.json)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,
    },
    /// Show the image list that a run would use
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the manifest parses and is well formed.
    ///
    /// Images that do not exist yet are listed as `(missing)` for information
    /// only; they do not make validation fail.
    Validate,
}

#[derive(Parser)]
#[command(name = "pattern-base64")]
#[command(about = "Convert pattern images into base64 data URI definitions")]
#[command(version)]
struct Cli {
    /// JSON manifest listing the images to convert (default: built-in list)
    #[arg(long, global = true, value_name = "FILE", env = "PATTERN_BASE64_MANIFEST")]
    manifest: Option<PathBuf>,

    /// File the formatted lines are written to (overrides the manifest)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manifest file management commands
    Manifest {
        #[command(subcommand)]
        command: ManifestCommands,
    },
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if debug {
        filter = filter.add_directive(tracing::Level::DEBUG.into());
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Some(Commands::Manifest { command }) => {
            handle_manifest_command(command, cli.manifest.as_deref())?;
        }
        None => {
            let manifest = Manifest::load(cli.manifest.as_deref())?;
            let output_file = cli
                .output
                .unwrap_or_else(|| Manifest::expand_tilde(&manifest.output_file));
            converter::run(&manifest.images, &output_file)?;
        }
    }

    Ok(())
}
