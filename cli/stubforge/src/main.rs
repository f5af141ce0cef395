//! stubforge — generate linkable stub libraries from C headers.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use stubforge_targets::PlatformTarget;
use stubforge_toolchain::ExecutionMode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::build::BuildOptions;
use config::StubforgeConfig;

#[derive(Parser)]
#[command(
    name = "stubforge",
    version,
    about = "Generate a linkable stub library from a C header"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Config file (default: nearest stubforge.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a stub library from a header
    Build {
        /// Path to the C header
        #[arg(short = 'i', long)]
        header: PathBuf,
        /// Path of the library to produce
        #[arg(short, long)]
        outfile: PathBuf,
        /// Target platform (windows, macos, linux)
        #[arg(short, long)]
        platform: PlatformTarget,
        /// Name for the LIBRARY line of the .def file
        #[arg(long)]
        library_name: Option<String>,
        /// Token marking exported declarations
        #[arg(long)]
        export_marker: Option<String>,
        /// Succeed even if no symbols are found
        #[arg(long)]
        allow_empty: bool,
        /// Stage the stub and print the toolchain command without running it
        #[arg(long)]
        dry_run: bool,
    },
    /// List the exported symbols a header declares
    Symbols {
        /// Path to the C header
        #[arg(short = 'i', long)]
        header: PathBuf,
        /// Token marking exported declarations
        #[arg(long)]
        export_marker: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Print or write the stub source without invoking a toolchain
    Emit {
        /// Path to the C header
        #[arg(short = 'i', long)]
        header: PathBuf,
        /// Target platform (windows, macos, linux)
        #[arg(short, long)]
        platform: PlatformTarget,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Name for the LIBRARY line of the .def file
        #[arg(long)]
        library_name: Option<String>,
        /// Token marking exported declarations
        #[arg(long)]
        export_marker: Option<String>,
    },
    /// Check that the native tools can be started
    Doctor {
        /// Check only this platform's tool
        #[arg(short, long)]
        platform: Option<PlatformTarget>,
    },
    /// Write a starter stubforge.toml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Build {
            header,
            outfile,
            platform,
            library_name,
            export_marker,
            allow_empty,
            dry_run,
        } => {
            let (config, _) = load_config(cli.config.as_deref(), &cwd)?;
            let mode = if dry_run {
                ExecutionMode::DryRun
            } else {
                ExecutionMode::Execute
            };
            commands::build::run(
                &config,
                &BuildOptions {
                    header: &header,
                    outfile: &outfile,
                    platform,
                    library_name: library_name.as_deref(),
                    export_marker: export_marker.as_deref(),
                    allow_empty,
                    mode,
                },
            )
        }

        Commands::Symbols {
            header,
            export_marker,
            format,
        } => {
            let (config, _) = load_config(cli.config.as_deref(), &cwd)?;
            commands::symbols::run(
                &config,
                &header,
                export_marker.as_deref(),
                format.as_deref(),
            )
        }

        Commands::Emit {
            header,
            platform,
            output,
            library_name,
            export_marker,
        } => {
            let (config, _) = load_config(cli.config.as_deref(), &cwd)?;
            commands::emit::run(
                &config,
                &header,
                platform,
                library_name.as_deref(),
                export_marker.as_deref(),
                output.as_deref(),
            )
        }

        Commands::Doctor { platform } => {
            let (config, path) = load_config(cli.config.as_deref(), &cwd)?;
            commands::doctor::run(&config, path.as_deref(), platform)
        }

        Commands::Init => commands::init::run(&cwd),
    }
}

/// Load the explicit config file, or the nearest `stubforge.toml`, or defaults.
fn load_config(
    explicit: Option<&Path>,
    cwd: &Path,
) -> anyhow::Result<(StubforgeConfig, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let config = StubforgeConfig::load(path)?;
        debug!(path = %path.display(), "loaded config");
        return Ok((config, Some(path.to_path_buf())));
    }
    match StubforgeConfig::find_and_load(cwd)? {
        Some((config, path)) => {
            debug!(path = %path.display(), "loaded config");
            Ok((config, Some(path)))
        }
        None => Ok((StubforgeConfig::default(), None)),
    }
}
