//! `stubforge build` — header to linkable stub library.

use std::path::Path;

use anyhow::{Context, Result};
use stubforge_header::{extract_file, SymbolSet};
use stubforge_targets::{generate, PlatformTarget};
use stubforge_toolchain::{BuildReport, ExecutionMode, Toolchain};

use crate::config::StubforgeConfig;

/// Options for one build, after CLI parsing.
#[derive(Debug, Clone)]
pub struct BuildOptions<'a> {
    pub header: &'a Path,
    pub outfile: &'a Path,
    pub platform: PlatformTarget,
    pub library_name: Option<&'a str>,
    pub export_marker: Option<&'a str>,
    pub allow_empty: bool,
    pub mode: ExecutionMode,
}

/// Run extraction, generation and the toolchain; print a one-line summary.
pub fn run(config: &StubforgeConfig, opts: &BuildOptions<'_>) -> Result<()> {
    let report = build(config, opts)?;
    let verb = match report.mode {
        ExecutionMode::Execute => "Generated",
        ExecutionMode::DryRun => "Would generate",
    };
    println!(
        "{verb} {} with {} symbols → {}",
        report.target.artifact_kind(),
        report.symbol_count,
        report.output_path.display()
    );
    if report.mode == ExecutionMode::DryRun {
        println!("  command: {}", report.invocation);
    }
    println!("  stub sha256: {}", report.stub_digest);
    Ok(())
}

/// The pipeline behind [`run`], returning the toolchain report.
pub fn build(config: &StubforgeConfig, opts: &BuildOptions<'_>) -> Result<BuildReport> {
    let symbols = load_symbols(
        config,
        opts.header,
        opts.export_marker,
        config.allow_empty(opts.allow_empty),
    )?;

    let stub = generate(&symbols, opts.platform, &config.stub_options(opts.library_name));

    let toolchain = Toolchain::new(config.toolchain.clone());
    toolchain
        .build(&stub, opts.outfile, opts.mode)
        .with_context(|| {
            format!(
                "building {} for {} with {}",
                opts.outfile.display(),
                opts.platform,
                toolchain.program_for(opts.platform)
            )
        })
}

/// Extract symbols from `header`, failing on an empty result unless allowed.
pub fn load_symbols(
    config: &StubforgeConfig,
    header: &Path,
    export_marker: Option<&str>,
    allow_empty: bool,
) -> Result<SymbolSet> {
    let options = config.extract_options(export_marker);
    let symbols = extract_file(header, &options)
        .with_context(|| format!("extracting symbols from {}", header.display()))?;
    if allow_empty {
        return Ok(symbols);
    }
    symbols
        .require_non_empty(&options.export_marker)
        .with_context(|| format!("extracting symbols from {}", header.display()))
}
