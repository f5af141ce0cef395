//! `stubforge emit` — write the stub source without running a toolchain.

use std::path::Path;

use anyhow::{Context, Result};
use stubforge_targets::{generate, PlatformTarget, StubDocument};

use crate::commands::build::load_symbols;
use crate::config::StubforgeConfig;

/// Generate the stub document and print it, or write it to `output`.
pub fn run(
    config: &StubforgeConfig,
    header: &Path,
    platform: PlatformTarget,
    library_name: Option<&str>,
    export_marker: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let stub = render(config, header, platform, library_name, export_marker)?;
    match output {
        Some(path) => {
            std::fs::write(path, &stub.text)
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "Wrote {} stub ({} symbols, sha256 {}) → {}",
                platform,
                stub.symbol_count,
                stub.digest(),
                path.display()
            );
        }
        None => print!("{}", stub.text),
    }
    Ok(())
}

fn render(
    config: &StubforgeConfig,
    header: &Path,
    platform: PlatformTarget,
    library_name: Option<&str>,
    export_marker: Option<&str>,
) -> Result<StubDocument> {
    let symbols = load_symbols(
        config,
        header,
        export_marker,
        config.allow_empty(false),
    )?;
    Ok(generate(&symbols, platform, &config.stub_options(library_name)))
}
