//! `stubforge doctor` — toolchain diagnostics.

use std::path::Path;

use anyhow::Result;
use stubforge_targets::PlatformTarget;
use stubforge_toolchain::{ToolStatus, Toolchain};

use crate::config::StubforgeConfig;

/// Print config location and whether each platform's tool can be started.
pub fn run(
    config: &StubforgeConfig,
    config_path: Option<&Path>,
    platform: Option<PlatformTarget>,
) -> Result<()> {
    println!("=== stubforge doctor ===");
    println!();
    println!("stubforge version: {}", env!("CARGO_PKG_VERSION"));
    match config_path {
        Some(path) => println!("config: {}", path.display()),
        None => println!("config: none (using defaults)"),
    }
    println!();

    println!("--- Toolchain ---");
    let toolchain = Toolchain::new(config.toolchain.clone());
    let targets: Vec<PlatformTarget> = match platform {
        Some(p) => vec![p],
        None => PlatformTarget::ALL.to_vec(),
    };
    for target in targets {
        let program = toolchain.program_for(target);
        match toolchain.probe(target) {
            ToolStatus::Available { version } => {
                println!("  {target:<8} {program}: {version}");
            }
            ToolStatus::Missing { reason } => {
                println!("  {target:<8} {program}: not found ({reason})");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_runs_without_error() {
        run(&StubforgeConfig::default(), None, None).unwrap();
        run(&StubforgeConfig::default(), None, Some(PlatformTarget::Linux)).unwrap();
    }
}
