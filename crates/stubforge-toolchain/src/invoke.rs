//! Temp-file staging and external tool execution.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use stubforge_header::SymbolSet;
use stubforge_targets::{generate, PlatformTarget, StubDocument, StubOptions};
use tempfile::TempPath;
use tracing::{debug, info, warn};

use crate::command::ToolInvocation;
use crate::error::{Result, ToolchainError};

/// Whether the external tool is actually run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Stage the stub and run the tool.
    #[default]
    Execute,
    /// Stage the stub and log the command without running it.
    DryRun,
}

/// Program names and scratch location for the toolchain.
///
/// Argument templates are fixed; only the programs are configurable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ToolchainConfig {
    /// C compiler used for macOS and Linux.
    pub cc: String,
    /// Library archiver used for Windows.
    pub archiver: String,
    /// Directory for the temporary stub file (system default if unset).
    pub temp_dir: Option<PathBuf>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            cc: "cc".to_string(),
            archiver: "lib".to_string(),
            temp_dir: None,
        }
    }
}

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Platform the stub was generated for.
    pub target: PlatformTarget,
    /// The command that was run (or would have been, in dry-run mode).
    pub invocation: ToolInvocation,
    /// Temp file the stub was staged in; removed by the time this is returned.
    pub stub_path: PathBuf,
    /// Library path handed to the tool.
    pub output_path: PathBuf,
    /// Whether the tool was run.
    pub mode: ExecutionMode,
    /// Number of stub symbols defined.
    pub symbol_count: usize,
    /// SHA-256 of the stub text.
    pub stub_digest: String,
}

/// Result of probing for a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// The tool started; first line of its banner/version output.
    Available { version: String },
    /// The tool could not be started.
    Missing { reason: String },
}

/// Runs the native toolchain for a platform.
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    config: ToolchainConfig,
}

impl Toolchain {
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    /// Program used for `target`.
    pub fn program_for(&self, target: PlatformTarget) -> &str {
        match target {
            PlatformTarget::Windows => &self.config.archiver,
            PlatformTarget::MacOs | PlatformTarget::Linux => &self.config.cc,
        }
    }

    /// Parse `platform`, generate the stub and build it.
    ///
    /// An unknown platform fails before anything touches the filesystem.
    pub fn build_named(
        &self,
        platform: &str,
        symbols: &SymbolSet,
        options: &StubOptions,
        output_path: &Path,
        mode: ExecutionMode,
    ) -> Result<BuildReport> {
        let target: PlatformTarget = platform.parse()?;
        let stub = generate(symbols, target, options);
        self.build(&stub, output_path, mode)
    }

    /// Stage `stub` in a temp file and run the platform tool on it.
    ///
    /// The temp file is removed whether or not the tool succeeds. A failure
    /// to remove it is logged and never replaces the tool's own error.
    pub fn build(
        &self,
        stub: &StubDocument,
        output_path: &Path,
        mode: ExecutionMode,
    ) -> Result<BuildReport> {
        let base_name = output_path
            .file_name()
            .ok_or_else(|| ToolchainError::InvalidOutputPath {
                path: output_path.to_path_buf(),
            })?;

        let temp = self.stage(stub)?;
        let stub_path = temp.to_path_buf();
        let invocation = ToolInvocation::for_target(
            stub.target,
            self.program_for(stub.target),
            &stub_path,
            output_path,
            base_name,
        );

        let outcome = match mode {
            ExecutionMode::Execute => run(&invocation),
            ExecutionMode::DryRun => {
                info!(command = %invocation, "dry run: not invoking toolchain");
                Ok(())
            }
        };

        if let Err(e) = temp.close() {
            warn!(path = %stub_path.display(), error = %e, "failed to remove temporary stub file");
        }
        outcome?;

        Ok(BuildReport {
            target: stub.target,
            invocation,
            stub_path,
            output_path: output_path.to_path_buf(),
            mode,
            symbol_count: stub.symbol_count,
            stub_digest: stub.digest(),
        })
    }

    /// Check whether the tool for `target` can be started.
    pub fn probe(&self, target: PlatformTarget) -> ToolStatus {
        let program = self.program_for(target);
        // `lib` prints its banner on any invocation; it has no version flag.
        let args: &[&str] = match target {
            PlatformTarget::Windows => &["/NOLOGO", "/?"],
            PlatformTarget::MacOs | PlatformTarget::Linux => &["--version"],
        };
        match std::process::Command::new(program).args(args).output() {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let version = stdout
                    .lines()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("(unknown version)")
                    .trim()
                    .to_string();
                ToolStatus::Available { version }
            }
            Err(e) => ToolStatus::Missing {
                reason: e.to_string(),
            },
        }
    }

    /// Write the stub into a uniquely named temp file and close the handle.
    ///
    /// On a write failure the file is dropped, which deletes it.
    fn stage(&self, stub: &StubDocument) -> Result<TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("stubforge-").suffix(stub.suffix);
        let mut file = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|source| ToolchainError::TempFile { source })?;

        file.write_all(stub.text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| ToolchainError::TempFile { source })?;

        debug!(path = %file.path().display(), bytes = stub.text.len(), "staged stub source");
        Ok(file.into_temp_path())
    }
}

/// Run the tool to completion; non-zero exit or spawn failure is an error.
fn run(invocation: &ToolInvocation) -> Result<()> {
    info!(command = %invocation, "invoking toolchain");
    let output = invocation
        .to_command()
        .output()
        .map_err(|e| ToolchainError::ToolchainFailure {
            program: invocation.program.clone(),
            detail: format!("failed to start: {e}"),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(ToolchainError::ToolchainFailure {
            program: invocation.program.clone(),
            detail: failure_detail(&output.status, stdout.trim(), stderr.trim()),
        });
    }

    if !stdout.trim().is_empty() {
        debug!(program = %invocation.program, stdout = %stdout.trim(), "toolchain output");
    }
    if !stderr.trim().is_empty() {
        debug!(program = %invocation.program, stderr = %stderr.trim(), "toolchain diagnostics");
    }
    Ok(())
}

/// Exit status followed by whatever the tool printed.
///
/// `lib.exe` reports fatal errors on stdout, so both streams are kept.
fn failure_detail(status: &std::process::ExitStatus, stdout: &str, stderr: &str) -> String {
    let output: Vec<&str> = [stderr, stdout].into_iter().filter(|s| !s.is_empty()).collect();
    if output.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {}", output.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stubforge_targets::TargetError;

    fn symbols() -> SymbolSet {
        SymbolSet::from_names(["Foo", "Bar"]).unwrap()
    }

    fn toolchain_in(dir: &Path) -> Toolchain {
        Toolchain::new(ToolchainConfig {
            temp_dir: Some(dir.to_path_buf()),
            ..ToolchainConfig::default()
        })
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn default_programs() {
        let tc = Toolchain::default();
        assert_eq!(tc.program_for(PlatformTarget::Windows), "lib");
        assert_eq!(tc.program_for(PlatformTarget::MacOs), "cc");
        assert_eq!(tc.program_for(PlatformTarget::Linux), "cc");
    }

    #[test]
    fn config_from_toml() {
        let cfg: ToolchainConfig = toml::from_str(r#"cc = "clang""#).unwrap();
        assert_eq!(cfg.cc, "clang");
        assert_eq!(cfg.archiver, "lib");
        assert!(cfg.temp_dir.is_none());

        let cfg: ToolchainConfig = toml::from_str("temp-dir = \"build/tmp\"").unwrap();
        assert_eq!(cfg.temp_dir, Some(PathBuf::from("build/tmp")));
    }

    #[test]
    fn unknown_platform_fails_before_staging() {
        let scratch = tempfile::tempdir().unwrap();
        let tc = toolchain_in(scratch.path());
        let out = scratch.path().join("libcore.so");

        let err = tc
            .build_named("plan9", &symbols(), &StubOptions::default(), &out, ExecutionMode::Execute)
            .unwrap_err();
        assert!(matches!(
            err,
            ToolchainError::Target(TargetError::UnsupportedPlatform { ref name }) if name == "plan9"
        ));
        assert_eq!(entries(scratch.path()), 0);
    }

    #[test]
    fn output_without_file_name_rejected() {
        let scratch = tempfile::tempdir().unwrap();
        let tc = toolchain_in(scratch.path());
        let stub = generate(&symbols(), PlatformTarget::Linux, &StubOptions::default());

        let err = tc.build(&stub, Path::new("/"), ExecutionMode::DryRun).unwrap_err();
        assert!(matches!(err, ToolchainError::InvalidOutputPath { .. }));
        assert_eq!(entries(scratch.path()), 0);
    }

    #[test]
    fn dry_run_stages_and_removes_stub() {
        let scratch = tempfile::tempdir().unwrap();
        let tc = toolchain_in(scratch.path());
        let stub = generate(&symbols(), PlatformTarget::Windows, &StubOptions::default());
        let out = scratch.path().join("core.lib");

        let report = tc.build(&stub, &out, ExecutionMode::DryRun).unwrap();
        assert_eq!(report.mode, ExecutionMode::DryRun);
        assert_eq!(report.symbol_count, 2);
        assert_eq!(report.stub_digest, stub.digest());
        assert!(report.stub_path.starts_with(scratch.path()));
        assert_eq!(
            report.stub_path.extension().and_then(|e| e.to_str()),
            Some("def")
        );
        assert!(!report.stub_path.exists());
        assert_eq!(report.invocation.program, "lib");
        assert_eq!(entries(scratch.path()), 0);
        assert!(!out.exists());
    }

    #[test]
    fn missing_program_is_toolchain_failure() {
        let scratch = tempfile::tempdir().unwrap();
        let tc = Toolchain::new(ToolchainConfig {
            cc: "stubforge-no-such-compiler".to_string(),
            temp_dir: Some(scratch.path().to_path_buf()),
            ..ToolchainConfig::default()
        });
        let stub = generate(&symbols(), PlatformTarget::Linux, &StubOptions::default());

        let err = tc
            .build(&stub, &scratch.path().join("libcore.so"), ExecutionMode::Execute)
            .unwrap_err();
        assert!(matches!(
            err,
            ToolchainError::ToolchainFailure { ref program, .. } if program == "stubforge-no-such-compiler"
        ));
        assert_eq!(entries(scratch.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn failure_detail_keeps_both_streams() {
        use std::os::unix::process::ExitStatusExt;
        let status = std::process::ExitStatus::from_raw(1 << 8);

        assert_eq!(failure_detail(&status, "", ""), "exit status: 1");
        assert_eq!(
            failure_detail(&status, "LNK1104: cannot open file", ""),
            "exit status: 1: LNK1104: cannot open file"
        );
        assert_eq!(
            failure_detail(&status, "out", "err"),
            "exit status: 1: err\nout"
        );
    }

    #[test]
    fn probe_missing_tool() {
        let tc = Toolchain::new(ToolchainConfig {
            archiver: "stubforge-no-such-archiver".to_string(),
            ..ToolchainConfig::default()
        });
        assert!(matches!(
            tc.probe(PlatformTarget::Windows),
            ToolStatus::Missing { .. }
        ));
    }
}
