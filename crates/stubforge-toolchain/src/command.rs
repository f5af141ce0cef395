//! Fixed argument templates for the native tools.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use stubforge_targets::PlatformTarget;

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Program to run.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<OsString>,
}

impl ToolInvocation {
    /// Build the invocation for `target`.
    ///
    /// `program` is the archiver for Windows and the C compiler otherwise;
    /// `base_name` is the output file name embedded as soname/install name.
    pub fn for_target(
        target: PlatformTarget,
        program: &str,
        stub_path: &Path,
        output_path: &Path,
        base_name: &OsStr,
    ) -> Self {
        let args = match target {
            PlatformTarget::Windows => vec![
                prefixed("/DEF:", stub_path.as_os_str()),
                prefixed("/OUT:", output_path.as_os_str()),
            ],
            PlatformTarget::MacOs => vec![
                "-dynamiclib".into(),
                "-arch".into(),
                "arm64".into(),
                "-arch".into(),
                "x86_64".into(),
                prefixed("-Wl,-install_name,", base_name),
                stub_path.into(),
                "-o".into(),
                output_path.into(),
            ],
            PlatformTarget::Linux => vec![
                stub_path.into(),
                "-fPIC".into(),
                "-shared".into(),
                prefixed("-Wl,-soname,", base_name),
                "-o".into(),
                output_path.into(),
            ],
        };
        Self {
            program: program.to_string(),
            args,
        }
    }

    /// Arguments as lossy UTF-8 strings.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// A `std::process::Command` ready to spawn.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl std::fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

fn prefixed(prefix: &str, value: &OsStr) -> OsString {
    let mut s = OsString::from(prefix);
    s.push(value);
    s
}
