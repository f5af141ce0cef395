//! Target platform families.
//!
//! Each variant fixes the stub document format, the symbol naming convention
//! and the kind of artifact the native toolchain produces.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// The kind of linkable artifact produced for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Link-only library resolving against a DLL at load time.
    ImportLibrary,
    /// Mach-O dynamic library.
    DynamicLibrary,
    /// ELF shared object.
    SharedObject,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::ImportLibrary => write!(f, "import library"),
            ArtifactKind::DynamicLibrary => write!(f, "dynamic library"),
            ArtifactKind::SharedObject => write!(f, "shared object"),
        }
    }
}

/// A target platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlatformTarget {
    /// Import-library platform (`lib.exe` + `.def`).
    Windows,
    /// Apple dynamic-library platform (`cc -dynamiclib` + `.S`).
    MacOs,
    /// ELF shared-object platform (`cc -shared` + `.S`).
    Linux,
}

impl PlatformTarget {
    /// All supported targets.
    pub const ALL: [PlatformTarget; 3] = [
        PlatformTarget::Windows,
        PlatformTarget::MacOs,
        PlatformTarget::Linux,
    ];

    /// Canonical lowercase identifier.
    pub fn name(self) -> &'static str {
        match self {
            PlatformTarget::Windows => "windows",
            PlatformTarget::MacOs => "macos",
            PlatformTarget::Linux => "linux",
        }
    }

    /// File suffix the downstream tool needs to recognize the stub format.
    pub fn stub_suffix(self) -> &'static str {
        match self {
            PlatformTarget::Windows => ".def",
            PlatformTarget::MacOs | PlatformTarget::Linux => ".S",
        }
    }

    /// Prefix the platform's C ABI puts on symbol names.
    pub fn symbol_prefix(self) -> &'static str {
        match self {
            PlatformTarget::MacOs => "_",
            PlatformTarget::Windows | PlatformTarget::Linux => "",
        }
    }

    /// Artifact produced by the toolchain.
    pub fn artifact_kind(self) -> ArtifactKind {
        match self {
            PlatformTarget::Windows => ArtifactKind::ImportLibrary,
            PlatformTarget::MacOs => ArtifactKind::DynamicLibrary,
            PlatformTarget::Linux => ArtifactKind::SharedObject,
        }
    }
}

impl std::fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for PlatformTarget {
    type Err = TargetError;

    /// Parse a platform identifier, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        PlatformTarget::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TargetError::UnsupportedPlatform {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for PlatformTarget {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PlatformTarget> for String {
    fn from(target: PlatformTarget) -> Self {
        target.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("windows".parse::<PlatformTarget>().unwrap(), PlatformTarget::Windows);
        assert_eq!("MacOS".parse::<PlatformTarget>().unwrap(), PlatformTarget::MacOs);
        assert_eq!("LINUX".parse::<PlatformTarget>().unwrap(), PlatformTarget::Linux);
    }

    #[test]
    fn parse_unknown_platform() {
        let err = "freebsd".parse::<PlatformTarget>().unwrap_err();
        assert!(matches!(
            &err,
            TargetError::UnsupportedPlatform { name } if name == "freebsd"
        ));
        assert!(err.to_string().contains("freebsd"));
        assert!("".parse::<PlatformTarget>().is_err());
    }

    #[test]
    fn names_round_trip() {
        for target in PlatformTarget::ALL {
            assert_eq!(target.to_string().parse::<PlatformTarget>().unwrap(), target);
        }
    }

    #[test]
    fn per_platform_conventions() {
        assert_eq!(PlatformTarget::Windows.stub_suffix(), ".def");
        assert_eq!(PlatformTarget::MacOs.stub_suffix(), ".S");
        assert_eq!(PlatformTarget::Linux.stub_suffix(), ".S");

        assert_eq!(PlatformTarget::MacOs.symbol_prefix(), "_");
        assert_eq!(PlatformTarget::Linux.symbol_prefix(), "");

        assert_eq!(PlatformTarget::Windows.artifact_kind(), ArtifactKind::ImportLibrary);
        assert_eq!(PlatformTarget::MacOs.artifact_kind(), ArtifactKind::DynamicLibrary);
        assert_eq!(PlatformTarget::Linux.artifact_kind(), ArtifactKind::SharedObject);
    }

    #[test]
    fn deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            platform: PlatformTarget,
        }
        let w: Wrapper = toml::from_str(r#"platform = "MacOS""#).unwrap();
        assert_eq!(w.platform, PlatformTarget::MacOs);
        assert!(toml::from_str::<Wrapper>(r#"platform = "amiga""#).is_err());
    }
}
