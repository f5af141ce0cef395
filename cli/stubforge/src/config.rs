//! `stubforge.toml` parsing and option resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use stubforge_header::ExtractOptions;
use stubforge_targets::StubOptions;
use stubforge_toolchain::ToolchainConfig;

/// File name searched for when no `--config` is given.
pub const CONFIG_FILE: &str = "stubforge.toml";

/// The top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StubforgeConfig {
    /// Library naming.
    #[serde(default)]
    pub library: LibraryConfig,
    /// Header scanning.
    #[serde(default)]
    pub header: HeaderConfig,
    /// Native tools.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// `[library]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LibraryConfig {
    /// Name on the `LIBRARY` line of `.def` files.
    #[serde(default)]
    pub name: Option<String>,
}

/// `[header]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HeaderConfig {
    #[serde(default)]
    pub export_marker: Option<String>,
    /// Accept headers with no exported declarations.
    #[serde(default)]
    pub allow_empty: Option<bool>,
}

impl StubforgeConfig {
    /// Search upward from `start_dir` for `stubforge.toml`, returning the
    /// parsed file and the path it was read from.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, candidate)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Read and parse a specific config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Extraction options; `marker` overrides the config value.
    pub fn extract_options(&self, marker: Option<&str>) -> ExtractOptions {
        match marker.or(self.header.export_marker.as_deref()) {
            Some(m) => ExtractOptions {
                export_marker: m.to_string(),
            },
            None => ExtractOptions::default(),
        }
    }

    /// Generation options; `library_name` overrides the config value.
    pub fn stub_options(&self, library_name: Option<&str>) -> StubOptions {
        match library_name.or(self.library.name.as_deref()) {
            Some(name) => StubOptions {
                library_name: name.to_string(),
            },
            None => StubOptions::default(),
        }
    }

    /// Whether an empty extraction is acceptable; the flag only ever enables it.
    pub fn allow_empty(&self, flag: bool) -> bool {
        flag || self.header.allow_empty.unwrap_or(false)
    }

    /// The default template for `stubforge init`.
    pub fn template() -> String {
        format!(
            r#"[library]
name = "{library}"

[header]
export-marker = "{marker}"
allow-empty = false

[toolchain]
cc = "cc"
archiver = "lib"
"#,
            library = stubforge_targets::DEFAULT_LIBRARY_NAME,
            marker = stubforge_header::DEFAULT_EXPORT_MARKER,
        )
    }
}
