//! Toolchain errors.

use std::path::PathBuf;

use stubforge_targets::TargetError;
use thiserror::Error;

/// Errors that can occur while turning a stub document into a library.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// No strategy exists for the requested platform.
    #[error(transparent)]
    Target(#[from] TargetError),

    /// The output path has no final component to use as the library name.
    #[error("output path {} has no file name", path.display())]
    InvalidOutputPath { path: PathBuf },

    /// The temp file for the stub could not be created or written.
    #[error("creating temporary stub file: {source}")]
    TempFile {
        #[source]
        source: std::io::Error,
    },

    /// The external tool could not be started or exited non-zero.
    #[error("{program} failed: {detail}")]
    ToolchainFailure { program: String, detail: String },
}

/// Result type alias for toolchain operations.
pub type Result<T> = std::result::Result<T, ToolchainError>;
