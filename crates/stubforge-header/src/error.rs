//! Header extraction error types.

use std::path::PathBuf;

/// Errors that can occur while extracting symbols from a header.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// No exported declarations were found.
    #[error("no exported symbols found (export marker '{marker}')")]
    ExtractionEmpty { marker: String },

    /// A symbol name is empty or not a plain identifier.
    #[error("invalid symbol name '{name}'")]
    InvalidSymbol { name: String },

    /// The export marker is not a plain identifier.
    #[error("invalid export marker '{marker}'")]
    InvalidMarker { marker: String },

    /// Failed to read the header file.
    #[error("reading header {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for header operations.
pub type Result<T> = std::result::Result<T, HeaderError>;
