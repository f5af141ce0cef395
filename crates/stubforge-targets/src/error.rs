//! Error types for target platform operations.

/// Errors that can occur while selecting a target platform.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// The platform identifier names no known target.
    #[error("unsupported platform '{name}' (expected one of: windows, macos, linux)")]
    UnsupportedPlatform {
        /// The identifier as given.
        name: String,
    },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
