//! Platform targets and stub source generation for stubforge.
//!
//! A [`PlatformTarget`] selects both the intermediate document format and the
//! toolchain strategy used to turn it into a linkable artifact:
//! - **Windows:** module-definition (`.def`) file, archived into an import library
//! - **macOS:** assembly (`.S`) with underscore-prefixed labels, built as a universal dylib
//! - **Linux:** assembly (`.S`) with plain labels, built as an ELF shared object

pub mod error;
pub mod generate;
pub mod platform;

pub use error::TargetError;
pub use generate::{generate, StubDocument, StubOptions, DEFAULT_LIBRARY_NAME};
pub use platform::{ArtifactKind, PlatformTarget};
