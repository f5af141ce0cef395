//! Exported-symbol extraction from C headers.
//!
//! Scans header text for declarations tagged with an export marker and
//! produces the ordered, de-duplicated list of function names that a stub
//! library has to define.
//!
//! ## Modules
//!
//! - [`symbol`] — `Symbol` and the ordered `SymbolSet`
//! - [`extract`] — Export-marker declaration matcher
//! - [`error`] — Error types

pub mod error;
pub mod extract;
pub mod symbol;

// Re-export key types for convenience
pub use error::HeaderError;
pub use extract::{extract, extract_file, ExtractOptions, Extractor, DEFAULT_EXPORT_MARKER};
pub use symbol::{Symbol, SymbolSet};
