//! Export-marker declaration matcher.
//!
//! This is a narrow text pattern, not a C parser. A declaration is accepted
//! when it has the shape (multi-line mode, `^` matches at any line start):
//!
//! ```text
//! ^ \W* MARKER \W+ [A-Za-z0-9_ ]+ \W+ NAME \( [^;]* \) ;
//! ```
//!
//! - leading non-word characters, including blank lines, are skipped;
//! - the return type may only contain letters, digits, underscores and
//!   spaces, so `*` and other punctuation fall into the separating `\W+`;
//! - the parameter list may span lines and contain anything except `;`,
//!   which admits nested parentheses such as function-pointer parameters.
//!
//! Anything that does not fit is skipped without error.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{HeaderError, Result};
use crate::symbol::{is_identifier, Symbol, SymbolSet};

/// Export marker used by the Binary Ninja core header.
pub const DEFAULT_EXPORT_MARKER: &str = "BINARYNINJACOREAPI";

static DEFAULT_EXTRACTOR: LazyLock<Extractor> = LazyLock::new(|| {
    Extractor::new(DEFAULT_EXPORT_MARKER).expect("default export marker is a valid identifier")
});

/// Options controlling extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Token that tags a declaration as exported.
    pub export_marker: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            export_marker: DEFAULT_EXPORT_MARKER.to_string(),
        }
    }
}

/// Compiled declaration matcher for one export marker.
#[derive(Debug, Clone)]
pub struct Extractor {
    marker: String,
    pattern: Regex,
}

impl Extractor {
    /// Compile a matcher for `marker`, which must be a plain identifier.
    pub fn new(marker: &str) -> Result<Self> {
        if !is_identifier(marker) {
            return Err(HeaderError::InvalidMarker {
                marker: marker.to_string(),
            });
        }
        let source = format!(
            r"(?m)^\W*{}\W+[A-Za-z0-9_ ]+\W+([A-Za-z0-9_]+)\([^;]*\);",
            regex::escape(marker)
        );
        let pattern = Regex::new(&source).map_err(|_| HeaderError::InvalidMarker {
            marker: marker.to_string(),
        })?;
        Ok(Self {
            marker: marker.to_string(),
            pattern,
        })
    }

    /// Compile a matcher from options.
    pub fn from_options(options: &ExtractOptions) -> Result<Self> {
        Self::new(&options.export_marker)
    }

    /// The export marker this matcher looks for.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Extract exported function names in first-occurrence order.
    pub fn extract(&self, header: &str) -> SymbolSet {
        let mut matched = 0usize;
        let names = self
            .pattern
            .captures_iter(header)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| Symbol::new(m.as_str()).ok())
            .inspect(|_| matched += 1)
            .collect::<Vec<_>>();
        let set = SymbolSet::from_symbols(names);
        debug!(
            marker = %self.marker,
            matched,
            unique = set.len(),
            "extracted exported declarations"
        );
        set
    }
}

/// Extract exported function names using [`DEFAULT_EXPORT_MARKER`].
pub fn extract(header: &str) -> SymbolSet {
    DEFAULT_EXTRACTOR.extract(header)
}

/// Read a header file and extract its exported function names.
pub fn extract_file(path: &Path, options: &ExtractOptions) -> Result<SymbolSet> {
    let extractor = Extractor::from_options(options)?;
    let header = std::fs::read_to_string(path).map_err(|source| HeaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extractor.extract(&header))
}
