//! Exported symbols and the ordered symbol set.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{HeaderError, Result};

/// A single exported function name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol, rejecting anything that is not `[A-Za-z0-9_]+`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(HeaderError::InvalidSymbol { name });
        }
        Ok(Self(name))
    }

    /// The symbol name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether `s` is a non-empty run of ASCII letters, digits and underscores.
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Ordered, duplicate-free sequence of symbols.
///
/// Order is first-occurrence order of the input. The set is immutable once
/// built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
}

impl SymbolSet {
    /// Build a set from names, keeping the first occurrence of each.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols = names
            .into_iter()
            .map(Symbol::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_symbols(symbols))
    }

    /// Build a set from already-validated symbols, keeping first occurrences.
    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the set has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate in first-occurrence order.
    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    /// Symbol names in order.
    pub fn names(&self) -> Vec<&str> {
        self.symbols.iter().map(Symbol::as_str).collect()
    }

    /// Fail with [`HeaderError::ExtractionEmpty`] if nothing was found.
    ///
    /// Extraction itself never fails on an empty result; callers that treat
    /// "no symbols" as fatal use this.
    pub fn require_non_empty(self, marker: &str) -> Result<Self> {
        if self.is_empty() {
            return Err(HeaderError::ExtractionEmpty {
                marker: marker.to_string(),
            });
        }
        Ok(self)
    }
}

impl<'a> IntoIterator for &'a SymbolSet {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}
