//! Stub source generation.
//!
//! Renders a [`SymbolSet`] into the intermediate text the platform toolchain
//! consumes: a module-definition file for Windows, or an assembly listing that
//! defines every symbol as a bare `ret` for macOS and Linux.

use sha2::{Digest, Sha256};
use stubforge_header::SymbolSet;
use tracing::debug;

use crate::platform::PlatformTarget;

/// Logical library name written on the `LIBRARY` line by default.
pub const DEFAULT_LIBRARY_NAME: &str = "binaryninjacore.dll";

/// Options controlling stub generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubOptions {
    /// Name placed on the `LIBRARY` line of module-definition files.
    pub library_name: String,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            library_name: DEFAULT_LIBRARY_NAME.to_string(),
        }
    }
}

/// Generated stub source, ready to hand to the toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubDocument {
    /// Platform the document was generated for.
    pub target: PlatformTarget,
    /// Document text.
    pub text: String,
    /// Suffix the temp file must carry (e.g. `.def`, `.S`).
    pub suffix: &'static str,
    /// Number of symbols defined.
    pub symbol_count: usize,
}

impl StubDocument {
    /// SHA-256 of the document text as lowercase hex.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        let hash: [u8; 32] = hasher.finalize().into();
        hash.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Render `symbols` into the stub document for `target`.
///
/// Symbols appear in set order, so identical inputs give byte-identical
/// output.
pub fn generate(symbols: &SymbolSet, target: PlatformTarget, options: &StubOptions) -> StubDocument {
    let text = match target {
        PlatformTarget::Windows => render_def(symbols, &options.library_name),
        PlatformTarget::MacOs => render_asm(symbols, ".text", target.symbol_prefix()),
        PlatformTarget::Linux => render_asm(symbols, ".section .text", target.symbol_prefix()),
    };
    debug!(%target, symbols = symbols.len(), bytes = text.len(), "generated stub source");
    StubDocument {
        target,
        text,
        suffix: target.stub_suffix(),
        symbol_count: symbols.len(),
    }
}

/// `LIBRARY` line, blank line, `EXPORTS`, one indented name per symbol.
fn render_def(symbols: &SymbolSet, library_name: &str) -> String {
    let mut out = format!("LIBRARY {library_name}\n\nEXPORTS\n");
    for symbol in symbols {
        out.push_str("    ");
        out.push_str(symbol.as_str());
        out.push('\n');
    }
    out
}

/// Section directive, blank line, then an aligned global `ret` per symbol.
fn render_asm(symbols: &SymbolSet, section: &str, prefix: &str) -> String {
    let mut out = format!("{section}\n\n");
    for symbol in symbols {
        let name = format!("{prefix}{symbol}");
        out.push_str(".align 4\n");
        out.push_str(&format!(".global {name}\n"));
        out.push_str(&format!("{name}:\n"));
        out.push_str("\tret\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo_bar() -> SymbolSet {
        SymbolSet::from_names(["Foo", "Bar"]).unwrap()
    }

    fn options(name: &str) -> StubOptions {
        StubOptions {
            library_name: name.to_string(),
        }
    }

    #[test]
    fn windows_def_exact() {
        let doc = generate(&foo_bar(), PlatformTarget::Windows, &options("x.dll"));
        assert_eq!(doc.text, "LIBRARY x.dll\n\nEXPORTS\n    Foo\n    Bar\n");
        assert_eq!(doc.suffix, ".def");
        assert_eq!(doc.symbol_count, 2);
    }

    #[test]
    fn windows_def_default_library_name() {
        let symbols = SymbolSet::from_names(["BNAddTypeMemberTokens", "AZaz09"]).unwrap();
        let doc = generate(&symbols, PlatformTarget::Windows, &StubOptions::default());
        assert_eq!(
            doc.text,
            "LIBRARY binaryninjacore.dll\n\nEXPORTS\n    BNAddTypeMemberTokens\n    AZaz09\n"
        );
    }

    #[test]
    fn linux_asm_exact() {
        let doc = generate(&foo_bar(), PlatformTarget::Linux, &StubOptions::default());
        assert_eq!(
            doc.text,
            ".section .text\n\n\
             .align 4\n.global Foo\nFoo:\n\tret\n\
             .align 4\n.global Bar\nBar:\n\tret\n"
        );
        assert_eq!(doc.suffix, ".S");
    }

    #[test]
    fn macos_asm_prefixes_global_and_label() {
        let doc = generate(&foo_bar(), PlatformTarget::MacOs, &StubOptions::default());
        assert_eq!(
            doc.text,
            ".text\n\n\
             .align 4\n.global _Foo\n_Foo:\n\tret\n\
             .align 4\n.global _Bar\n_Bar:\n\tret\n"
        );
        assert_eq!(doc.suffix, ".S");
    }

    #[test]
    fn asm_preserves_input_order() {
        for target in [PlatformTarget::MacOs, PlatformTarget::Linux] {
            let doc = generate(&foo_bar(), target, &StubOptions::default());
            assert_eq!(doc.text.matches(".global ").count(), 2);
            assert_eq!(doc.text.matches("\tret\n").count(), 2);
            assert_eq!(doc.text.lines().filter(|l| l.ends_with(':')).count(), 2);

            let foo = doc.text.find("Foo:").unwrap();
            let bar = doc.text.find("Bar:").unwrap();
            assert!(foo < bar);
        }
    }

    #[test]
    fn library_name_ignored_for_asm() {
        let a = generate(&foo_bar(), PlatformTarget::Linux, &options("a.so"));
        let b = generate(&foo_bar(), PlatformTarget::Linux, &options("b.so"));
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn generation_is_deterministic() {
        for target in PlatformTarget::ALL {
            let a = generate(&foo_bar(), target, &StubOptions::default());
            let b = generate(&foo_bar(), target, &StubOptions::default());
            assert_eq!(a, b);
            assert_eq!(a.digest(), b.digest());
        }
    }

    #[test]
    fn empty_set_renders_headers_only() {
        let empty = SymbolSet::default();
        assert_eq!(
            generate(&empty, PlatformTarget::Windows, &options("x.dll")).text,
            "LIBRARY x.dll\n\nEXPORTS\n"
        );
        assert_eq!(
            generate(&empty, PlatformTarget::Linux, &StubOptions::default()).text,
            ".section .text\n\n"
        );
    }

    #[test]
    fn digest_is_hex_sha256() {
        let doc = generate(&foo_bar(), PlatformTarget::Linux, &StubOptions::default());
        let digest = doc.digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.bytes().all(|b| b.is_ascii_hexdigit()));

        let other = generate(&foo_bar(), PlatformTarget::MacOs, &StubOptions::default());
        assert_ne!(digest, other.digest());
    }
}
