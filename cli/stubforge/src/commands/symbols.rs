//! `stubforge symbols` — list the exported names a header declares.

use std::path::Path;

use anyhow::{bail, Result};
use stubforge_header::SymbolSet;

use crate::commands::build::load_symbols;
use crate::config::StubforgeConfig;

/// Print the extracted symbols as text (one per line) or JSON.
pub fn run(
    config: &StubforgeConfig,
    header: &Path,
    export_marker: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    // Listing an empty set is a valid answer here.
    let symbols = load_symbols(config, header, export_marker, true)?;
    print!("{}", render(&symbols, format)?);
    Ok(())
}

fn render(symbols: &SymbolSet, format: Option<&str>) -> Result<String> {
    match format.unwrap_or("text") {
        "text" => Ok(symbols
            .iter()
            .map(|s| format!("{s}\n"))
            .collect::<String>()),
        "json" => Ok(format!("{}\n", serde_json::to_string_pretty(symbols)?)),
        other => bail!("unknown format '{other}' (expected text or json)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_text() {
        let set = SymbolSet::from_names(["Foo", "Bar"]).unwrap();
        assert_eq!(render(&set, None).unwrap(), "Foo\nBar\n");
        assert_eq!(render(&SymbolSet::default(), Some("text")).unwrap(), "");
    }

    #[test]
    fn render_json() {
        let set = SymbolSet::from_names(["Foo", "Bar"]).unwrap();
        let out = render(&set, Some("json")).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec!["Foo", "Bar"]);
    }

    #[test]
    fn render_unknown_format() {
        assert!(render(&SymbolSet::default(), Some("yaml")).is_err());
    }

    #[test]
    fn run_on_header() {
        let dir = tempfile::tempdir().unwrap();
        let header = dir.path().join("core.h");
        std::fs::write(&header, "BINARYNINJACOREAPI void BNFoo(void);\n").unwrap();
        run(&StubforgeConfig::default(), &header, None, Some("json")).unwrap();
    }
}
