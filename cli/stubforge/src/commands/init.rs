//! `stubforge init` — write a starter `stubforge.toml`.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::{StubforgeConfig, CONFIG_FILE};

/// Create `stubforge.toml` in `dir`, refusing to overwrite an existing one.
pub fn run(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    std::fs::write(&path, StubforgeConfig::template())
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();
        let config = StubforgeConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert!(config.library.name.is_some());
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "# mine\n").unwrap();
        assert!(run(dir.path()).is_err());
        assert_eq!(
            std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(),
            "# mine\n"
        );
    }
}
