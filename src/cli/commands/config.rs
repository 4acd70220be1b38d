//! Config file commands.

use std::path::Path;

use anyhow::Context;

use crate::config::{self, Config};

/// Print the config file location
pub fn cmd_config_path(path: Option<&Path>) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config::config_path().context("Could not determine config directory")?,
    };
    println!("{}", path.display());
    Ok(())
}

/// Print the effective configuration as TOML
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let mut shown = config.clone();
    if shown.catalogs.google_books_api_key.is_some() {
        shown.catalogs.google_books_api_key = Some("<redacted>".to_string());
    }
    print!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

/// Write a default config file
pub fn cmd_config_init(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => config::config_path().context("Could not determine config directory")?,
    };

    if target.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            target.display()
        );
    }

    let written = match path {
        Some(path) => {
            config::save_to(&Config::default(), path)?;
            path.to_path_buf()
        }
        None => config::save(&Config::default())?,
    };
    println!("✓ Wrote default config to {}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_defaults_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        cmd_config_init(Some(&path), false).unwrap();
        assert_eq!(config::load_from(&path), Config::default());

        assert!(cmd_config_init(Some(&path), false).is_err());
        assert!(cmd_config_init(Some(&path), true).is_ok());
    }
}
