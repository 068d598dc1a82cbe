use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::{AppConfig, get_config_path};

/// Write a default configuration file
pub fn init(output: Option<PathBuf>, force: bool) -> Result<()> {
    let output_path = match output {
        Some(path) => path,
        None => get_config_path()?,
    };

    if output_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse --force to overwrite",
            output_path.display()
        );
    }

    AppConfig::default()
        .save(&output_path)
        .with_context(|| format!("Failed to create config: {}", output_path.display()))?;

    println!("✓ Created configuration file: {}", output_path.display());
    println!("\nSet enhancer.api_key (or GEMINI_API_KEY) to enable smart search and summaries.");

    Ok(())
}

/// Print the effective configuration with secrets masked
pub fn show(config: &AppConfig) -> Result<()> {
    let mut shown = config.clone();
    if shown.enhancer.api_key.is_some() {
        shown.enhancer.api_key = Some("********".to_string());
    }

    let toml = toml::to_string_pretty(&shown).context("Failed to serialize config")?;
    println!("{}", toml);

    if config.enhancer.resolve_api_key().is_none() {
        println!("# no API key found: smart search and summaries use offline fallbacks");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init(Some(path.clone()), false).unwrap();
        assert!(init(Some(path.clone()), false).is_err());
        assert!(init(Some(path.clone()), true).is_ok());

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.gate.daily_free_limit_seconds, 1800);
    }
}
