//! Configuration for the `ffind` front end
//!
//! Layered with figment, lowest priority first:
//! 1. built-in defaults
//! 2. `ffind.yaml` / `ffind.yml` in the working directory, or the file given
//!    with `--config`
//! 3. `FFIND_`-prefixed environment variables (`FFIND_CONFIG_NAME=...`)
//!
//! ```yaml
//! config_name: .ffconfig
//! inputs:
//!   - dir: assets
//!     prefix: static
//!     recursive: true
//!     excludes: ["*.psd", "drafts/"]
//! ```

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;
use std::path::Path;

use crate::input::{DirInputs, SetupOptions};

const DEFAULT_CONFIG: &str = "config_name: .ffconfig\ninputs: []\n";

/// Resolved front-end configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Base name of per-directory override documents; empty disables them
    pub config_name: Option<String>,

    /// Root inputs declared in the configuration file
    pub inputs: DirInputs,
}

impl FinderConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Yaml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !Path::new(custom_path).is_file() {
                anyhow::bail!("Config file not found: {}", custom_path);
            }
            figment = figment.merge(Yaml::file(custom_path));
        } else {
            figment = figment
                .merge(Yaml::file("ffind.yaml"))
                .merge(Yaml::file("ffind.yml"));
        }

        figment = figment.merge(Env::prefixed("FFIND_"));

        let config: FinderConfig = figment
            .extract()
            .context("Failed to load ffind configuration")?;
        tracing::debug!(
            "Loaded configuration (config_name: {:?}, inputs: {})",
            config.config_name,
            config.inputs.len()
        );
        Ok(config)
    }

    /// Setup options implied by this configuration
    pub fn setup_options(&self) -> SetupOptions {
        match self.config_name.as_deref() {
            Some(name) => SetupOptions::new().with_config_name(name),
            None => SetupOptions::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn load(custom: Option<&str>) -> figment::error::Result<FinderConfig> {
        FinderConfig::load_with_custom_config(custom).map_err(|e| format!("{e:#}").into())
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = load(None)?;
            assert_eq!(config.config_name.as_deref(), Some(".ffconfig"));
            assert!(config.inputs.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_repo_config_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ffind.yaml",
                "inputs:\n  - dir: assets\n    prefix: static\n    recursive: true\n    excludes: ['*.psd']\n",
            )?;
            jail.set_env("FFIND_CONFIG_NAME", ".finder");

            let config = load(None)?;
            assert_eq!(config.config_name.as_deref(), Some(".finder"));
            assert_eq!(config.inputs.len(), 1);
            let input = &config.inputs.0[0];
            assert_eq!(input.prefix, "static");
            assert!(input.recursive);
            assert_eq!(input.excludes.patterns(), vec!["*.psd"]);

            let opts = config.setup_options();
            assert_eq!(opts.config_name.as_deref(), Some(".finder"));
            Ok(())
        });
    }

    #[test]
    fn test_custom_config() {
        Jail::expect_with(|jail| {
            jail.create_file("ffind.yaml", "config_name: ignored\n")?;
            jail.create_file("custom.yml", "config_name: ''\n")?;

            let config = load(Some("custom.yml"))?;
            assert!(config.setup_options().config_name.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_missing_custom_config() {
        Jail::expect_with(|_jail| {
            let err = FinderConfig::load_with_custom_config(Some("nope.yaml")).unwrap_err();
            assert!(err.to_string().contains("nope.yaml"));
            Ok(())
        });
    }

    #[test]
    fn test_bad_rule_in_config() {
        Jail::expect_with(|jail| {
            jail.create_file("ffind.yaml", "inputs:\n  - dir: .\n    includes: ['[broken']\n")?;
            assert!(FinderConfig::load().is_err());
            Ok(())
        });
    }
}
