//! Command-line interface for ffind
//!
//! Builds a set of [`DirInput`] trees from the configuration file and the
//! command line, sets them up and prints one logical path per found file.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::FinderConfig;
use crate::finder::Finder;
use crate::input::{DirInput, DirInputs, SetupOptions};

/// ffind - list files from directory trees, filtered and path-remapped
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan (defaults to the current directory when no
    /// inputs come from the configuration file)
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Filter rule: `!PATTERN` excludes, `PATTERN` or `+PATTERN` includes,
    /// `?REGEX` is a regular expression, a trailing `/` limits it to directories
    #[arg(short, long = "rule", value_name = "RULE", allow_hyphen_values = true)]
    pub rules: Vec<String>,

    /// Walk the whole tree instead of direct children only
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Prefix prepended to every logical path
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Prefix removed from storage paths (`.` strips the scanned directory)
    #[arg(long, value_name = "PREFIX")]
    pub strip_prefix: Option<String>,

    /// Base name of per-directory override files
    #[arg(long, value_name = "NAME")]
    pub config_name: Option<String>,

    /// Ignore per-directory override files
    #[arg(long)]
    pub no_dir_config: bool,

    /// Print size, mode and modification time next to each path
    #[arg(short, long)]
    pub long: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let config = FinderConfig::load_with_custom_config(self.config.as_deref())?;
        let mut inputs = self.inputs(&config)?;
        inputs.setup(&self.setup_options(&config))?;

        let plan = inputs.finder();
        tracing::debug!("Walking {} directories", plan.len());

        let stdout = io::stdout();
        let mut out = stdout.lock();
        let mut count = 0usize;
        plan.find(&mut |file| {
            count += 1;
            if self.long {
                writeln!(out, "{}\t{}", file.path, file)?;
            } else {
                writeln!(out, "{}", file.path)?;
            }
            Ok(())
        })?;
        out.flush()?;

        tracing::info!("Found {} files", count);
        Ok(())
    }

    /// Configured inputs followed by one input per command-line directory
    fn inputs(&self, config: &FinderConfig) -> Result<DirInputs> {
        let mut inputs = config.inputs.clone();
        for dir in &self.dirs {
            inputs.push(self.input_for(dir)?);
        }
        if inputs.is_empty() {
            inputs.push(self.input_for(Path::new("."))?);
        }
        Ok(inputs)
    }

    fn input_for(&self, dir: &Path) -> Result<DirInput> {
        let mut input = DirInput::new(dir).recursive(self.recursive);
        if let Some(prefix) = &self.prefix {
            input = input.with_prefix(prefix.as_str());
        }
        if let Some(strip_prefix) = &self.strip_prefix {
            input = input.with_trim_prefix(strip_prefix.as_str());
        }
        Ok(input.with_rules(&self.rules)?)
    }

    fn setup_options(&self, config: &FinderConfig) -> SetupOptions {
        if self.no_dir_config {
            return SetupOptions::new();
        }
        match &self.config_name {
            Some(name) => SetupOptions::new().with_config_name(name.as_str()),
            None => config.setup_options(),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules_and_dirs() {
        let cli = Cli::try_parse_from([
            "ffind", "src", "docs", "-r", "*.rs", "-r", "!target/", "-R", "--prefix", "pkg",
        ])
        .unwrap();
        assert_eq!(cli.dirs, vec![PathBuf::from("src"), PathBuf::from("docs")]);
        assert_eq!(cli.rules, vec!["*.rs", "!target/"]);
        assert!(cli.recursive);
        assert_eq!(cli.prefix.as_deref(), Some("pkg"));
    }

    #[test]
    fn test_verbosity_count() {
        let cli = Cli::try_parse_from(["ffind", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_inputs_default_to_current_dir() {
        let cli = Cli::try_parse_from(["ffind", "-r", "*.md"]).unwrap();
        let inputs = cli.inputs(&FinderConfig::default()).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs.0[0].dir, PathBuf::from("."));
        assert_eq!(inputs.0[0].includes.patterns(), vec!["*.md"]);
    }

    #[test]
    fn test_bad_rule_is_an_error() {
        let cli = Cli::try_parse_from(["ffind", "-r", "?(oops"]).unwrap();
        let err = cli.inputs(&FinderConfig::default()).unwrap_err();
        assert!(err.to_string().contains("parse#0 as include failed"));
    }

    #[test]
    fn test_setup_options_precedence() {
        let config = FinderConfig {
            config_name: Some(".ffconfig".to_string()),
            ..Default::default()
        };

        let cli = Cli::try_parse_from(["ffind"]).unwrap();
        assert_eq!(cli.setup_options(&config).config_name.as_deref(), Some(".ffconfig"));

        let cli = Cli::try_parse_from(["ffind", "--config-name", ".local"]).unwrap();
        assert_eq!(cli.setup_options(&config).config_name.as_deref(), Some(".local"));

        let cli = Cli::try_parse_from(["ffind", "--no-dir-config"]).unwrap();
        assert!(cli.setup_options(&config).config_name.is_none());
    }
}
