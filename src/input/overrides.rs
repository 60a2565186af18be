//! Per-directory override documents
//!
//! A directory may carry `<name>.yaml` / `<name>.yml` next to the files it
//! holds. Keys present in the document replace the matching [`DirInput`]
//! fields; absent keys leave them alone.
//!
//! ```yaml
//! recursive: true
//! strip_prefix: "."
//! prefix: static
//! excludes:
//!   - "*.tmp"
//!   - "node_modules/"
//! sources:
//!   - dir: vendor/assets
//!     prefix: vendor
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::DirInput;
use crate::matcher::MatcherList;

/// Field-level overrides for a [`DirInput`]
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputOverrides {
    pub dir: Option<PathBuf>,

    #[serde(rename = "strip_prefix", alias = "trim_prefix")]
    pub trim_prefix: Option<String>,

    pub prefix: Option<String>,
    pub recursive: Option<bool>,
    pub includes: Option<MatcherList>,
    pub excludes: Option<MatcherList>,
    pub sources: Option<Vec<DirInput>>,
}

impl InputOverrides {
    /// Load an override document; a missing file yields `None`
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read `{}`", path.display()));
            }
        };

        let overrides = Self::from_yaml(&content)
            .with_context(|| format!("decode `{}` failed", path.display()))?;
        Ok(Some(overrides))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(content)?)
    }

    /// Overwrite every field present in the document
    pub fn apply_to(self, input: &mut DirInput) {
        if let Some(dir) = self.dir {
            input.dir = dir;
        }
        if let Some(trim_prefix) = self.trim_prefix {
            input.trim_prefix = Some(trim_prefix);
        }
        if let Some(prefix) = self.prefix {
            input.prefix = prefix;
        }
        if let Some(recursive) = self.recursive {
            input.recursive = recursive;
        }
        if let Some(includes) = self.includes {
            input.includes = includes;
        }
        if let Some(excludes) = self.excludes {
            input.excludes = excludes;
        }
        if let Some(sources) = self.sources {
            input.sources = sources;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dir.is_none()
            && self.trim_prefix.is_none()
            && self.prefix.is_none()
            && self.recursive.is_none()
            && self.includes.is_none()
            && self.excludes.is_none()
            && self.sources.is_none()
    }
}
