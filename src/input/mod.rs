//! Directory inputs
//!
//! A [`DirInput`] describes one directory to scan: where it lives, how its
//! paths are remapped, which rules filter it, and which nested inputs it
//! owns. Inputs are set up once (per-directory overrides merged, prefixes
//! resolved top-down) and then flattened into a [`Finders`] plan.
//!
//! ```text
//! assets/                  DirInput { dir: "assets", prefix: "static" }
//! ├── .ffconfig.yaml       overrides for this node (optional)
//! └── images/              DirInput { dir: "assets/images", prefix: "img" }
//!                          -> logical paths under "static/img"
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::finder::Finders;
use crate::matcher::{MatcherList, PatternError, parse_rules};
use crate::utils::path::{clean, join, to_slash};

pub mod overrides;


pub use overrides::InputOverrides;

/// Trim-prefix value meaning "strip this node's own directory"
const TRIM_OWN_DIR: &str = ".";

/// Options threaded through [`DirInput::setup`]
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    /// Base name of per-directory override documents
    /// (`<dir>/<name>.yaml`, `<dir>/<name>.yml`); `None` disables them
    pub config_name: Option<String>,
}

impl SetupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = Some(name.into()).filter(|n: &String| !n.is_empty());
        self
    }
}

/// One directory source and its nested sources
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirInput {
    /// Directory to scan
    pub dir: PathBuf,

    /// Removed from the front of storage paths; `.` means "this node's dir"
    #[serde(rename = "strip_prefix", alias = "trim_prefix")]
    pub trim_prefix: Option<String>,

    /// Prepended to logical paths; fully resolved after setup
    pub prefix: String,

    /// Walk the whole subtree instead of direct children only
    pub recursive: bool,

    pub includes: MatcherList,
    pub excludes: MatcherList,

    /// Nested inputs, walked after this one in declaration order
    pub sources: Vec<DirInput>,
}

impl Default for DirInput {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DirInput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            trim_prefix: None,
            prefix: String::new(),
            recursive: false,
            includes: MatcherList::new(),
            excludes: MatcherList::new(),
            sources: Vec::new(),
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_trim_prefix(mut self, trim_prefix: impl Into<String>) -> Self {
        self.trim_prefix = Some(trim_prefix.into());
        self
    }

    /// Add routed rules (`!` exclude, `+` or bare include, `#` comment)
    pub fn with_rules<I, S>(mut self, rules: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (includes, excludes) = parse_rules(rules)?;
        self.includes.extend(includes);
        self.excludes.extend(excludes);
        Ok(self)
    }

    pub fn with_source(mut self, source: DirInput) -> Self {
        self.sources.push(source);
        self
    }

    /// Merge overrides and resolve prefixes for this node and all sources
    pub fn setup(&mut self, opts: &SetupOptions) -> Result<()> {
        self.setup_tree(opts, "")
    }

    /// Pre-order setup below an already resolved parent prefix
    ///
    /// The first failure aborts the whole pass; a node whose overrides failed
    /// to load must not be used.
    pub fn setup_tree(&mut self, opts: &SetupOptions, inherited_prefix: &str) -> Result<()> {
        if let Some(name) = opts.config_name.as_deref() {
            let candidates = ["yaml", "yml"].map(|ext| self.dir.join(format!("{name}.{ext}")));
            for path in candidates {
                if let Some(overrides) = InputOverrides::load(&path)? {
                    tracing::debug!("Applying directory overrides from {}", path.display());
                    overrides.apply_to(self);
                }
            }
        }

        let dir = to_slash(&self.dir);
        self.trim_prefix = Some(match self.trim_prefix.take() {
            Some(trim) if trim == TRIM_OWN_DIR => {
                if dir == TRIM_OWN_DIR {
                    String::new()
                } else {
                    dir
                }
            }
            Some(trim) => trim,
            None => dir,
        });

        self.prefix = join([inherited_prefix, self.prefix.as_str()]);
        tracing::trace!(
            "Resolved {} (strip_prefix: {:?}, prefix: {:?})",
            self.dir.display(),
            self.trim_prefix,
            self.prefix
        );

        for source in &mut self.sources {
            source.setup_tree(opts, &self.prefix)?;
        }
        Ok(())
    }

    /// Flatten this node and every nested source into a traversal plan
    ///
    /// Pre-order, declaration order. The node tree is left untouched.
    pub fn finder(&self) -> Finders {
        let mut plan = Finders::new();
        self.collect_units(&mut plan);
        plan
    }

    fn collect_units(&self, plan: &mut Finders) {
        plan.push(self.clone_shallow());
        for source in &self.sources {
            source.collect_units(plan);
        }
    }

    /// Copy of this node without its sources
    fn clone_shallow(&self) -> DirInput {
        DirInput {
            dir: self.dir.clone(),
            trim_prefix: self.trim_prefix.clone(),
            prefix: self.prefix.clone(),
            recursive: self.recursive,
            includes: self.includes.clone(),
            excludes: self.excludes.clone(),
            sources: Vec::new(),
        }
    }

    /// Logical path for a storage path
    ///
    /// Strips the trim-prefix (the node's dir when unset), then joins the
    /// prefix onto the rest, or just cleans the rest when there is no prefix.
    pub fn path_of(&self, real_path: &Path) -> String {
        let real = to_slash(real_path);
        let trim = match &self.trim_prefix {
            Some(trim) => trim.clone(),
            None => to_slash(&self.dir),
        };
        let rest = real.strip_prefix(trim.as_str()).unwrap_or(real.as_str());

        if self.prefix.is_empty() {
            clean(rest)
        } else {
            join([self.prefix.as_str(), rest])
        }
    }
}

/// Several independent input trees
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DirInputs(pub Vec<DirInput>);

impl DirInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, input: DirInput) {
        self.0.push(input);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Set up every tree in order; the first failure aborts
    pub fn setup(&mut self, opts: &SetupOptions) -> Result<()> {
        for input in &mut self.0 {
            input.setup(opts)?;
        }
        Ok(())
    }

    /// One flat plan covering every tree, in declaration order
    pub fn finder(&self) -> Finders {
        let mut plan = Finders::new();
        for input in &self.0 {
            plan.append(input.finder());
        }
        plan
    }
}

impl From<Vec<DirInput>> for DirInputs {
    fn from(inputs: Vec<DirInput>) -> Self {
        Self(inputs)
    }
}
