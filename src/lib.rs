//! # file-finder - filtered, path-remapped file streams
//!
//! Walks trees of directory inputs and hands every admitted file to a
//! callback, together with the logical path it should appear under.
//!
//! ## Features
//!
//! - **Rules**: literal names, globs and `?`-prefixed regexes, with a
//!   trailing `/` limiting a rule to directories
//! - **Routing**: `!` rules exclude, plain rules include
//! - **Remapping**: per-directory strip and add prefixes
//! - **Overrides**: `<name>.yaml` files inside a directory adjust its input
//!
//! ## Quick Start
//!
//! ```no_run
//! use file_finder::{DirInput, Finder, SetupOptions};
//!
//! # fn main() -> file_finder::Result<()> {
//! let mut input = DirInput::new("assets")
//!     .recursive(true)
//!     .with_prefix("static")
//!     .with_rules(["*.css", "!drafts/"])?;
//! input.setup(&SetupOptions::new().with_config_name(".ffconfig"))?;
//!
//! input.finder().find(&mut |file| {
//!     println!("{}", file.path);
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod file;
pub mod finder;
pub mod input;
pub mod matcher;
pub mod utils;

pub use cli::Cli;
pub use config::FinderConfig;
pub use file::{FileInfo, FoundFile};
pub use finder::{FindCallback, Finder, Finders};
pub use input::{DirInput, DirInputs, SetupOptions};
pub use matcher::{Matcher, MatcherList, PatternError, parse_rules};

/// Result type alias for file-finder operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
