//! Pattern rules
//!
//! A rule is compiled into a [`Matcher`], a predicate over a path and the
//! entry's [`FileInfo`](crate::file::FileInfo). Rules are grouped into
//! [`MatcherList`]s with OR semantics; [`parse_rules`] routes `!`-prefixed
//! rules to an exclude list and the rest to an include list.

pub mod core;
pub mod list;

pub use core::{Dialect, Matcher, PatternError, RuleSide, Scope, is_glob_pattern};
pub use list::{MatcherList, parse_rules};
