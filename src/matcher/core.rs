use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::file::FileInfo;

/// Characters that turn a plain name into a glob
const GLOB_SPECIALS: &[char] = &['*', '?', '[', ']', '{', '}', '\\'];

/// Errors produced while compiling pattern rules
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,

    #[error("parse regex {pattern:?}: {source}")]
    Regex {
        pattern: String,
        source: regex::Error,
    },

    #[error("parse glob {pattern:?}: {source}")]
    Glob {
        pattern: String,
        source: globset::Error,
    },

    /// A rule inside a list failed to compile
    #[error("rule #{index}: {source}")]
    Rule {
        index: usize,
        source: Box<PatternError>,
    },

    /// A routed include/exclude rule failed to compile
    #[error("parse#{index} as {side} failed: {source}")]
    Routed {
        index: usize,
        side: RuleSide,
        source: Box<PatternError>,
    },
}

/// Which list a routed rule was destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSide {
    Include,
    Exclude,
}

impl fmt::Display for RuleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSide::Include => write!(f, "include"),
            RuleSide::Exclude => write!(f, "exclude"),
        }
    }
}

/// Entry kinds a matcher is allowed to match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Pattern had a trailing `/`
    Dirs,
    Files,
}

/// Compiled matching state for each pattern dialect
#[derive(Debug, Clone)]
pub enum Dialect {
    /// Exact base-name comparison
    Literal(String),
    Glob(GlobMatcher),
    Regex(Regex),
}

impl Dialect {
    fn is_match(&self, path: &str, info: &FileInfo) -> bool {
        match self {
            Dialect::Literal(name) => info.name == *name,
            Dialect::Glob(glob) => glob.is_match(path),
            Dialect::Regex(regex) => regex.is_match(path),
        }
    }
}

/// A single compiled pattern rule
///
/// Rule syntax:
/// - a trailing `/` restricts the rule to directories, otherwise it only
///   matches files
/// - a leading `?` makes the rest a regular expression searched in the path
/// - anything containing one of `* ? [ ] { } \` is a glob over the path
/// - everything else must equal the entry's base name
#[derive(Debug, Clone)]
pub struct Matcher {
    raw: String,
    scope: Scope,
    dialect: Dialect,
}

impl Matcher {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let (body, scope) = match pattern.strip_suffix('/') {
            Some(body) => (body, Scope::Dirs),
            None => (pattern, Scope::Files),
        };
        if body.is_empty() {
            return Err(PatternError::Empty);
        }

        let dialect = if let Some(expr) = body.strip_prefix('?') {
            let regex = Regex::new(expr).map_err(|source| PatternError::Regex {
                pattern: body.to_string(),
                source,
            })?;
            Dialect::Regex(regex)
        } else if is_glob_pattern(body) {
            let glob = GlobBuilder::new(body)
                .literal_separator(false)
                .backslash_escape(true)
                .build()
                .map_err(|source| PatternError::Glob {
                    pattern: body.to_string(),
                    source,
                })?;
            Dialect::Glob(glob.compile_matcher())
        } else {
            Dialect::Literal(body.to_string())
        };

        Ok(Self {
            raw: pattern.to_string(),
            scope,
            dialect,
        })
    }

    /// Test a path and its metadata against this rule
    pub fn is_match(&self, path: &str, info: &FileInfo) -> bool {
        let in_scope = match self.scope {
            Scope::Dirs => info.is_dir,
            Scope::Files => !info.is_dir,
        };
        in_scope && self.dialect.is_match(path, info)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }
}

impl FromStr for Matcher {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Check if a string contains glob pattern characters
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(GLOB_SPECIALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileInfo {
        FileInfo::file(name)
    }

    fn dir(name: &str) -> FileInfo {
        FileInfo::dir(name)
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.rs"));
        assert!(is_glob_pattern("src/**/*.js"));
        assert!(is_glob_pattern("test?.txt"));
        assert!(is_glob_pattern("file[123].txt"));
        assert!(is_glob_pattern("{a,b}.txt"));
        assert!(is_glob_pattern(r"a\.txt"));
        assert!(!is_glob_pattern("simple.txt"));
        assert!(!is_glob_pattern("path/to/file.rs"));
    }

    #[test]
    fn test_literal_matches_base_name_only() {
        let m = Matcher::compile("README.md").unwrap();
        assert!(matches!(m.dialect(), Dialect::Literal(_)));
        assert!(m.is_match("docs/README.md", &file("README.md")));
        assert!(!m.is_match("README.md.bak", &file("README.md.bak")));
        // the path is irrelevant for literals
        assert!(m.is_match("whatever", &file("README.md")));
    }

    #[test]
    fn test_glob_crosses_separators() {
        let m = Matcher::compile("*.go").unwrap();
        assert!(matches!(m.dialect(), Dialect::Glob(_)));
        assert!(m.is_match("main.go", &file("main.go")));
        assert!(m.is_match("vendor/lib.go", &file("lib.go")));
        assert!(!m.is_match("README.md", &file("README.md")));
    }

    #[test]
    fn test_glob_alternates() {
        let m = Matcher::compile("*.{png,jpg}").unwrap();
        assert!(m.is_match("img/a.png", &file("a.png")));
        assert!(m.is_match("b.jpg", &file("b.jpg")));
        assert!(!m.is_match("c.gif", &file("c.gif")));
    }

    #[test]
    fn test_regex_rule() {
        let m = Matcher::compile(r"?^test_.*\.py$").unwrap();
        assert!(matches!(m.dialect(), Dialect::Regex(_)));
        assert!(m.is_match("test_utils.py", &file("test_utils.py")));
        assert!(!m.is_match("utils_test.py", &file("utils_test.py")));
    }

    #[test]
    fn test_directory_scope_applies_to_every_dialect() {
        for pattern in ["vendor/", "vend*/", "?vendor/"] {
            let m = Matcher::compile(pattern).unwrap();
            assert_eq!(m.scope(), Scope::Dirs, "{pattern}");
            assert!(m.is_match("vendor", &dir("vendor")), "{pattern}");
            assert!(!m.is_match("vendor", &file("vendor")), "{pattern}");
        }
    }

    #[test]
    fn test_files_only_without_trailing_slash() {
        for pattern in ["vendor", "vend*", "?vendor"] {
            let m = Matcher::compile(pattern).unwrap();
            assert_eq!(m.scope(), Scope::Files, "{pattern}");
            assert!(m.is_match("vendor", &file("vendor")), "{pattern}");
            assert!(!m.is_match("vendor", &dir("vendor")), "{pattern}");
        }
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(Matcher::compile(""), Err(PatternError::Empty)));
        assert!(matches!(Matcher::compile("/"), Err(PatternError::Empty)));

        let err = Matcher::compile("?(unclosed").unwrap_err();
        assert!(matches!(err, PatternError::Regex { .. }));
        assert!(err.to_string().contains("?(unclosed"));

        let err = Matcher::compile("[unclosed").unwrap_err();
        assert!(matches!(err, PatternError::Glob { .. }));
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_display_keeps_raw_text() {
        let m: Matcher = "vendor/".parse().unwrap();
        assert_eq!(m.to_string(), "vendor/");
        assert_eq!(m.as_str(), "vendor/");
    }
}
