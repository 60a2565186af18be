use serde::{Deserialize, Deserializer};
use std::fmt;

use super::core::{Matcher, PatternError, RuleSide, Scope};
use crate::file::FileInfo;

/// Ordered set of rules combined with OR
///
/// An empty list matches nothing. Include lists rely on that: with no
/// includes, admission is decided by the excludes alone.
#[derive(Debug, Clone, Default)]
pub struct MatcherList {
    matchers: Vec<Matcher>,
}

impl MatcherList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a list of rules into a fresh matcher list
    pub fn from_rules<I, S>(rules: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        list.parse(rules)?;
        Ok(list)
    }

    /// Compile and append rules, skipping `#` comments
    ///
    /// Stops at the first rule that fails to compile; rules before it stay
    /// appended.
    pub fn parse<I, S>(&mut self, rules: I) -> Result<(), PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (index, rule) in rules.into_iter().enumerate() {
            self.push_rule(rule.as_ref())
                .map_err(|source| PatternError::Rule {
                    index,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    /// Compile one rule; returns `false` when the rule was a comment
    fn push_rule(&mut self, rule: &str) -> Result<bool, PatternError> {
        if rule.starts_with('#') {
            return Ok(false);
        }
        self.matchers.push(Matcher::compile(rule)?);
        Ok(true)
    }

    pub fn push(&mut self, matcher: Matcher) {
        self.matchers.push(matcher);
    }

    /// True if any rule matches
    pub fn is_match(&self, path: &str, info: &FileInfo) -> bool {
        self.matchers.iter().any(|m| m.is_match(path, info))
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// True if any rule can match a non-directory
    pub fn has_file_rules(&self) -> bool {
        self.matchers.iter().any(|m| m.scope() == Scope::Files)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Matcher> {
        self.matchers.iter()
    }

    /// Raw rule text in insertion order
    pub fn patterns(&self) -> Vec<&str> {
        self.matchers.iter().map(Matcher::as_str).collect()
    }
}

impl fmt::Display for MatcherList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.patterns().join(", "))
    }
}

impl Extend<Matcher> for MatcherList {
    fn extend<T: IntoIterator<Item = Matcher>>(&mut self, iter: T) {
        self.matchers.extend(iter);
    }
}

impl IntoIterator for MatcherList {
    type Item = Matcher;
    type IntoIter = std::vec::IntoIter<Matcher>;

    fn into_iter(self) -> Self::IntoIter {
        self.matchers.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatcherList {
    type Item = &'a Matcher;
    type IntoIter = std::slice::Iter<'a, Matcher>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'de> Deserialize<'de> for MatcherList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rules = Vec::<String>::deserialize(deserializer)?;
        MatcherList::from_rules(&rules).map_err(serde::de::Error::custom)
    }
}

/// Split routed rules into include and exclude lists
///
/// - `#...` is a comment and is skipped
/// - `!...` goes to the excludes with the `!` removed
/// - `+...` goes to the includes with the `+` removed
/// - anything else goes to the includes unchanged
pub fn parse_rules<I, S>(rules: I) -> Result<(MatcherList, MatcherList), PatternError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut includes = MatcherList::new();
    let mut excludes = MatcherList::new();

    for (index, rule) in rules.into_iter().enumerate() {
        let rule = rule.as_ref();
        if rule.starts_with('#') {
            continue;
        }

        let (side, list, body) = if let Some(body) = rule.strip_prefix('!') {
            (RuleSide::Exclude, &mut excludes, body)
        } else {
            let body = rule.strip_prefix('+').unwrap_or(rule);
            (RuleSide::Include, &mut includes, body)
        };

        let matcher = Matcher::compile(body).map_err(|source| PatternError::Routed {
            index,
            side,
            source: Box::new(source),
        })?;
        list.push(matcher);
    }

    Ok((includes, excludes))
}
