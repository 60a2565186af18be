//! Directory traversal for a single input node

use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

use super::{FindCallback, Finder};
use crate::file::{FileInfo, FoundFile};
use crate::input::DirInput;
use crate::matcher::MatcherList;
use crate::utils::path::to_slash;

/// Admission decision for one entry
///
/// An include match always wins. Otherwise directories are admitted unless
/// excluded. Files are admitted unless excluded, except that once the
/// includes hold a file rule a file has to match one of them.
pub fn admit(includes: &MatcherList, excludes: &MatcherList, subject: &str, info: &FileInfo) -> bool {
    if includes.is_match(subject, info) {
        return true;
    }
    if !info.is_dir && includes.has_file_rules() {
        return false;
    }
    !excludes.is_match(subject, info)
}

impl DirInput {
    fn admits(&self, subject: &str, info: &FileInfo) -> bool {
        let admitted = admit(&self.includes, &self.excludes, subject, info);
        tracing::trace!(subject, dir = info.is_dir, admitted, "admission");
        admitted
    }

    /// Walk the whole subtree, pruning directories that are not admitted
    ///
    /// Entries are visited in file-name order. Match subjects are paths
    /// relative to `dir`, e.g. `vendor/lib.go`.
    fn find_recursive(&self, cb: &mut FindCallback<'_>) -> Result<usize> {
        let mut found = 0;
        let mut walker = WalkDir::new(&self.dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.with_context(|| format!("Failed to walk {}", self.dir.display()))?;
            if entry.depth() == 0 {
                continue;
            }

            let meta = entry
                .metadata()
                .with_context(|| format!("Failed to read metadata for {}", entry.path().display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let info = FileInfo::from_metadata(name, &meta);
            let subject = relative_subject(&self.dir, entry.path(), &info);

            if self.admits(&subject, &info) {
                if !info.is_dir {
                    found += 1;
                    cb(FoundFile::new(self.path_of(entry.path()), entry.path(), info))?;
                }
            } else if info.is_dir {
                tracing::debug!("Pruning {}", entry.path().display());
                walker.skip_current_dir();
            }
        }

        Ok(found)
    }

    /// Look at direct children only; directories are skipped untested
    fn find_flat(&self, cb: &mut FindCallback<'_>) -> Result<usize> {
        let mut found = 0;
        let entries = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to list {}", self.dir.display()))?;
            let meta = entry
                .metadata()
                .with_context(|| format!("Failed to read metadata for {}", entry.path().display()))?;
            if meta.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let info = FileInfo::from_metadata(name.clone(), &meta);
            if self.admits(&name, &info) {
                found += 1;
                let real_path = self.dir.join(&name);
                cb(FoundFile::new(self.path_of(&real_path), real_path, info))?;
            }
        }

        Ok(found)
    }
}

fn relative_subject(root: &Path, path: &Path, info: &FileInfo) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => to_slash(rel),
        _ => info.name.clone(),
    }
}

impl Finder for DirInput {
    /// Walk this node only; children are separate units of [`DirInput::finder`]
    fn find(&self, cb: &mut FindCallback<'_>) -> Result<()> {
        tracing::debug!(
            "Finding in {} (recursive: {}, prefix: {:?})",
            self.dir.display(),
            self.recursive,
            self.prefix
        );
        let meta = std::fs::metadata(&self.dir)
            .with_context(|| format!("Failed to read {}", self.dir.display()))?;
        if !meta.is_dir() {
            anyhow::bail!("{} is not a directory", self.dir.display());
        }

        let found = if self.recursive {
            self.find_recursive(cb)?
        } else {
            self.find_flat(cb)?
        };
        tracing::debug!("Found {} files in {}", found, self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::parse_rules;

    fn lists(rules: &[&str]) -> (MatcherList, MatcherList) {
        parse_rules(rules).unwrap()
    }

    #[test]
    fn test_exclude_only() {
        let (inc, exc) = lists(&["!*.log"]);
        assert!(!admit(&inc, &exc, "debug.log", &FileInfo::file("debug.log")));
        assert!(admit(&inc, &exc, "main.rs", &FileInfo::file("main.rs")));
    }

    #[test]
    fn test_include_beats_exclude() {
        let (inc, exc) = lists(&["keep.log", "!*.log"]);
        assert!(admit(&inc, &exc, "keep.log", &FileInfo::file("keep.log")));
        assert!(!admit(&inc, &exc, "drop.log", &FileInfo::file("drop.log")));
    }

    #[test]
    fn test_includes_form_an_allow_list_for_files() {
        let (inc, exc) = lists(&["*.go", "!vendor/"]);
        assert!(admit(&inc, &exc, "main.go", &FileInfo::file("main.go")));
        assert!(!admit(&inc, &exc, "README.md", &FileInfo::file("README.md")));
        // directories still fall back to the excludes
        assert!(admit(&inc, &exc, "cmd", &FileInfo::dir("cmd")));
        assert!(!admit(&inc, &exc, "vendor", &FileInfo::dir("vendor")));
    }

    #[test]
    fn test_directory_includes_do_not_restrict_files() {
        let (inc, exc) = lists(&["docs/", "!*.tmp"]);
        assert!(admit(&inc, &exc, "docs/a.md", &FileInfo::file("a.md")));
        assert!(admit(&inc, &exc, "README.md", &FileInfo::file("README.md")));
        assert!(!admit(&inc, &exc, "docs/x.tmp", &FileInfo::file("x.tmp")));

        let (inc, exc) = lists(&["?^docs/"]);
        assert!(admit(&inc, &exc, "docs/a.md", &FileInfo::file("a.md")));
    }

    #[test]
    fn test_no_rules_admits_everything() {
        let (inc, exc) = lists(&[]);
        assert!(admit(&inc, &exc, "a", &FileInfo::file("a")));
        assert!(admit(&inc, &exc, "d", &FileInfo::dir("d")));
    }
}
