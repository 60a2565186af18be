//! File handles delivered to finder callbacks

use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat};
use std::fmt;
use std::fs::Metadata;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::utils::{format_file_size, mode_string};

/// Metadata observed for a directory entry during traversal
///
/// Matchers only look at `name` and `is_dir`; the rest is carried through to
/// the [`FoundFile`] handed to the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub mode: u32,
    pub modified: Option<SystemTime>,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl FileInfo {
    /// Synthetic entry with no size, mode or timestamp
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mode: if is_dir { 0o755 } else { 0o644 },
            modified: None,
            is_dir,
            is_symlink: false,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Build from `lstat`-style metadata
    pub fn from_metadata(name: impl Into<String>, meta: &Metadata) -> Self {
        let file_type = meta.file_type();
        Self {
            name: name.into(),
            size: meta.len(),
            mode: permission_bits(meta),
            modified: meta.modified().ok(),
            is_dir: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
        }
    }

    pub fn mode_string(&self) -> String {
        mode_string(self.mode, self.is_dir, self.is_symlink)
    }
}

#[cfg(unix)]
fn permission_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() { 0o444 } else { 0o666 }
}

/// Opens the content behind a storage path
pub type ReaderFactory =
    Arc<dyn Fn(&Path) -> std::io::Result<Box<dyn Read + Send>> + Send + Sync>;

fn open_real_file(path: &Path) -> std::io::Result<Box<dyn Read + Send>> {
    Ok(Box::new(std::fs::File::open(path)?))
}

/// One discovered file
///
/// `path` is the logical path after prefix stripping and injection,
/// `real_path` is where the content lives. Nothing is opened until
/// [`FoundFile::reader`] is called; the caller owns and drops the reader.
#[derive(Clone)]
pub struct FoundFile {
    pub path: String,
    pub real_path: PathBuf,
    pub info: FileInfo,
    opener: ReaderFactory,
}

impl FoundFile {
    pub fn new(path: impl Into<String>, real_path: impl Into<PathBuf>, info: FileInfo) -> Self {
        Self {
            path: path.into(),
            real_path: real_path.into(),
            info,
            opener: Arc::new(open_real_file),
        }
    }

    /// Replace the content-reader factory
    pub fn with_reader<F>(mut self, opener: F) -> Self
    where
        F: Fn(&Path) -> std::io::Result<Box<dyn Read + Send>> + Send + Sync + 'static,
    {
        self.opener = Arc::new(opener);
        self
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Open the file content
    pub fn reader(&self) -> Result<Box<dyn Read + Send>> {
        (self.opener)(&self.real_path)
            .with_context(|| format!("Failed to open {}", self.real_path.display()))
    }
}

impl fmt::Debug for FoundFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoundFile")
            .field("path", &self.path)
            .field("real_path", &self.real_path)
            .field("info", &self.info)
            .finish()
    }
}

impl fmt::Display for FoundFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mtime = self
            .info
            .modified
            .map(|t| DateTime::<Local>::from(t).to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} <{} {} {}>",
            self.info.name,
            format_file_size(self.info.size),
            self.info.mode_string(),
            mtime
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_reader_is_lazy() {
        let found = FoundFile::new("/missing.txt", "/definitely/not/here.txt", FileInfo::file("here.txt"));
        // constructing the handle never touches the filesystem
        assert_eq!(found.name(), "here.txt");
        assert!(found.reader().is_err());
    }

    #[test]
    fn test_reader_reads_real_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let real = temp_dir.path().join("a.txt");
        std::fs::write(&real, "hello")?;

        let meta = std::fs::symlink_metadata(&real)?;
        let found = FoundFile::new("a.txt", &real, FileInfo::from_metadata("a.txt", &meta));
        assert_eq!(found.info.size, 5);
        assert!(!found.info.is_dir);

        let mut content = String::new();
        found.reader()?.read_to_string(&mut content)?;
        assert_eq!(content, "hello");
        Ok(())
    }

    #[test]
    fn test_custom_reader() -> Result<()> {
        let found = FoundFile::new("x", "ignored", FileInfo::file("x")).with_reader(|_| {
            let reader: Box<dyn Read + Send> = Box::new(Cursor::new(b"from memory".to_vec()));
            Ok(reader)
        });
        let mut content = String::new();
        found.reader()?.read_to_string(&mut content)?;
        assert_eq!(content, "from memory");
        Ok(())
    }

    #[test]
    fn test_display() {
        let mut info = FileInfo::file("README.md");
        info.size = 1500;
        let found = FoundFile::new("README.md", "README.md", info);
        assert_eq!(found.to_string(), "README.md <1.5 kB -rw-r--r-- ->");
    }
}
