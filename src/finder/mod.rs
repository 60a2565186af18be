//! Traversal plans
//!
//! A [`Finder`] streams [`FoundFile`]s into a callback. Each
//! [`DirInput`](crate::input::DirInput) is one traversal unit; [`Finders`]
//! runs a sequence of units in order and stops at the first error, whether
//! it comes from the filesystem or from the callback.

use anyhow::Result;
use std::fmt;

use crate::file::FoundFile;

pub mod walk;

pub use walk::admit;

/// Callback invoked once per admitted file
///
/// Returning `Err` aborts the traversal; the error reaches the caller of
/// [`Finder::find`] unchanged.
pub type FindCallback<'a> = dyn FnMut(FoundFile) -> Result<()> + 'a;

/// Something that can stream matching files to a callback
pub trait Finder: fmt::Debug + Send + Sync {
    fn find(&self, cb: &mut FindCallback<'_>) -> Result<()>;
}

/// Ordered, fail-fast sequence of finders
#[derive(Debug, Default)]
pub struct Finders {
    units: Vec<Box<dyn Finder>>,
}

impl Finders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F: Finder + 'static>(&mut self, finder: F) {
        self.units.push(Box::new(finder));
    }

    /// Append every unit of another plan, keeping the sequence flat
    pub fn append(&mut self, mut other: Finders) {
        self.units.append(&mut other.units);
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Finder> {
        self.units.iter().map(|unit| unit.as_ref())
    }

    /// Run the plan and gather every found file
    pub fn collect_files(&self) -> Result<Vec<FoundFile>> {
        let mut files = Vec::new();
        self.find(&mut |file| {
            files.push(file);
            Ok(())
        })?;
        Ok(files)
    }
}

impl Finder for Finders {
    fn find(&self, cb: &mut FindCallback<'_>) -> Result<()> {
        for unit in &self.units {
            unit.find(cb)?;
        }
        Ok(())
    }
}
