//! Key/index paths locating a value inside a document.
//!
//! Errors carry a [`KeyPath`] so that a failure deep inside a nested document
//! can be traced back to the dictionary keys and list indices leading to it.

use bytes::Bytes;
use std::fmt;

/// One step from a container to one of its children
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A dictionary entry, identified by its raw key bytes
    Key(Bytes),
    /// A list element, identified by its zero-based position
    Index(usize),
}

impl PathSegment {
    /// Creates a key segment by copying the key bytes
    pub fn key(key: &[u8]) -> Self {
        Self::Key(Bytes::copy_from_slice(key))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, ".{}", String::from_utf8_lossy(key)),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Path from the document root to a value.
///
/// Displayed as `$` followed by its segments, e.g. `$.info.files[2].length`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// The empty path, denoting the document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path extended by one segment
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// Returns true for the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true when there are no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments, outermost first
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub(crate) fn push_front(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }

    pub(crate) fn prepend(&mut self, prefix: &KeyPath) {
        if prefix.is_root() {
            return;
        }
        let mut segments = Vec::with_capacity(prefix.len() + self.len());
        segments.extend_from_slice(&prefix.segments);
        segments.append(&mut self.segments);
        self.segments = segments;
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for KeyPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}
