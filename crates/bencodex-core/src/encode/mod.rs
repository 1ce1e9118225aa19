//! Canonical encoding through builders.
//!
//! An [`Encoder`] owns exactly one root value. The value is described by
//! requesting one builder of the matching shape and writing into it:
//!
//! - [`ScalarBuilder`]: one integer, byte string or nested document
//! - [`SequenceBuilder`]: children appended in call order
//! - [`MapBuilder`]: children keyed by raw bytes, in any order
//!
//! Nothing is serialized until [`Encoder::finish`]. At that point map entries
//! are sorted by key, so the output is canonical no matter the order in which
//! a caller supplied them.
//!
//! ```
//! use bencodex_core::Encoder;
//!
//! let mut encoder = Encoder::new();
//! let map = encoder.map()?;
//! map.insert("value", &0i64)?;
//! map.insert("name", "spam")?;
//!
//! assert_eq!(encoder.finish()?, b"d4:name4:spam5:valuei0ee");
//! # Ok::<(), bencodex_core::Error>(())
//! ```

mod map;
mod scalar;
mod sequence;

use crate::convert::ToBencode;
use crate::error::{Error, ErrorKind, Result};
use crate::path::{KeyPath, PathSegment};
use crate::policy::DEFAULT_MAX_DEPTH;
use tracing::debug;

pub use map::MapBuilder;
pub use scalar::ScalarBuilder;
pub use sequence::SequenceBuilder;

/// Where a builder sits: nesting level, depth limit and path from the root
#[derive(Debug, Clone)]
pub(crate) struct Context {
    depth: usize,
    max_depth: usize,
    path: KeyPath,
}

impl Context {
    fn root(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            path: KeyPath::root(),
        }
    }

    pub(crate) fn child(&self, segment: PathSegment) -> Self {
        Self {
            depth: self.depth + 1,
            max_depth: self.max_depth,
            path: self.path.child(segment),
        }
    }

    pub(crate) fn error(&self, kind: ErrorKind) -> Error {
        Error::encode(kind).under(&self.path)
    }

    fn enter(&self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(self.error(ErrorKind::NestingTooDeep(self.max_depth)));
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Builder {
    Scalar(ScalarBuilder),
    Sequence(SequenceBuilder),
    Map(MapBuilder),
}

impl Builder {
    fn finalize(self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Builder::Scalar(b) => b.finalize(out),
            Builder::Sequence(b) => b.finalize(out),
            Builder::Map(b) => b.finalize(out),
        }
    }
}

/// Single-use encoding engine for one value.
///
/// Requesting a second root builder from the same encoder is a caller bug
/// and panics. An encoder whose root was never requested holds an absent
/// value: map builders omit it, everywhere else it is an error.
#[derive(Debug)]
pub struct Encoder {
    context: Context,
    root: Option<Builder>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Creates an encoder with the default nesting limit
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Creates an encoder that rejects lists and dictionaries nested deeper
    /// than `max_depth`
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::from_context(Context::root(max_depth))
    }

    pub(crate) fn from_context(context: Context) -> Self {
        Self {
            context,
            root: None,
        }
    }

    /// Path from the document root to this value
    pub fn path(&self) -> &KeyPath {
        &self.context.path
    }

    /// Builds an error located at this value
    pub fn error(&self, kind: ErrorKind) -> Error {
        self.context.error(kind)
    }

    /// Returns true until a root builder has been requested
    pub fn is_absent(&self) -> bool {
        self.root.is_none()
    }

    /// Requests the root as a scalar.
    ///
    /// # Panics
    ///
    /// Panics if a root builder was already requested.
    pub fn scalar(&mut self) -> &mut ScalarBuilder {
        let builder = ScalarBuilder::new(self.context.clone());
        match self.install(Builder::Scalar(builder)) {
            Builder::Scalar(b) => b,
            _ => unreachable!("root was just installed as a scalar"),
        }
    }

    /// Requests the root as a list, failing with
    /// [`ErrorKind::NestingTooDeep`] past the depth limit.
    ///
    /// # Panics
    ///
    /// Panics if a root builder was already requested.
    pub fn sequence(&mut self) -> Result<&mut SequenceBuilder> {
        self.context.enter()?;
        let builder = SequenceBuilder::new(self.context.clone());
        match self.install(Builder::Sequence(builder)) {
            Builder::Sequence(b) => Ok(b),
            _ => unreachable!("root was just installed as a sequence"),
        }
    }

    /// Requests the root as a dictionary, failing with
    /// [`ErrorKind::NestingTooDeep`] past the depth limit.
    ///
    /// # Panics
    ///
    /// Panics if a root builder was already requested.
    pub fn map(&mut self) -> Result<&mut MapBuilder> {
        self.context.enter()?;
        let builder = MapBuilder::new(self.context.clone());
        match self.install(Builder::Map(builder)) {
            Builder::Map(b) => Ok(b),
            _ => unreachable!("root was just installed as a map"),
        }
    }

    /// Hands the root to a [`ToBencode`] implementation
    pub fn encode<T: ToBencode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode_bencode(self)
    }

    /// Serializes the root into canonical bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.finish_into(&mut out)?;
        Ok(out)
    }

    /// Appends the canonical bytes of a present root to `out`
    pub(crate) fn finish_into(self, out: &mut Vec<u8>) -> Result<()> {
        match self.root {
            Some(builder) => builder.finalize(out),
            None => Err(self.context.error(ErrorKind::UnsupportedType("absent value"))),
        }
    }

    /// Appends the canonical bytes of the root, or nothing if it is absent.
    /// Returns whether anything was written.
    pub(crate) fn finish_present(self, out: &mut Vec<u8>) -> Result<bool> {
        match self.root {
            Some(builder) => builder.finalize(out).map(|()| true),
            None => Ok(false),
        }
    }

    fn install(&mut self, builder: Builder) -> &mut Builder {
        assert!(
            self.root.is_none(),
            "root builder already requested at {}",
            self.context.path
        );
        self.root.insert(builder)
    }
}

/// Encode any [`ToBencode`] value into canonical bytes.
///
/// Lists and dictionaries may nest [`DEFAULT_MAX_DEPTH`] levels deep, the
/// same bound [`Policy::new`](crate::Policy::new) decodes with. Values
/// decoded under a higher [`Policy::max_depth`](crate::Policy::max_depth)
/// need [`encode_with_max_depth`] to be written back out.
pub fn encode<T: ToBencode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    encode_with_max_depth(value, DEFAULT_MAX_DEPTH)
}

/// Encode any [`ToBencode`] value into canonical bytes, rejecting lists and
/// dictionaries nested deeper than `max_depth`
pub fn encode_with_max_depth<T: ToBencode + ?Sized>(
    value: &T,
    max_depth: usize,
) -> Result<Vec<u8>> {
    let mut encoder = Encoder::with_max_depth(max_depth);
    encoder.encode(value)?;
    let bytes = encoder.finish()?;
    debug!("Encoded {} bytes", bytes.len());
    Ok(bytes)
}

/// Writes the `len:` prefix and payload of a byte string
pub(crate) fn write_byte_string(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
}
