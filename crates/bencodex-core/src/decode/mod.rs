//! Lazy, shape-driven decoding.
//!
//! ## Architecture
//!
//! Decoding is driven by the consumer. A [`Decoder`] wraps one delimited value
//! and hands out exactly one [`Container`] of the shape the consumer asks for:
//!
//! - [`ScalarContainer`]: an integer or byte string, extracted on demand
//! - [`SequenceContainer`]: a list, whose direct children are delimited once
//!   at construction and consumed in order
//! - [`MapContainer`]: a dictionary, whose entries are delimited once at
//!   construction and looked up by key
//!
//! Nested values stay unparsed spans into the root buffer until the consumer
//! requests them, so a consumer only pays for the parts of a document its
//! target shape needs.
//!
//! ```
//! use bencodex_core::{Decoder, Policy};
//!
//! let input = b"d4:name4:spam4:sizei42ee";
//! let map = Decoder::new(input, Policy::new())?.map()?;
//!
//! assert_eq!(map.get_scalar("name")?.into_text()?, "spam");
//! assert_eq!(map.get_scalar("size")?.into_integer::<u32>()?, 42);
//! # Ok::<(), bencodex_core::Error>(())
//! ```

mod map;
mod scalar;
mod sequence;

use crate::convert::FromBencode;
use crate::error::{Error, ErrorKind, Result};
use crate::path::{KeyPath, PathSegment};
use crate::policy::Policy;
use crate::scanner::{self, Span, Token, TokenKind};
use crate::value::Value;
use std::fmt;
use tracing::debug;

pub use map::MapContainer;
pub use scalar::ScalarContainer;
pub use sequence::SequenceContainer;

/// Structural kind a container presents to its consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Integer or byte string
    Scalar,
    /// List
    Sequence,
    /// Dictionary
    Map,
}

impl Shape {
    /// The shape a physical token presents
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Integer | TokenKind::ByteString => Shape::Scalar,
            TokenKind::List => Shape::Sequence,
            TokenKind::Dict => Shape::Map,
        }
    }

    /// Human-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Scalar => "scalar",
            Shape::Sequence => "sequence",
            Shape::Map => "map",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State every container carries: the root buffer, the policy, its nesting
/// level and its path from the root
#[derive(Debug, Clone)]
pub(crate) struct Frame<'a> {
    pub(crate) input: &'a [u8],
    pub(crate) policy: Policy,
    pub(crate) depth: usize,
    pub(crate) path: KeyPath,
}

impl<'a> Frame<'a> {
    fn root(input: &'a [u8], policy: Policy) -> Self {
        Self {
            input,
            policy,
            depth: 0,
            path: KeyPath::root(),
        }
    }

    pub(crate) fn child(&self, segment: PathSegment) -> Self {
        Self {
            input: self.input,
            policy: self.policy,
            depth: self.depth + 1,
            path: self.path.child(segment),
        }
    }

    pub(crate) fn error(&self, kind: ErrorKind, offset: usize) -> Error {
        Error::decode(kind, offset).under(&self.path)
    }

    pub(crate) fn shape_mismatch(&self, expected: &'static str, token: &Token) -> Error {
        self.error(
            ErrorKind::ShapeMismatch {
                expected,
                found: token.kind,
            },
            token.span.start,
        )
    }
}

/// One of the three container shapes
#[derive(Debug)]
pub enum Container<'a> {
    /// Integer or byte string
    Scalar(ScalarContainer<'a>),
    /// List
    Sequence(SequenceContainer<'a>),
    /// Dictionary
    Map(MapContainer<'a>),
}

impl<'a> Container<'a> {
    /// Shape of this container
    pub fn shape(&self) -> Shape {
        match self {
            Container::Scalar(_) => Shape::Scalar,
            Container::Sequence(_) => Shape::Sequence,
            Container::Map(_) => Shape::Map,
        }
    }

    /// Bytes covered by the underlying value
    pub fn span(&self) -> Span {
        match self {
            Container::Scalar(c) => c.span(),
            Container::Sequence(c) => c.span(),
            Container::Map(c) => c.span(),
        }
    }

    /// Unwraps a scalar container
    pub fn into_scalar(self) -> Result<ScalarContainer<'a>> {
        match self {
            Container::Scalar(c) => Ok(c),
            other => Err(other.mismatch(Shape::Scalar)),
        }
    }

    /// Unwraps a sequence container
    pub fn into_sequence(self) -> Result<SequenceContainer<'a>> {
        match self {
            Container::Sequence(c) => Ok(c),
            other => Err(other.mismatch(Shape::Sequence)),
        }
    }

    /// Unwraps a map container
    pub fn into_map(self) -> Result<MapContainer<'a>> {
        match self {
            Container::Map(c) => Ok(c),
            other => Err(other.mismatch(Shape::Map)),
        }
    }

    fn mismatch(&self, expected: Shape) -> Error {
        let (frame, token) = match self {
            Container::Scalar(c) => (c.frame(), c.token()),
            Container::Sequence(c) => (c.frame(), c.token()),
            Container::Map(c) => (c.frame(), c.token()),
        };
        frame.shape_mismatch(expected.as_str(), &token)
    }
}

/// Single-use decoding engine over one delimited value.
///
/// Every container-producing method consumes the decoder, so at most one
/// container can ever be obtained from it.
#[derive(Debug)]
pub struct Decoder<'a> {
    frame: Frame<'a>,
    token: Token,
}

impl<'a> Decoder<'a> {
    /// Creates the root decoder for a complete document.
    ///
    /// The outermost value is delimited immediately; bytes after it are
    /// rejected with [`ErrorKind::ExtraData`] unless the policy's
    /// `trailing_data` strategy is [`Ignore`](crate::Strategy::Ignore).
    pub fn new(input: &'a [u8], policy: Policy) -> Result<Self> {
        debug!("Decoding {} bytes", input.len());

        let (token, next) = scanner::delimit(input, 0, &policy)?;

        if next != input.len() {
            if policy.trailing_data.is_error() {
                return Err(Error::decode(ErrorKind::ExtraData, next));
            }
            debug!("Ignoring {} trailing bytes after offset {}", input.len() - next, next);
        }

        Ok(Self {
            frame: Frame::root(input, policy),
            token,
        })
    }

    pub(crate) fn from_parts(frame: Frame<'a>, token: Token) -> Self {
        Self { frame, token }
    }

    /// Physical kind of the wrapped value
    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    /// Shape of the wrapped value
    pub fn shape(&self) -> Shape {
        Shape::of(self.token.kind)
    }

    /// Bytes covered by the wrapped value
    pub fn span(&self) -> Span {
        self.token.span
    }

    /// Path from the document root to the wrapped value
    pub fn path(&self) -> &KeyPath {
        &self.frame.path
    }

    /// The policy in effect
    pub fn policy(&self) -> &Policy {
        &self.frame.policy
    }

    /// Builds an error located at the wrapped value
    pub fn error(&self, kind: ErrorKind) -> Error {
        self.frame.error(kind, self.token.span.start)
    }

    /// Produces the container of the requested shape, failing with
    /// [`ErrorKind::ShapeMismatch`] if the value has a different shape
    pub fn container(self, shape: Shape) -> Result<Container<'a>> {
        if self.shape() != shape {
            return Err(self.frame.shape_mismatch(shape.as_str(), &self.token));
        }
        self.into_container()
    }

    /// Produces the container matching the value's physical shape
    pub fn into_container(self) -> Result<Container<'a>> {
        match Shape::of(self.token.kind) {
            Shape::Scalar => Ok(Container::Scalar(ScalarContainer::new(
                self.frame, self.token,
            ))),
            Shape::Sequence => Ok(Container::Sequence(SequenceContainer::new(
                self.frame, self.token,
            )?)),
            Shape::Map => Ok(Container::Map(MapContainer::new(self.frame, self.token)?)),
        }
    }

    /// Produces a scalar container
    pub fn scalar(self) -> Result<ScalarContainer<'a>> {
        self.container(Shape::Scalar)?.into_scalar()
    }

    /// Produces a sequence container
    pub fn sequence(self) -> Result<SequenceContainer<'a>> {
        self.container(Shape::Sequence)?.into_sequence()
    }

    /// Produces a map container
    pub fn map(self) -> Result<MapContainer<'a>> {
        self.container(Shape::Map)?.into_map()
    }

    /// Hands the value to a [`FromBencode`] implementation
    pub fn decode<T: FromBencode>(self) -> Result<T> {
        T::decode_bencode(self)
    }
}

/// Decode a complete document into a [`Value`] tree
pub fn decode(input: &[u8], policy: Policy) -> Result<Value> {
    decode_as(input, policy)
}

/// Decode a complete document into any [`FromBencode`] type
pub fn decode_as<T: FromBencode>(input: &[u8], policy: Policy) -> Result<T> {
    Decoder::new(input, policy)?.decode()
}

/// Read a file into memory and decode it into a [`Value`] tree
pub fn decode_file(path: impl AsRef<std::path::Path>, policy: Policy) -> Result<Value> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
    decode(&data, policy)
}
