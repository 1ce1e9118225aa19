//! Error types for the bencodex-core library.
//!
//! Every failure carries an [`ErrorKind`] from a single taxonomy shared by the
//! scanner, the decode containers and the encode builders. Decode failures
//! also record the byte offset in the root input buffer, and both decode and
//! encode failures record the [`KeyPath`] of the value being processed.

use crate::path::{KeyPath, PathSegment};
use crate::scanner::TokenKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bencodex operations
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong, independent of where
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Integer token without digits, or with a non-digit before its `e`
    #[error("malformed integer")]
    MalformedInteger,

    /// The literal `-0`
    #[error("negative zero is not a valid integer")]
    NegativeZero,

    /// Redundant leading zero in an integer or length prefix
    #[error("leading zero in number")]
    LeadingZero,

    /// Input ended before a value was complete
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// List without a closing `e`
    #[error("unterminated list")]
    UnterminatedList,

    /// Dictionary without a closing `e`, or a key without a value
    #[error("unterminated dictionary")]
    UnterminatedDict,

    /// Dictionary key that is not a byte string
    #[error("dictionary key is not a byte string")]
    MalformedKey,

    /// Byte that cannot appear at this position
    #[error("unexpected byte 0x{0:02x}")]
    InvalidByte(u8),

    /// Bytes left over after the outermost value
    #[error("extra data after value")]
    ExtraData,

    /// The physical token does not match the requested shape
    #[error("expected {expected}, found {found}")]
    ShapeMismatch {
        /// Name of the requested shape or token
        expected: &'static str,
        /// Token actually present in the input
        found: TokenKind,
    },

    /// Requested dictionary key is absent
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Dictionary key not claimed by the target schema
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// Dictionary keys not in strictly ascending byte order
    #[error("dictionary keys out of order")]
    OutOfOrderKeys,

    /// Byte string requested as text is not valid UTF-8
    #[error("byte string is not valid UTF-8")]
    InvalidUtf8,

    /// Integer literal does not fit the target type
    #[error("integer does not fit in {0}")]
    IntegerOverflow(&'static str),

    /// A scalar builder or map key was written twice
    #[error("value already encoded")]
    AlreadyEncoded,

    /// Value shape the format cannot represent
    #[error("bencode cannot represent {0}")]
    UnsupportedType(&'static str),

    /// Containers nested past the configured limit
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

/// Comprehensive error type for all bencodex operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input violated the grammar or an enforced policy
    #[error("{kind} at offset {offset} ({path})")]
    Decode {
        /// What went wrong
        kind: ErrorKind,
        /// Byte offset in the root input buffer
        offset: usize,
        /// Location of the offending value
        path: KeyPath,
    },

    /// A value could not be encoded
    #[error("{kind} ({path})")]
    Encode {
        /// What went wrong
        kind: ErrorKind,
        /// Location of the offending value
        path: KeyPath,
    },

    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a decode error at the document root
    pub fn decode(kind: ErrorKind, offset: usize) -> Self {
        Self::Decode {
            kind,
            offset,
            path: KeyPath::root(),
        }
    }

    /// Creates an encode error at the document root
    pub fn encode(kind: ErrorKind) -> Self {
        Self::Encode {
            kind,
            path: KeyPath::root(),
        }
    }

    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// The taxonomy member, if this is a codec error
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Decode { kind, .. } | Self::Encode { kind, .. } => Some(kind),
            Self::FileRead { .. } => None,
        }
    }

    /// Byte offset in the root input, for decode errors
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Decode { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Location of the offending value
    pub fn key_path(&self) -> Option<&KeyPath> {
        match self {
            Self::Decode { path, .. } | Self::Encode { path, .. } => Some(path),
            Self::FileRead { .. } => None,
        }
    }

    /// Prepends one path segment; used by a container re-raising a child error
    pub fn within(mut self, segment: PathSegment) -> Self {
        if let Self::Decode { path, .. } | Self::Encode { path, .. } = &mut self {
            path.push_front(segment);
        }
        self
    }

    /// Prepends the path of the container that raised or re-raised this error
    pub fn under(mut self, prefix: &KeyPath) -> Self {
        if let Self::Decode { path, .. } | Self::Encode { path, .. } = &mut self {
            path.prepend(prefix);
        }
        self
    }

    /// Returns true if a [`Policy`](crate::Policy) toggle set to ignore would
    /// have accepted the input
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self.kind(),
            Some(
                ErrorKind::LeadingZero
                    | ErrorKind::UnknownKey(_)
                    | ErrorKind::ExtraData
                    | ErrorKind::OutOfOrderKeys
            )
        )
    }
}
