//! # bencodex-core
//!
//! A strict, lazy codec for bencode documents.
//!
//! This crate provides:
//! - A grammar scanner that delimits values without materializing them
//! - Shape-driven decoding through scalar, sequence and map containers
//! - Builders that emit canonical bytes with sorted dictionary keys
//! - Conversion traits and an owned [`Value`] tree
//!
//! ## Architecture
//!
//! - [`scanner`]: Byte-level grammar and span discovery
//! - [`decode`]: Lazy containers over a borrowed input buffer
//! - [`encode`]: Builders that finalize into canonical bytes
//! - [`convert`]: [`FromBencode`] and [`ToBencode`]
//! - [`policy`]: Toggles for strict or lenient decoding
//! - [`error`]: Error taxonomy with byte offsets and key paths
//!
//! ## Example
//!
//! ```
//! use bencodex_core::{decode, encode, Policy, Value};
//! use std::collections::BTreeMap;
//!
//! let mut fields = BTreeMap::new();
//! fields.insert("value", 0i64);
//! let bytes = encode(&fields)?;
//! assert_eq!(bytes, b"d5:valuei0ee");
//!
//! let value = decode(&bytes, Policy::new())?;
//! assert_eq!(value.get("value"), Some(&Value::Integer(0)));
//!
//! // Canonical form is enforced on input
//! assert!(decode(b"i01e", Policy::new()).is_err());
//! assert!(decode(b"i-0e", Policy::lenient()).is_err());
//! # Ok::<(), bencodex_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod path;
pub mod policy;
pub mod scanner;
pub mod value;

// Re-export primary types for convenience
pub use convert::{FromBencode, MapKey, ToBencode};
pub use decode::{
    decode, decode_as, decode_file, Container, Decoder, MapContainer, ScalarContainer,
    SequenceContainer, Shape,
};
pub use encode::{
    encode, encode_with_max_depth, Encoder, MapBuilder, ScalarBuilder, SequenceBuilder,
};
pub use error::{Error, ErrorKind, Result};
pub use path::{KeyPath, PathSegment};
pub use policy::{Policy, Strategy, DEFAULT_MAX_DEPTH};
pub use scanner::{Span, Token, TokenKind};
pub use value::Value;

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
