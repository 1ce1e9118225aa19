//! Conversion traits between Rust types and containers.
//!
//! [`FromBencode`] pulls a value out of a [`Decoder`] and [`ToBencode`]
//! describes a value to an [`Encoder`]. Both are implemented for the integer
//! primitives, strings, [`Bytes`], vectors, string- or byte-keyed maps,
//! [`Option`] and [`Value`](crate::Value).
//!
//! The format has no boolean or floating-point representation. `bool`, `f32`
//! and `f64` implement both traits only to fail with
//! [`ErrorKind::UnsupportedType`].
//!
//! # Example
//!
//! ```
//! use bencodex_core::{decode_as, encode, Decoder, Encoder, FromBencode, Policy, Result, ToBencode};
//!
//! #[derive(Debug, PartialEq)]
//! struct Peer {
//!     ip: String,
//!     port: u16,
//! }
//!
//! impl FromBencode for Peer {
//!     fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
//!         let map = decoder.map()?;
//!         map.check_unknown_keys(&["ip", "port"])?;
//!         Ok(Peer {
//!             ip: map.decode("ip")?,
//!             port: map.decode("port")?,
//!         })
//!     }
//! }
//!
//! impl ToBencode for Peer {
//!     fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
//!         let map = encoder.map()?;
//!         map.insert("port", &self.port)?;
//!         map.insert("ip", &self.ip)?;
//!         Ok(())
//!     }
//! }
//!
//! let peer = Peer { ip: "10.0.0.1".into(), port: 6881 };
//! let bytes = encode(&peer)?;
//! assert_eq!(bytes, b"d2:ip8:10.0.0.14:porti6881ee");
//! assert_eq!(decode_as::<Peer>(&bytes, Policy::new())?, peer);
//! # Ok::<(), bencodex_core::Error>(())
//! ```

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{ErrorKind, Result};
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// Types that can be read from a decoded value
pub trait FromBencode: Sized {
    /// Consumes the decoder and produces a value
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self>;
}

/// Types that can be written as a value
pub trait ToBencode {
    /// Describes `self` to the encoder by requesting at most one root builder.
    ///
    /// Requesting none leaves the value absent.
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()>;
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl FromBencode for $ty {
            fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
                decoder.scalar()?.into_integer()
            }
        }

        impl ToBencode for $ty {
            fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
                let value = i128::try_from(*self)
                    .map_err(|_| encoder.error(ErrorKind::IntegerOverflow(stringify!($ty))))?;
                encoder.scalar().write_integer(value)
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_unsupported {
    ($($ty:ty),* $(,)?) => {$(
        impl FromBencode for $ty {
            fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
                Err(decoder.error(ErrorKind::UnsupportedType(stringify!($ty))))
            }
        }

        impl ToBencode for $ty {
            fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
                Err(encoder.error(ErrorKind::UnsupportedType(stringify!($ty))))
            }
        }
    )*};
}

impl_unsupported!(bool, f32, f64);

impl FromBencode for String {
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        decoder.scalar()?.into_text().map(str::to_owned)
    }
}

impl ToBencode for String {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.scalar().write_str(self)
    }
}

impl ToBencode for str {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.scalar().write_str(self)
    }
}

impl FromBencode for Bytes {
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        decoder.scalar()?.into_bytes().map(Bytes::copy_from_slice)
    }
}

impl ToBencode for Bytes {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.scalar().write_bytes(self)
    }
}

impl<T: FromBencode> FromBencode for Vec<T> {
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        let mut seq = decoder.sequence()?;
        let mut items = Vec::with_capacity(seq.len());
        while !seq.is_at_end() {
            items.push(seq.decode_next()?);
        }
        Ok(items)
    }
}

impl<T: ToBencode> ToBencode for Vec<T> {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        self.as_slice().encode_bencode(encoder)
    }
}

impl<T: ToBencode> ToBencode for [T] {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.sequence()?.extend(self)
    }
}

/// Dictionary keys a map type can be built from
pub trait MapKey: AsRef<[u8]> + Sized {
    /// Converts raw key bytes; `decoder` locates errors at the entry
    fn from_key(key: &[u8], decoder: &Decoder<'_>) -> Result<Self>;
}

impl MapKey for String {
    fn from_key(key: &[u8], decoder: &Decoder<'_>) -> Result<Self> {
        String::from_utf8(key.to_vec()).map_err(|_| decoder.error(ErrorKind::InvalidUtf8))
    }
}

impl MapKey for Bytes {
    fn from_key(key: &[u8], _decoder: &Decoder<'_>) -> Result<Self> {
        Ok(Bytes::copy_from_slice(key))
    }
}

impl<K: MapKey + Ord, V: FromBencode> FromBencode for BTreeMap<K, V> {
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        let map = decoder.map()?;
        let mut out = BTreeMap::new();
        for (key, value) in map.entries() {
            out.insert(K::from_key(key, &value)?, value.decode()?);
        }
        Ok(out)
    }
}

impl<K: AsRef<[u8]>, V: ToBencode> ToBencode for BTreeMap<K, V> {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        let map = encoder.map()?;
        for (key, value) in self {
            map.insert(key, value)?;
        }
        Ok(())
    }
}

impl<K, V, S> FromBencode for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: FromBencode,
    S: BuildHasher + Default,
{
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        let map = decoder.map()?;
        let mut out = HashMap::with_capacity_and_hasher(map.len(), S::default());
        for (key, value) in map.entries() {
            out.insert(K::from_key(key, &value)?, value.decode()?);
        }
        Ok(out)
    }
}

impl<K: AsRef<[u8]>, V: ToBencode, S> ToBencode for HashMap<K, V, S> {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        let map = encoder.map()?;
        for (key, value) in self {
            map.insert(key, value)?;
        }
        Ok(())
    }
}

/// A present value is `Some`; absence can only be observed from the
/// enclosing map, see [`MapContainer::decode_optional`](crate::MapContainer::decode_optional)
impl<T: FromBencode> FromBencode for Option<T> {
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        T::decode_bencode(decoder).map(Some)
    }
}

/// `None` writes nothing, which a map builder turns into an omitted key
impl<T: ToBencode> ToBencode for Option<T> {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        match self {
            Some(value) => value.encode_bencode(encoder),
            None => Ok(()),
        }
    }
}

impl<T: FromBencode> FromBencode for Box<T> {
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        T::decode_bencode(decoder).map(Box::new)
    }
}

impl<T: ToBencode + ?Sized> ToBencode for Box<T> {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        (**self).encode_bencode(encoder)
    }
}

impl<T: ToBencode + ?Sized> ToBencode for &T {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        (**self).encode_bencode(encoder)
    }
}
