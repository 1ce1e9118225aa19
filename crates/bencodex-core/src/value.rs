//! Owned tree for documents without a fixed schema.

use crate::convert::{FromBencode, ToBencode};
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::Result;
use crate::scanner::TokenKind;
use bytes::Bytes;
use std::collections::BTreeMap;

/// Any value: integer, byte string, list or dictionary.
///
/// ```
/// use bencodex_core::{decode, encode, Policy, Value};
///
/// let value = decode(b"d4:spaml1:a1:bee", Policy::new())?;
/// let list = value.get("spam").and_then(Value::as_list).unwrap();
/// assert_eq!(list[1].as_str(), Some("b"));
///
/// assert_eq!(encode(&value)?, b"d4:spaml1:a1:bee");
/// # Ok::<(), bencodex_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An integer; the format puts no bound on width, this holds 128 bits
    Integer(i128),
    /// A byte string, not necessarily UTF-8
    Bytes(Bytes),
    /// An ordered list
    List(Vec<Value>),
    /// A dictionary keyed by raw bytes
    Dict(BTreeMap<Bytes, Value>),
}

impl Value {
    /// Creates a byte string from UTF-8 text
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Physical kind this value encodes as
    pub fn kind(&self) -> TokenKind {
        match self {
            Value::Integer(_) => TokenKind::Integer,
            Value::Bytes(_) => TokenKind::ByteString,
            Value::List(_) => TokenKind::List,
            Value::Dict(_) => TokenKind::Dict,
        }
    }

    /// Returns the integer, if this is one
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the byte string, if this is one
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the byte string as text, if this is a UTF-8 byte string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Returns the list, if this is one
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the dictionary, if this is one
    pub fn as_dict(&self) -> Option<&BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Takes the dictionary out, if this is one
    pub fn into_dict(self) -> Option<BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up `key` if this is a dictionary
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        self.as_dict()?.get(key.as_ref())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i.into())
    }
}

impl From<i128> for Value {
    fn from(i: i128) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Bytes(Bytes::from(s))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<BTreeMap<Bytes, Value>> for Value {
    fn from(d: BTreeMap<Bytes, Value>) -> Self {
        Value::Dict(d)
    }
}

impl FromBencode for Value {
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        match decoder.kind() {
            TokenKind::Integer => decoder.scalar()?.into_integer::<i128>().map(Value::Integer),
            TokenKind::ByteString => decoder.decode().map(Value::Bytes),
            TokenKind::List => decoder.decode().map(Value::List),
            TokenKind::Dict => decoder.decode().map(Value::Dict),
        }
    }
}

impl ToBencode for Value {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        match self {
            Value::Integer(i) => i.encode_bencode(encoder),
            Value::Bytes(b) => b.encode_bencode(encoder),
            Value::List(l) => l.encode_bencode(encoder),
            Value::Dict(d) => d.encode_bencode(encoder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::encode::encode;
    use crate::error::ErrorKind;
    use crate::policy::{Policy, Strategy};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_tree() {
        let input = b"d4:infod6:lengthi3e4:name1:xe4:listli1e2:abee";
        let value = decode(input, Policy::new()).unwrap();

        let info = value.get("info").unwrap();
        assert_eq!(info.get("length").and_then(Value::as_integer), Some(3));
        assert_eq!(info.get("name").and_then(Value::as_str), Some("x"));

        let list = value.get(b"list").and_then(Value::as_list).unwrap();
        assert_eq!(list, &[Value::Integer(1), Value::string("ab")]);
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::Integer(1).get("info"), None);
    }

    #[test]
    fn test_integer_width() {
        let input = b"i9223372036854775808e";
        let value = decode(input, Policy::new()).unwrap();
        assert_eq!(value.as_integer(), Some(i128::from(i64::MAX) + 1));
        assert_eq!(encode(&value).unwrap(), input);

        let input = b"i-170141183460469231731687303715884105728e";
        assert_eq!(decode(input, Policy::new()).unwrap(), Value::Integer(i128::MIN));

        let input = b"i170141183460469231731687303715884105728e";
        let err = decode(input, Policy::new()).unwrap_err();
        assert_eq!(err.kind(), Some(&ErrorKind::IntegerOverflow("i128")));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let policy = Policy::new().key_order(Strategy::Ignore);
        let value = decode(b"d1:ai1e1:ai2ee", policy).unwrap();
        assert_eq!(value.get("a"), Some(&Value::Integer(2)));
        assert_eq!(value.as_dict().unwrap().len(), 1);
    }

    #[test]
    fn test_encode_sorts_keys() {
        let mut dict = BTreeMap::new();
        dict.insert(Bytes::from_static(b"zz"), Value::from(1i64));
        dict.insert(Bytes::from_static(b"a"), Value::from(vec![Value::from("x")]));
        let value = Value::from(dict);

        assert_eq!(value.kind(), TokenKind::Dict);
        assert_eq!(encode(&value).unwrap(), b"d1:al1:xe2:zzi1ee");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(7i64), Value::from(7i128));
        assert_eq!(Value::from(String::from("s")).as_str(), Some("s"));
        assert_eq!(Value::from(Bytes::from_static(b"\xff")).as_str(), None);
        assert!(Value::List(Vec::new()).into_dict().is_none());
        assert!(Value::Dict(BTreeMap::new()).into_dict().unwrap().is_empty());
    }
}
