//! Conformance vectors for decoding, encoding and policy handling
//!
//! These tests drive the crate through its public API only.

use bencodex_core::*;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn kind_of(err: Error) -> ErrorKind {
    err.kind().cloned().expect("codec error")
}

fn ignore_all() -> Policy {
    Policy::lenient()
}

// ============================================================================
// Integers
// ============================================================================

#[test]
fn test_integer_zero() {
    assert_eq!(decode_as::<i64>(b"i0e", Policy::new()).unwrap(), 0);
}

#[test]
fn test_negative_zero_never_accepted() {
    let err = decode_as::<i64>(b"i-0e", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::NegativeZero);

    let err = decode_as::<i64>(b"i-0e", ignore_all()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::NegativeZero);
}

#[test]
fn test_leading_zero_policy() {
    let err = decode_as::<i64>(b"i01e", Policy::new()).unwrap_err();
    assert!(err.is_policy_violation());
    assert_eq!(kind_of(err), ErrorKind::LeadingZero);

    let policy = Policy::new().leading_zeros(Strategy::Ignore);
    assert_eq!(decode_as::<i64>(b"i01e", policy).unwrap(), 1);
}

#[test]
fn test_malformed_integers() {
    for input in [&b"ie"[..], b"i-e", b"i1x2e", b"i+1e", b"i1.5e"] {
        let err = decode(input, Policy::new()).unwrap_err();
        assert_eq!(kind_of(err), ErrorKind::MalformedInteger, "{input:?}");
    }

    let err = decode(b"i12", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::UnexpectedEnd);
}

// ============================================================================
// Byte strings
// ============================================================================

#[test]
fn test_empty_byte_string() {
    assert_eq!(decode_as::<String>(b"0:", Policy::new()).unwrap(), "");
    assert_eq!(
        decode(b"0:", Policy::new()).unwrap(),
        Value::Bytes(Bytes::new())
    );
}

#[test]
fn test_length_prefix_overread() {
    let err = decode(b"5:two", Policy::new()).unwrap_err();
    assert_eq!(err.offset(), Some(2));
    assert_eq!(kind_of(err), ErrorKind::UnexpectedEnd);

    // A prefix that overflows any address space
    let err = decode(b"99999999999999999999999999:x", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::UnexpectedEnd);
}

#[test]
fn test_length_prefix_leading_zero() {
    let err = decode(b"03:abc", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::LeadingZero);

    let value = decode(b"03:abc", ignore_all()).unwrap();
    assert_eq!(value.as_str(), Some("abc"));
}

// ============================================================================
// Dictionaries
// ============================================================================

fn one_two() -> BTreeMap<String, i64> {
    [("one".to_string(), 1), ("two".to_string(), 2)]
        .into_iter()
        .collect()
}

#[test]
fn test_empty_dict() {
    let map: BTreeMap<String, i64> = decode_as(b"de", Policy::new()).unwrap();
    assert!(map.is_empty());
}

#[test]
fn test_sorted_dict() {
    let map: BTreeMap<String, i64> = decode_as(b"d3:onei1e3:twoi2ee", Policy::new()).unwrap();
    assert_eq!(map, one_two());
}

#[test]
fn test_unsorted_dict_policy() {
    let input = b"d3:twoi2e3:onei1ee";

    let err = decode_as::<BTreeMap<String, i64>>(input, Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::OutOfOrderKeys);

    let policy = Policy::new().key_order(Strategy::Ignore);
    let map: BTreeMap<String, i64> = decode_as(input, policy).unwrap();
    assert_eq!(map, one_two());
}

#[test]
fn test_duplicate_keys_resolve_to_last() {
    let input = b"d5:valuei1e5:valuei2ee";
    let policy = Policy::new().key_order(Strategy::Ignore);

    let map = Decoder::new(input, policy).unwrap().map().unwrap();
    assert_eq!(map.decode::<i64>("value").unwrap(), 2);

    let decoded: BTreeMap<String, i64> = decode_as(input, policy).unwrap();
    assert_eq!(decoded.get("value"), Some(&2));
}

#[test]
fn test_dict_grammar_errors() {
    let err = decode(b"di1ei2ee", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::MalformedKey);

    let err = decode(b"d3:one", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::UnterminatedDict);

    let err = decode(b"d3:onei1e", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::UnterminatedDict);
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn test_empty_list() {
    let values: Vec<i64> = decode_as(b"le", Policy::new()).unwrap();
    assert!(values.is_empty());
}

#[test]
fn test_heterogeneous_list_as_integers() {
    let err = decode_as::<Vec<i64>>(b"li0e3:onee", Policy::new()).unwrap_err();
    assert_eq!(err.offset(), Some(4));
    assert_eq!(err.key_path().unwrap().segments(), &[PathSegment::Index(1)]);
    assert!(matches!(
        kind_of(err),
        ErrorKind::ShapeMismatch {
            found: TokenKind::ByteString,
            ..
        }
    ));
}

#[test]
fn test_unterminated_list() {
    let err = decode(b"li1e", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::UnterminatedList);
}

// ============================================================================
// Trailing data
// ============================================================================

#[test]
fn test_extra_data() {
    for input in [&b"i0ee"[..], b"i0ex", b"le0:", b"d3:onei1eei2e"] {
        let err = decode(input, Policy::new()).unwrap_err();
        assert_eq!(kind_of(err), ErrorKind::ExtraData, "{input:?}");
    }

    let value = decode(b"i0ex", ignore_all()).unwrap();
    assert_eq!(value, Value::Integer(0));
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_encode_flat_map() {
    let mut fields = BTreeMap::new();
    fields.insert("value", 0i64);
    assert_eq!(encode(&fields).unwrap(), b"d5:valuei0ee");
}

#[test]
fn test_encode_nested_map() {
    let mut inner = BTreeMap::new();
    inner.insert("value", 0i64);
    let mut outer = BTreeMap::new();
    outer.insert("obj", inner);
    assert_eq!(encode(&outer).unwrap(), b"d3:objd5:valuei0eee");
}

#[test]
fn test_encode_canonical_integers() {
    assert_eq!(encode(&0i64).unwrap(), b"i0e");
    assert_eq!(encode(&-0i64).unwrap(), b"i0e");
    assert_eq!(encode(&-10i64).unwrap(), b"i-10e");
}

#[test]
fn test_unsupported_shapes() {
    assert_eq!(
        kind_of(encode(&1.0f64).unwrap_err()),
        ErrorKind::UnsupportedType("f64")
    );
    assert_eq!(
        kind_of(encode(&vec![true]).unwrap_err()),
        ErrorKind::UnsupportedType("bool")
    );
    assert_eq!(
        kind_of(decode_as::<f32>(b"i1e", Policy::new()).unwrap_err()),
        ErrorKind::UnsupportedType("f32")
    );
}

// ============================================================================
// Schema-driven records
// ============================================================================

#[derive(Debug, PartialEq)]
struct Announce {
    interval: u32,
    peers: Vec<Bytes>,
    warning: Option<String>,
}

impl FromBencode for Announce {
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        let map = decoder.map()?;
        map.check_unknown_keys(&["interval", "peers", "warning"])?;
        Ok(Self {
            interval: map.decode("interval")?,
            peers: map.decode("peers")?,
            warning: map.decode_optional("warning")?,
        })
    }
}

impl ToBencode for Announce {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        let map = encoder.map()?;
        map.insert("warning", &self.warning)?;
        map.insert("peers", &self.peers)?;
        map.insert("interval", &self.interval)?;
        Ok(())
    }
}

#[test]
fn test_record_round_trip() {
    let announce = Announce {
        interval: 1800,
        peers: vec![Bytes::from_static(b"\x7f\x00\x00\x01\x1a\xe1")],
        warning: None,
    };

    let bytes = encode(&announce).unwrap();
    assert_eq!(bytes, b"d8:intervali1800e5:peersl6:\x7f\x00\x00\x01\x1a\xe1ee");
    assert_eq!(decode_as::<Announce>(&bytes, Policy::new()).unwrap(), announce);
}

#[test]
fn test_record_unknown_keys() {
    let input = b"d8:intervali60e12:min intervali30e5:peerslee";

    let announce: Announce = decode_as(input, Policy::new()).unwrap();
    assert_eq!(announce.interval, 60);
    assert_eq!(announce.warning, None);

    let err = decode_as::<Announce>(input, Policy::strict()).unwrap_err();
    assert_eq!(err.offset(), Some(15));
    assert_eq!(kind_of(err), ErrorKind::UnknownKey("min interval".into()));
}

#[test]
fn test_record_missing_key() {
    let err = decode_as::<Announce>(b"d8:intervali60ee", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::KeyNotFound("peers".into()));
}

#[test]
fn test_record_error_path() {
    let input = b"d8:intervali60e5:peersl4:abcdi1eee";
    let err = decode_as::<Announce>(input, Policy::new()).unwrap_err();
    assert_eq!(err.key_path().unwrap().to_string(), "$.peers[1]");
    assert_eq!(
        err.to_string(),
        "expected byte string, found integer at offset 29 ($.peers[1])"
    );
}

/// Newtype that delegates its wire form to the wrapped value
#[derive(Debug, PartialEq)]
struct Port(u16);

impl FromBencode for Port {
    fn decode_bencode(decoder: Decoder<'_>) -> Result<Self> {
        decoder
            .scalar()?
            .into_nested(Shape::Scalar)?
            .into_scalar()?
            .into_integer()
            .map(Port)
    }
}

impl ToBencode for Port {
    fn encode_bencode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.scalar().write_nested(&self.0)
    }
}

#[test]
fn test_nested_delegation_round_trip() {
    let bytes = encode(&Port(6881)).unwrap();
    assert_eq!(bytes, encode(&6881u16).unwrap());
    assert_eq!(bytes, b"i6881e");
    assert_eq!(decode_as::<Port>(&bytes, Policy::new()).unwrap(), Port(6881));

    let mut ports = BTreeMap::new();
    ports.insert("http", Port(80));
    ports.insert("peer", Port(6881));
    let bytes = encode(&ports).unwrap();
    assert_eq!(bytes, b"d4:httpi80e4:peeri6881ee");

    let decoded: BTreeMap<String, Port> = decode_as(&bytes, Policy::new()).unwrap();
    assert_eq!(decoded["peer"], Port(6881));

    let err = decode_as::<Port>(b"i70000e", Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::IntegerOverflow("u16"));
}

// ============================================================================
// Adversarial input
// ============================================================================

#[test]
fn test_deep_nesting_fails_closed() {
    let depth = 1_000;
    let mut input = "l".repeat(depth).into_bytes();
    input.extend(std::iter::repeat(b'e').take(depth));

    let err = decode(&input, Policy::new()).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::NestingTooDeep(DEFAULT_MAX_DEPTH));

    let policy = Policy::new().max_depth(depth);
    let (token, _) = scanner::delimit(&input, 0, &policy).unwrap();
    assert_eq!(token.span.len(), input.len());
}

#[test]
fn test_truncations_never_panic() {
    let input = b"d4:infod6:lengthi1024e4:name8:file.bin12:piece lengthi262144ee4:listli1e2:abee";
    assert!(decode(input, Policy::new()).is_ok());

    for end in 0..input.len() {
        assert!(decode(&input[..end], Policy::new()).is_err(), "prefix {end}");
    }
}

#[test]
fn test_deep_value_round_trip_with_raised_limit() {
    let depth = 100;
    let mut input = "l".repeat(depth).into_bytes();
    input.extend(std::iter::repeat(b'e').take(depth));

    let value = decode(&input, Policy::new().max_depth(depth)).unwrap();

    let err = encode(&value).unwrap_err();
    assert_eq!(kind_of(err), ErrorKind::NestingTooDeep(DEFAULT_MAX_DEPTH));

    assert_eq!(encode_with_max_depth(&value, depth).unwrap(), input);
}
