//! Property tests: round-trip and canonical idempotence over arbitrary trees

use bencodex_core::{decode, encode, Policy, Value};
use bytes::Bytes;
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i128>().prop_map(Value::Integer),
        vec(any::<u8>(), 0..16).prop_map(|b| Value::Bytes(Bytes::from(b))),
    ];

    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..8).prop_map(Value::List),
            btree_map(
                vec(any::<u8>(), 0..8).prop_map(Bytes::from),
                inner,
                0..8
            )
            .prop_map(Value::Dict),
        ]
    })
}

proptest! {
    #[test]
    fn prop_round_trip(value in arb_value()) {
        let bytes = encode(&value).unwrap();
        prop_assert_eq!(decode(&bytes, Policy::new()).unwrap(), value);
    }

    #[test]
    fn prop_canonical_idempotence(value in arb_value()) {
        let canonical = encode(&value).unwrap();
        let reencoded = encode(&decode(&canonical, Policy::strict()).unwrap()).unwrap();
        prop_assert_eq!(reencoded, canonical);
    }

    #[test]
    fn prop_arbitrary_input_never_panics(input in vec(any::<u8>(), 0..64)) {
        let _ = decode(&input, Policy::new());
        let _ = decode(&input, Policy::lenient());
    }

    #[test]
    fn prop_integers_are_canonical(n in any::<i64>()) {
        let bytes = encode(&n).unwrap();
        prop_assert_eq!(bytes, format!("i{}e", n).into_bytes());
    }
}
