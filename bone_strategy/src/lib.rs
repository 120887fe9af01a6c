use bone::{
    encoding::layout::{is_builtin, shape, Shape},
    Extension, Float, Inum, Value,
};
use proptest::prelude::*;
use std::ops::RangeInclusive;

/// arbitrary integer in the encodable range for use with proptest
pub fn arb_inum() -> impl Strategy<Value = Inum> {
    prop_oneof![
        // small
        (0u64..=16).prop_map(Inum::from),
        any::<i64>().prop_map(Inum::from),
        // full range, including magnitudes that only fit in a u64
        (any::<bool>(), any::<u64>()).prop_map(|(neg, mag)| Inum::from_sign_magnitude(neg, mag)),
    ]
}

/// arbitrary non-NaN float for use with proptest
pub fn arb_float() -> impl Strategy<Value = Float> {
    any::<f64>()
        .prop_filter("NaN has no encoding", |f| !f.is_nan())
        .prop_map(Float::from)
}

/// arbitrary byte, biased towards the bytes that need escaping
pub fn arb_byte() -> impl Strategy<Value = u8> { prop_oneof![Just(0u8), Just(1u8), any::<u8>()] }

/// arbitrary text with plenty of NULs and shared prefixes for use with proptest
pub fn arb_text() -> impl Strategy<Value = String> {
    let ch = prop_oneof![Just('\0'), Just('a'), Just('b'), any::<char>()];
    prop::collection::vec(ch, 0..12).prop_map(|cs| cs.into_iter().collect::<String>())
}

/// arbitrary level, mostly 0
pub fn arb_level() -> impl Strategy<Value = u64> { prop_oneof![3 => Just(0u64), 1 => 1u64..4] }

/// arbitrary `(level, code)` for an extension with a code in `codes`
pub fn arb_header(codes: RangeInclusive<u8>) -> impl Strategy<Value = (u64, u8)> {
    (arb_level(), codes).prop_filter("built-in codes are not extensions", |(level, code)| {
        !is_builtin(*level, *code)
    })
}

/// arbitrary block or blob extension for use with proptest
pub fn arb_byte_ext() -> impl Strategy<Value = Extension> {
    arb_header(0x20..=0x9F).prop_flat_map(|(level, code)| {
        let len = match shape(code) {
            Some(Shape::Block(n)) => n..=n,
            _ => 0..=12,
        };
        prop::collection::vec(arb_byte(), len).prop_map(move |bs| Extension::bytes(code, bs).with_level(level))
    })
}

/// arbitrary tuple or list extension with children drawn from `inner`
pub fn arb_values_ext(inner: BoxedStrategy<Value>) -> impl Strategy<Value = Extension> {
    arb_header(0xA0..=0xFE).prop_flat_map(move |(level, code)| {
        let len = match shape(code) {
            Some(Shape::Tuple(n)) => n..=n,
            _ => 0..=6,
        };
        prop::collection::vec(inner.clone(), len)
            .prop_map(move |vs| Extension::values(code, vs).with_level(level))
    })
}

/// arbitrary scalar value (no children) for use with proptest
pub fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_inum().prop_map(Value::Integer),
        any::<bool>().prop_map(Value::Boolean),
        arb_float().prop_map(Value::Float),
        arb_text().prop_map(Value::Text),
        arb_byte_ext().prop_map(Value::Extension),
    ]
}

/// arbitrary BONE value for use with proptest
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(
        6,  // max depth
        48, // max nodes
        8,  // max items per collection
        |inner| {
            prop_oneof![
                arb_values_ext(inner.clone()).prop_map(Value::Extension),
                prop::collection::vec(inner, 0..8).prop_map(Value::list),
            ]
        },
    )
}

/// arbitrary sequence of BONE values for use with proptest
pub fn arb_values() -> impl Strategy<Value = Vec<Value>> { prop::collection::vec(arb_value(), 0..6) }
