use bone::prelude::*;
use bone_strategy::*;
use proptest::prelude::*;
use std::cmp::Ordering;

fn enc(v: &Value) -> Vec<u8> { encode(&[v.clone()]).unwrap() }

fn block(code: u8, bytes: &[u8]) -> Value { Extension::bytes(code, bytes.to_vec()).into() }

fn ext(code: u8, level: u64, values: Vec<Value>) -> Value {
    Extension::values(code, values).with_level(level).into()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 2_000, ..ProptestConfig::default() })]

    #[test]
    fn compare_mirrors_bytes(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(compare(&a, &b), enc(&a).cmp(&enc(&b)), "{} vs {}", a, b);
    }

    #[test]
    fn texts_sort_like_bytes(a in arb_text(), b in arb_text()) {
        let (va, vb) = (Value::from(a.clone()), Value::from(b.clone()));
        prop_assert_eq!(compare(&va, &vb), a.as_bytes().cmp(b.as_bytes()));
        prop_assert_eq!(enc(&va).cmp(&enc(&vb)), a.as_bytes().cmp(b.as_bytes()));
    }

    #[test]
    fn integers_sort_numerically(a in arb_inum(), b in arb_inum()) {
        let (va, vb) = (Value::Integer(a.clone()), Value::Integer(b.clone()));
        prop_assert_eq!(enc(&va).cmp(&enc(&vb)), a.cmp(&b));
    }

    #[test]
    fn floats_sort_numerically(a in arb_float(), b in arb_float()) {
        let (va, vb) = (Value::Float(a), Value::Float(b));
        prop_assert_eq!(enc(&va).cmp(&enc(&vb)), a.to_f64().total_cmp(&b.to_f64()));
    }

    #[test]
    fn sort_is_idempotent(mut vs in prop::collection::vec(arb_value(), 0..16)) {
        vs.sort();

        let mut encoded: Vec<Vec<u8>> = vs.iter().map(enc).collect();
        let before = encoded.clone();
        encoded.sort();
        prop_assert_eq!(&encoded, &before);

        let decoded: Vec<Value> = encoded.iter().map(|e| decode(e).unwrap().remove(0)).collect();
        prop_assert_eq!(decoded, vs);
    }
}

#[test]
fn order_examples() {
    let max = u64::max_value();
    let sorted: Vec<Value> = vec![
        // integers
        Value::from(-i128::from(max)),
        Value::from(-255),
        Value::from(-255),
        Value::from(0),
        Value::from(1),
        Value::from(2),
        Value::from(100),
        Value::from(100),
        Value::from(max),
        // booleans
        false.into(),
        true.into(),
        // 3-byte blocks
        block(0x50, &[1, 2, 3]),
        block(0x50, &[1, 2, 4]),
        block(0x50, &[100, 0, 0]),
        // floats
        std::f64::NEG_INFINITY.into(),
        (-0.5).into(),
        (-1e-10).into(),
        1.234.into(),
        std::f64::INFINITY.into(),
        // text
        "".into(),
        "100".into(),
        "BONE".into(),
        // one-tuples
        ext(0xA0, 0, vec![1.into()]),
        ext(0xA0, 0, vec![2.into()]),
        ext(0xA0, 0, vec![100.into()]),
        // lists
        ext(0xFE, 0, vec![100.into()]),
        ext(0xFE, 0, vec![false.into(), ext(0xFE, 2, vec![])]),
        ext(0xFE, 0, vec![false.into(), ext(0xFE, 2, vec![1.into()])]),
        // level 1
        Extension::bytes(0x50, vec![1, 2, 3]).with_level(1).into(),
        ext(0xA0, 1, vec![1.into()]),
        ext(0xFE, 1, vec![1.into()]),
        // level 2
        Extension::bytes(0x50, vec![1, 0, 0]).with_level(2).into(),
    ];

    for (i, a) in sorted.iter().enumerate() {
        for (j, b) in sorted.iter().enumerate() {
            let by_value = compare(a, b);
            let by_bytes = enc(a).cmp(&enc(b));
            assert_eq!(by_value, by_bytes, "{} vs {}", a, b);
            if i < j {
                assert_ne!(by_value, Ordering::Greater, "{} vs {}", a, b);
            }
        }
    }

    let mut shuffled = sorted.clone();
    shuffled.reverse();
    shuffled.sort();
    assert_eq!(shuffled, sorted);
}

#[test]
fn escaped_nul_depends_on_context() {
    let a: Value = Value::list(vec!["a".into(), 5.into()]);
    let b: Value = Value::list(vec!["a\0".into()]);
    assert_eq!(enc(&a).cmp(&enc(&b)), Ordering::Greater);
    assert_eq!(compare(&a, &b), Ordering::Greater);

    let a: Value = Value::list(vec!["a".into()]);
    assert_eq!(enc(&a).cmp(&enc(&b)), Ordering::Less);
    assert_eq!(compare(&a, &b), Ordering::Less);
}
