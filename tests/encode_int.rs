use bone::prelude::*;
use proptest::prelude::*;

fn ints(enc: &[u8]) -> Vec<Inum> {
    decode(enc)
        .unwrap()
        .into_iter()
        .map(|v| v.as_inum().unwrap().clone())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode_small(i in proptest::num::i64::ANY) {
        let enc = encode(&[Value::from(i)]).unwrap();

        let dec = ints(&enc);

        if dec != vec![Inum::from(i)] {
            panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", i, enc, dec)
        }
    }

    #[test]
    fn encode_decode_u64(i in proptest::num::u64::ANY, neg in any::<bool>()) {
        let n = Inum::from_sign_magnitude(neg, i);
        let enc = encode(&[Value::Integer(n.clone())]).unwrap();
        prop_assert_eq!(ints(&enc), vec![n]);
    }

    #[test]
    fn shortest_form(i in proptest::num::u64::ANY) {
        let enc = encode(&[Value::from(i)]).unwrap();
        let expected = if i < 8 { 1 } else { 1 + (8 - i.leading_zeros() as usize / 8) };
        prop_assert_eq!(enc.len(), expected);
    }
}

#[test]
fn boundaries() {
    let max = i128::from(u64::max_value());
    let cases: Vec<(i128, Vec<u8>)> = vec![
        (0, vec![0x10]),
        (7, vec![0x17]),
        (8, vec![0x18, 0x08]),
        (255, vec![0x18, 0xFF]),
        (256, vec![0x19, 0x01, 0x00]),
        (-1, vec![0x0F, 0xFE]),
        (-255, vec![0x0F, 0x00]),
        (-256, vec![0x0E, 0xFE, 0xFF]),
        (max, vec![0x1F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
        (-max, vec![0x08, 0, 0, 0, 0, 0, 0, 0, 0]),
    ];
    for (n, bytes) in cases {
        assert_eq!(encode(&[Value::from(n)]).unwrap(), bytes, "{}", n);
        assert_eq!(ints(&bytes), vec![Inum::from(n)]);
    }
}

#[test]
fn out_of_range() {
    let max = i128::from(u64::max_value());
    for n in &[max + 1, -max - 1, i128::max_value(), i128::min_value()] {
        match encode(&[Value::from(*n)]) {
            Err(Error::IntegerOutOfRange { value }) => assert_eq!(value, BigInt::from(*n)),
            other => panic!("expected IntegerOutOfRange for {}, got {:?}", n, other),
        }
    }
}
