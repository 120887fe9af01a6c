#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use bone::prelude::*;

const N_BIG_LIST: usize = 2000;

fn big_list() -> Value {
    let v: Vec<Value> = (0..N_BIG_LIST).map(|i| Value::from(i as i64)).collect();
    Value::list(v)
}

const N_LIST: usize = 10;
const N_PAIRS: usize = 10;

/// A list of lists of `(key, list)` pairs.
fn big_v() -> Value {
    let v0: Vec<Value> = (0..N_LIST).map(|i| Value::from(i as i64)).collect();
    let pairs: Vec<Value> = (0..N_PAIRS)
        .map(|i| (format!("key\0{}", i), v0.clone()).into_bone())
        .collect();
    let v: Vec<Value> = std::iter::repeat(Value::list(pairs)).take(N_LIST).collect();
    Value::list(v)
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function(
        &format!("Creating a BONE value of size {}", encode(&[big_v()]).unwrap().len()),
        |b| b.iter(|| black_box(big_v())),
    );
}

fn bench_enc(c: &mut Criterion) {
    let big_v = [big_v()];
    let enc_len = encode(&big_v).unwrap().len();
    c.bench_function(
        &format!("Encoding a BONE value, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode(black_box(&big_v)).unwrap()),
    );
}

fn bench_enc_single_alloc(c: &mut Criterion) {
    let big_v = [big_v()];
    let enc_len = encode(&big_v).unwrap().len();
    c.bench_function(
        &format!("Encoding a BONE value, output size of {} bytes, buffer preallocated", enc_len),
        move |b| {
            b.iter(|| {
                let mut out = Vec::with_capacity(enc_len * 2);
                encode_into(black_box(&big_v), &mut out, NoExt).unwrap();
                out
            })
        },
    );
}

fn bench_dec(c: &mut Criterion) {
    let enc = encode(&[big_v()]).unwrap();
    c.bench_function(
        &format!("Decoding a BONE value, input size of {} bytes", enc.len()),
        move |b| b.iter(|| decode(black_box(&enc)).unwrap()),
    );
}

fn bench_enc_flat(c: &mut Criterion) {
    let big_list = [big_list()];
    let enc_len = encode(&big_list).unwrap().len();
    c.bench_function(
        &format!("Encoding a BONE list, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode(black_box(&big_list)).unwrap()),
    );
}

fn bench_dec_flat(c: &mut Criterion) {
    let enc = encode(&[big_list()]).unwrap();
    c.bench_function(
        &format!("Decoding a BONE list of length {}", enc.len()),
        move |b| b.iter(|| decode(black_box(&enc)).unwrap()),
    );
}

fn bench_compare(c: &mut Criterion) {
    let a = big_v();
    let mut b_val = big_v();
    if let Value::Extension(Extension {
        payload: Payload::Values(vs),
        ..
    }) = &mut b_val
    {
        vs.push(Value::from(true));
    }
    c.bench_function("Comparing two BONE values differing at the end", move |b| {
        b.iter(|| compare(black_box(&a), black_box(&b_val)))
    });
}

criterion_group!(
    benches,
    bench_construction,
    bench_enc,
    bench_enc_single_alloc,
    bench_dec,
    bench_enc_flat,
    bench_dec_flat,
    bench_compare
);
criterion_main!(benches);
