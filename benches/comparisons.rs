#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use bone::prelude::*;

fn bone_i64_encode(c: &mut Criterion) {
    c.bench_function("BONE i64 encode", |b| {
        let v = [1_000_000i64.into_bone()];
        b.iter(|| encode(black_box(&v)))
    });
}

fn json_i64_encode(c: &mut Criterion) {
    c.bench_function("JSON i64 encode", |b| b.iter(|| serde_json::to_string(&black_box(1_000_000i64))));
}

fn bone_i64_decode(c: &mut Criterion) {
    c.bench_function("BONE i64 decode", |b| {
        let buf = encode(&[1_000_000i64.into_bone()]).unwrap();
        b.iter(|| decode(black_box(&buf)))
    });
}

fn json_i64_decode(c: &mut Criterion) {
    c.bench_function("JSON i64 decode", |b| {
        let s = serde_json::to_string(&1_000_000i64).unwrap();
        b.iter(|| serde_json::from_str::<i64>(black_box(&s)))
    });
}

fn bone_str_encode(c: &mut Criterion) {
    c.bench_function("BONE string encode", |b| {
        let s: Vec<u8> = (0..10_000).map(|x| x as u8).collect();
        let v = [Value::blob(s)];
        b.iter(|| encode(black_box(&v)))
    });
}

fn json_str_encode(c: &mut Criterion) {
    c.bench_function("JSON string encode", |b| {
        let s: Vec<u8> = (0..10_000).map(|x| x as u8).collect();
        b.iter(|| serde_json::to_string(&black_box(&s)))
    });
}

criterion_group!(
    benches,
    bone_i64_encode,
    json_i64_encode,
    bone_i64_decode,
    json_i64_decode,
    bone_str_encode,
    json_str_encode,
);

criterion_main!(benches);
