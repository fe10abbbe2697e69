//! Field element benchmarks over the secp256k1 prime

use bignum256::{FieldElement, InverseFast, InverseSlow, InversionStrategy, primes::SECP256K1_P};
use criterion::{
    BenchmarkGroup, Criterion, criterion_group, criterion_main, measurement::Measurement,
};
use hex_literal::hex;
use std::hint::black_box;

fn test_field_element_x() -> FieldElement {
    FieldElement::read_be(&hex!(
        "bb488aef416a41d7680d1cf01d70f59b60d7f5f77e30e78b8bf9d2d882f156a6"
    ))
}

fn test_field_element_y() -> FieldElement {
    FieldElement::read_be(&hex!(
        "67e2f68071ed8281e8aed6bcf1c5207c5e633722d920afd6ae22d06eeb8035e3"
    ))
}

fn bench_field_element_normalize<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_field_element_x();
    group.bench_function("normalize", |b| b.iter(|| black_box(x).normalize()));
}

fn bench_field_element_mul<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_field_element_x();
    let y = test_field_element_y();
    group.bench_function("multiply", |b| {
        b.iter(|| black_box(x).multiply(&black_box(y), &SECP256K1_P))
    });
}

fn bench_field_element_reduce<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_field_element_x();
    group.bench_function("fast_mod + mod_p", |b| {
        b.iter(|| black_box(x).fast_mod(&SECP256K1_P).mod_p(&SECP256K1_P))
    });
}

fn bench_field_element_sqrt<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_field_element_x();
    group.bench_function("sqrt", |b| b.iter(|| black_box(x).sqrt(&SECP256K1_P)));
}

fn bench_field_element_invert<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_field_element_x();
    group.bench_function("invert (slow)", |b| {
        b.iter(|| InverseSlow::invert(&black_box(x), &SECP256K1_P))
    });
    group.bench_function("invert (fast)", |b| {
        b.iter(|| InverseFast::invert(&black_box(x), &SECP256K1_P))
    });
}

fn bench_field_element(c: &mut Criterion) {
    let mut group = c.benchmark_group("field element operations");
    bench_field_element_normalize(&mut group);
    bench_field_element_mul(&mut group);
    bench_field_element_reduce(&mut group);
    bench_field_element_invert(&mut group);
    bench_field_element_sqrt(&mut group);
    group.finish();
}

criterion_group!(benches, bench_field_element);
criterion_main!(benches);
