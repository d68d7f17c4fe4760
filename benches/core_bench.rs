use criterion::{black_box, criterion_group, criterion_main, Criterion};
use llcore::digest::digest_residue;
use llcore::exponent::is_prime_exponent;
use llcore::reduce::MersenneReducer;
use llcore::{ll_test, LlConfig};
use rug::Integer;

fn bench_ll_m521(c: &mut Criterion) {
    let cfg = LlConfig::new(521).without_progress();
    c.bench_function("ll_test(M521)", |b| {
        b.iter(|| ll_test(black_box(&cfg)).unwrap());
    });
}

fn bench_ll_m4423_progress(c: &mut Criterion) {
    let cfg = LlConfig::new(4423);
    let mut group = c.benchmark_group("ll_test(M4423)");
    group.sample_size(10);
    group.bench_function("auto stride", |b| {
        b.iter(|| llcore::ll_test_with_progress(black_box(&cfg), |_, d| {
            black_box(d);
            Ok(())
        })
        .unwrap());
    });
    group.finish();
}

fn bench_reduce_m9689(c: &mut Criterion) {
    let mut red = MersenneReducer::new(9689);
    let s = Integer::from(red.modulus() - 12345u32);
    let square = Integer::from(s.square_ref()) - 2u32;
    let mut x = Integer::new();
    c.bench_function("reduce(M9689)", |b| {
        b.iter(|| {
            x.clone_from(&square);
            red.reduce(black_box(&mut x));
        });
    });
}

fn bench_digest_m9689(c: &mut Criterion) {
    let red = MersenneReducer::new(9689);
    let s = Integer::from(red.modulus() - 12345u32);
    c.bench_function("digest_residue(9689 bits)", |b| {
        b.iter(|| digest_residue(black_box(&s)));
    });
}

fn bench_exponent_checker(c: &mut Criterion) {
    c.bench_function("is_prime_exponent(4294967291)", |b| {
        b.iter(|| is_prime_exponent(black_box(4_294_967_291)));
    });
}

criterion_group!(
    benches,
    bench_ll_m521,
    bench_ll_m4423_progress,
    bench_reduce_m9689,
    bench_digest_m9689,
    bench_exponent_checker,
);
criterion_main!(benches);
