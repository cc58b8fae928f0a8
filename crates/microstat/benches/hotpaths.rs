use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use microstat::{PathMode, WindowOptions, label_default, lineal_path, s2, w2c_auto};
use ndarray::{ArrayD, IxDyn};
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

fn random_binary(n: usize, seed: u64) -> ArrayD<i32> {
    let mut my_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let dist = Uniform::try_from(0.0..1.0).unwrap();
    ArrayD::from_shape_simple_fn(IxDyn(&[n, n, n]), || (dist.sample(&mut my_rng) < 0.4) as i32)
}

fn criterion_benchmark(c: &mut Criterion) {
    let roi = [7, 7, 7];
    let mut group = c.benchmark_group("3d");
    for n in [16usize, 24, 32] {
        let image = random_binary(n, 2525365464_u64);
        group.throughput(Throughput::Elements((n as u64).pow(3)));

        group.bench_with_input(BenchmarkId::new("S2", n), &image, |b, image| {
            b.iter(|| s2(image.view(), image.view(), &roi, None, None, WindowOptions::default()))
        });
        group.bench_with_input(BenchmarkId::new("clusters", n), &image, |b, image| {
            b.iter(|| label_default(image.view(), 0, true))
        });
        group.bench_with_input(BenchmarkId::new("L", n), &image, |b, image| {
            b.iter(|| lineal_path(image.view(), &roi, PathMode::Bresenham, true))
        });
        group.bench_with_input(BenchmarkId::new("W2c", n), &image, |b, image| {
            b.iter(|| w2c_auto(image.view(), image.view(), &roi, None, PathMode::Actual, true))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
