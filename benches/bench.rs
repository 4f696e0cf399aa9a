use std::{
    fs::File,
    io::{BufRead, BufReader},
    time::Duration,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use moving_median::{
    reference::{NaiveMovingMedian, TreeMovingMedian},
    HeapMovingMedian, MovingMedian,
};

fn run<M: MovingMedian>(mut estimator: M, data: &[f64]) -> f64 {
    for v in data.iter() {
        estimator.update(*v);
    }

    estimator.median().unwrap_or_default()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut data = Vec::with_capacity(2000);
    let f = BufReader::new(File::open("./test_data/2000_values.txt").unwrap());

    for line in f.lines() {
        let v: f64 = line.unwrap().parse().unwrap();
        data.push(v);
    }

    let mut group = c.benchmark_group("benches");
    group
        .measurement_time(Duration::from_secs_f32(10.))
        .sample_size(200);

    for window in [4, 64, 512] {
        group.bench_with_input(BenchmarkId::new("naive", window), &window, |b, &w| {
            b.iter(|| run(NaiveMovingMedian::new(w).unwrap(), &data))
        });

        group.bench_with_input(BenchmarkId::new("tree", window), &window, |b, &w| {
            b.iter(|| run(TreeMovingMedian::new(w).unwrap(), &data))
        });

        group.bench_with_input(BenchmarkId::new("heap", window), &window, |b, &w| {
            b.iter(|| run(HeapMovingMedian::new(w).unwrap(), &data))
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
