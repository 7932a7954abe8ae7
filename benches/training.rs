use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tourboost::training::{BoostParams, Booster, DMatrix, FeatureMatrix, XGBoostBooster};

fn create_classification_data(n_rows: usize, n_features: usize) -> DMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 10.0);
    // Label depends on the first two features plus noise
    let y = Array1::from_shape_fn(n_rows, |i| {
        let score = x[[i, 0]] + x[[i, 1]] + rng.gen::<f64>() * 2.0;
        if score > 11.0 { 1.0 } else { 0.0 }
    });

    let names = (0..n_features).map(|i| format!("feature_{}", i)).collect();
    DMatrix::with_label(FeatureMatrix::new(names, x).unwrap(), y).unwrap()
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10); // Fewer samples for training benchmarks

    let params = BoostParams::default();
    for n_rows in [1000, 5000, 10000].iter() {
        let data = create_classification_data(*n_rows, 20);

        group.bench_with_input(BenchmarkId::new("train_50_rounds", n_rows), &data, |b, d| {
            b.iter(|| {
                XGBoostBooster::new()
                    .train(&params, black_box(d), 50, &[], None, 3)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    // Train model once
    let booster = XGBoostBooster::new();
    let train = create_classification_data(5000, 20);
    let model = booster.train(&BoostParams::default(), &train, 100, &[], None, 3).unwrap();

    for n_rows in [100, 1000, 10000].iter() {
        let test = DMatrix::new(create_classification_data(*n_rows, 20).features().clone());

        group.bench_with_input(BenchmarkId::new("predict", n_rows), &test, |b, d| {
            b.iter(|| booster.predict(&model, black_box(d)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
