use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_validator::ValidationConfig;
use feature_engine::{ConvolutionMethod, FeatureAssembler, HealthIndicatorExtractor};

fn snapshot(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| (0.2 * i as f64).sin() + 0.1 * (1.7 * i as f64).cos())
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let signal = snapshot(32_768);

    for method in [ConvolutionMethod::Direct, ConvolutionMethod::Fft] {
        let extractor =
            HealthIndicatorExtractor::with_options(4.0, method, ValidationConfig::default())
                .unwrap();
        c.bench_function(&format!("health_indicator_32k_{:?}", method), |b| {
            b.iter(|| extractor.extract(black_box(&signal)).unwrap())
        });
    }
}

fn bench_assemble(c: &mut Criterion) {
    let assembler = FeatureAssembler::new(HealthIndicatorExtractor::new(4.0).unwrap(), 15);
    let window: Vec<Vec<f64>> = (0..15).map(|_| snapshot(2_048)).collect();

    c.bench_function("assemble_window_15x2048", |b| {
        b.iter(|| assembler.assemble(black_box(&window)).unwrap())
    });
}

criterion_group!(benches, bench_extract, bench_assemble);
criterion_main!(benches);
