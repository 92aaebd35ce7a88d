use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use inertial_mass::pipeline::{InertialMassPipeline, PipelineInput, PipelineSettings, RawMeasurement};
use inertial_mass::position::AnnotationSet;
use inertial_mass::synthetic::SyntheticCantilever;

/// Single baseline fit at increasing sweep resolution
fn bench_baseline_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("baseline_fit");

    for points in [101, 401, 1601] {
        let cantilever = SyntheticCantilever {
            points,
            ..Default::default()
        };
        let baseline = cantilever.baseline(cantilever.f_no_cell).unwrap();
        let pipeline = InertialMassPipeline::new(PipelineSettings {
            fit: cantilever.fit_settings(),
            ..Default::default()
        })
        .unwrap();

        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(BenchmarkId::from_parameter(points), &baseline, |b, baseline| {
            b.iter(|| pipeline.fit_baseline("without cell", black_box(baseline)).unwrap());
        });
    }

    group.finish();
}

/// Full sweep-mode run: one fit per sweep
fn bench_sweep_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_run");
    group.sample_size(20);

    let cantilever = SyntheticCantilever::default();
    let settings = PipelineSettings {
        fit: cantilever.fit_settings(),
        rolling_window: 10,
        ..Default::default()
    };
    let pipeline = InertialMassPipeline::new(settings).unwrap();

    for n_sweeps in [50, 200] {
        let centers: Vec<f64> = (0..n_sweeps).map(|i| 71.9 - 1e-3 * i as f64).collect();
        let input = PipelineInput {
            baseline_no_cell: cantilever.baseline(cantilever.f_no_cell).unwrap(),
            baseline_with_cell: cantilever.baseline(cantilever.f_with_cell).unwrap(),
            measurement: RawMeasurement::Sweep(cantilever.sweep_table(&centers, 0.0, 30.0)),
            annotations: AnnotationSet::default(),
        };

        group.throughput(Throughput::Elements(n_sweeps as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}sweeps", n_sweeps)),
            &input,
            |b, input| {
                b.iter(|| pipeline.run(black_box(input)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_baseline_fit, bench_sweep_run);
criterion_main!(benches);
