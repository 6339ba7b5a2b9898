use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use survkit::{Outcome, Surv, build_survival_tree_array, check_y_survival};

fn random_outcome(n: usize) -> Outcome {
    let mut rng = StdRng::seed_from_u64(0x5EED_F64 + n as u64);
    let event: Array1<bool> = Array1::from_shape_fn(n, |_| rng.gen_bool(0.3));
    // Whole days so event times repeat like registry data.
    let time: Array1<f64> = Array1::from_shape_fn(n, |_| rng.gen_range(1..3650) as f64);
    let entry: Array1<f64> = time.mapv(|t| (t * 0.1).floor());
    Surv::from_arrays(event, time, None, None)
        .and_then(|outcome| outcome.with_entry(entry, None))
        .expect("random outcome")
}

fn benchmark_outcome(c: &mut Criterion) {
    let sizes = [1_000_usize, 10_000, 100_000];
    let inputs: Vec<_> = sizes
        .iter()
        .map(|&n| (n, Array2::<f64>::zeros((n, 4)), random_outcome(n)))
        .collect();

    let mut group = c.benchmark_group("survival_outcome");
    for (n, x, y) in inputs.iter() {
        group.throughput(Throughput::Elements(*n as u64));

        group.bench_with_input(BenchmarkId::new("check_y", n), y, |b, y| {
            b.iter(|| {
                let checked = check_y_survival(black_box(y), false).expect("valid outcome");
                black_box(checked);
            });
        });

        group.bench_with_input(BenchmarkId::new("tree_array", n), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let arrays =
                    build_survival_tree_array(black_box(*x), black_box(*y), true).expect("arrays");
                black_box(arrays);
            });
        });
    }
    group.finish();
}

criterion_group!(survival_outcome, benchmark_outcome);
criterion_main!(survival_outcome);
