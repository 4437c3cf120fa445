use chirpfit::{
    experiment::{Experiment, ExperimentConfig},
    quadrature::{integrate, QuadratureOptions},
    signal::Chirp,
    ChebyshevFit,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::{f64::consts::PI, hint::black_box};

struct CriterionTestEntry<V> {
    id: String,
    values: V,
}
impl<V> CriterionTestEntry<V> {
    pub fn new(id: &str, values: V) -> Self {
        Self {
            id: id.to_string(),
            values,
        }
    }
}

fn criterion_group_over<F, V>(c: &mut Criterion, id: &str, samples: &[CriterionTestEntry<V>], runner: F)
where
    for<'a, 'b, 'c> F: Fn(&'a mut criterion::Bencher<'b>, &'c V),
{
    let mut group = c.benchmark_group(id);
    for sample in samples {
        group.bench_with_input(&sample.id, &sample.values, &runner);
    }
    group.finish();
}

fn criterion_benchmark(c: &mut Criterion) {
    let samples = Chirp::default()
        .sample(0.0..=10.0, 100)
        .expect("Failed to sample chirp");

    //
    // Fitting cost at each degree of the default run
    println!("Benchmarking fit vs degree (n=100)...");
    criterion_group_over(
        c,
        "fit_vs_degree",
        &[
            CriterionTestEntry::new("Degree=20", 20),
            CriterionTestEntry::new("Degree=45", 45),
            CriterionTestEntry::new("Degree=115", 115),
        ],
        |b, &degree| {
            b.iter(|| ChebyshevFit::new(black_box(&samples), degree).expect("Failed to fit data"));
        },
    );

    //
    // Quadrature over [0, π] for the same fits
    println!("Benchmarking quadrature vs degree...");
    let fits: Vec<_> = [20, 45, 115]
        .into_iter()
        .map(|d| ChebyshevFit::new(&samples, d).expect("Failed to fit data"))
        .collect();
    let options = QuadratureOptions::default();
    criterion_group_over(
        c,
        "integrate_vs_degree",
        &[
            CriterionTestEntry::new("Degree=20", &fits[0]),
            CriterionTestEntry::new("Degree=45", &fits[1]),
            CriterionTestEntry::new("Degree=115", &fits[2]),
        ],
        |b, fit| {
            b.iter(|| {
                integrate(|x| fit.as_polynomial().y(x), 0.0, black_box(PI), &options)
                    .expect("Failed to integrate")
            });
        },
    );

    //
    // The whole default run
    println!("Benchmarking the default pipeline...");
    let config = ExperimentConfig::default();
    c.bench_function("pipeline", |b| {
        b.iter(|| Experiment::run(black_box(&config)).expect("Failed to run"));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
