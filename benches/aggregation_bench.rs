use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sweep_runner::models::MetricsMap;
use sweep_runner::parser::LogParser;
use sweep_runner::stats::{aggregate, online_variance};

fn sample_results(experiments: usize, iterations: usize) -> Vec<(String, MetricsMap)> {
    let mut results = Vec::with_capacity(experiments * iterations);
    for it in 0..iterations {
        for e in 0..experiments {
            let time = 1.0 + (e * 7 + it * 13 % 17) as f64 * 0.01;
            let mut metrics = MetricsMap::new();
            metrics.insert("time".to_string(), time);
            metrics.insert("tsig".to_string(), time * 0.6);
            metrics.insert("tref".to_string(), time * 0.3);
            results.push((format!("model{e}-fr-{}", 1 << (e % 7)), metrics));
        }
    }
    results
}

fn bench_aggregate(c: &mut Criterion) {
    let results = sample_results(200, 50);
    c.bench_function("aggregate_10k_trials", |b| {
        b.iter(|| aggregate(black_box(&results)));
    });

    let values: Vec<f64> = (0..100_000).map(|i| 1.0e9 + (i % 97) as f64).collect();
    c.bench_function("online_variance_100k", |b| {
        b.iter(|| online_variance(black_box(values.iter().copied())));
    });
}

fn bench_parse(c: &mut Criterion) {
    let log = "\
Loading model...\n\
Time needed for signature computation: 1.25\n\
Time needed for partition refinement: 0.75\n\
Time for computing the bisimulation relation: 2.10\n\
Time for computing the quotient of the transition relation: 0.40\n\
New Markov transition relation: 1,000 transitions, 2,345 MTBDD nodes\n";
    c.bench_function("parse_mc_log", |b| {
        b.iter(|| LogParser::Mc.parse(black_box(log)));
    });
}

criterion_group!(benches, bench_aggregate, bench_parse);
criterion_main!(benches);
