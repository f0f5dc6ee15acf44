use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use chrome_guard::devtools::estimator::TabWork;
use chrome_guard::devtools::normalize_shares;
use chrome_guard::system::process::{ProcessRole, ProcessSample, aggregate, classify};

fn make_tabs(n: usize) -> Vec<TabWork> {
    (0..n)
        .map(|i| TabWork {
            title: format!("tab_{i}"),
            url: format!("https://t{i}.example.com/"),
            work: ((i * 37) % 101) as f64 / 10.0,
        })
        .collect()
}

fn make_samples(n: usize) -> Vec<ProcessSample> {
    (0..n)
        .map(|i| ProcessSample {
            pid: i as u32 + 1,
            role: ProcessRole::TabRenderer,
            cpu_percent: ((i * 13) % 150) as f32,
            cmd_preview: format!("chrome --type=renderer --renderer-client-id={i}"),
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_10_100_500");
    for n in [10usize, 100, 500] {
        let tabs = make_tabs(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &tabs, |b, tabs| {
            b.iter(|| normalize_shares(black_box(tabs.clone())))
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_10_100_500");
    for n in [10usize, 100, 500] {
        let samples = make_samples(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &samples, |b, samples| {
            b.iter(|| aggregate(black_box(samples)).map(|(total, worst)| (total, worst.pid)))
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let commands = [
        "/opt/google/chrome/chrome --type=renderer --extension-process --lang=en-US",
        "/opt/google/chrome/chrome --type=gpu-process --field-trial-handle=3",
        "/opt/google/chrome/chrome --remote-debugging-port=9222",
    ];
    c.bench_function("classify_roles", |b| {
        b.iter(|| {
            for cmd in commands {
                black_box(classify(black_box(cmd)));
            }
        })
    });
}

criterion_group!(benches, bench_normalize, bench_aggregate, bench_classify);
criterion_main!(benches);
