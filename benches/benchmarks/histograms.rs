use criterion::{criterion_group, Criterion};
use jxl_entropy::histogram::{build_histograms, build_histograms_parallel, merge_histograms};
use jxl_entropy::token::HybridUintConfig;
use pprof::criterion::{Output, PProfProfiler};

use crate::benchmarks::{get_tokens, NUM_CONTEXTS};

fn histograms_bench(c: &mut Criterion) {
    let tokens = get_tokens(0);
    let chunks = tokens.chunks(tokens.len() / 8).collect::<Vec<_>>();
    let config = HybridUintConfig::default();

    let mut group = c.benchmark_group("histograms");
    group.bench_function("sequential", |b| {
        b.iter(|| build_histograms(&tokens, NUM_CONTEXTS as usize, None, config))
    });
    group.bench_function("parallel", |b| {
        b.iter(|| {
            merge_histograms(build_histograms_parallel(
                &chunks,
                NUM_CONTEXTS as usize,
                None,
                config,
            ))
        })
    });
    group.finish();
}

criterion_group! {
    name = histogram_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = histograms_bench
}
