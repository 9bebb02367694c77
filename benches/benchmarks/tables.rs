use criterion::{criterion_group, Criterion};
use jxl_entropy::entropy_code::build_entropy_codes;
use jxl_entropy::histogram::build_histograms;
use jxl_entropy::params::EntropyParams;
use jxl_entropy::prefix::extender::extend_prefix_codes;
use jxl_entropy::prefix::static_codes::PrefixCodeFamily;
use jxl_entropy::token::HybridUintConfig;
use pprof::criterion::{Output, PProfProfiler};

use crate::benchmarks::{get_tokens, NUM_CONTEXTS};

fn tables_bench(c: &mut Criterion) {
    let tokens = get_tokens(1);
    let histograms = build_histograms(
        &tokens,
        NUM_CONTEXTS as usize,
        None,
        HybridUintConfig::default(),
    );
    let rank = EntropyParams::default();
    let prefix = rank.with_prefix_code(true);
    let dc_codes = PrefixCodeFamily::Dc.codes();

    let mut group = c.benchmark_group("tables");
    group.bench_function("rank", |b| {
        b.iter(|| build_entropy_codes(&histograms, &rank).unwrap())
    });
    group.bench_function("prefix", |b| {
        b.iter(|| build_entropy_codes(&histograms, &prefix).unwrap())
    });
    group.bench_function("extend DC", |b| {
        b.iter(|| extend_prefix_codes(&dc_codes, 32).unwrap())
    });
    group.finish();
}

criterion_group! {
    name = table_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = tables_bench
}
