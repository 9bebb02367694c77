use criterion::{criterion_group, BatchSize, Criterion};
use jxl_entropy::bit_writer::VecBitWriter;
use jxl_entropy::entropy_code::{build_entropy_codes, encode_units, write_tokens};
use jxl_entropy::histogram::build_histograms;
use jxl_entropy::params::EntropyParams;
use pprof::criterion::{Output, PProfProfiler};

use crate::benchmarks::{get_tokens, NUM_CONTEXTS};

fn writer_bench(c: &mut Criterion) {
    let tokens = get_tokens(2);
    let num_contexts = NUM_CONTEXTS as usize;

    let mut group = c.benchmark_group("writer");
    group.sample_size(20);

    for params in [
        EntropyParams::default(),
        EntropyParams::default().with_prefix_code(true),
    ] {
        let histograms = build_histograms(&tokens, num_contexts, None, params.uint_config);
        let codes = build_entropy_codes(&histograms, &params).unwrap();
        let name = if params.use_prefix_code { "prefix tokens" } else { "rank tokens" };

        group.bench_function(name, |b| {
            b.iter_batched(
                || VecBitWriter::with_capacity(tokens.len()),
                |mut writer| {
                    write_tokens(&tokens, &codes, None, &mut writer).unwrap();
                    writer
                },
                BatchSize::SmallInput,
            )
        });
    }

    let units = tokens.chunks(tokens.len() / 8).collect::<Vec<_>>();
    group.bench_function("parallel units", |b| {
        b.iter(|| encode_units(&units, num_contexts, None, &EntropyParams::default()).unwrap())
    });
    group.finish();
}

criterion_group! {
    name = writer_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = writer_bench
}
