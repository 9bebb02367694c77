pub mod builder;

pub use builder::{
    build_histograms, build_histograms_parallel, collapsed_context, merge_histograms,
    HistogramBuilder,
};

use mem_dbg::{MemDbg, MemSize};

use crate::HISTOGRAM_ROUNDING;

/// The frequencies of the buckets observed in one context.
///
/// The table grows in chunks of [`HISTOGRAM_ROUNDING`] slots and never shrinks.
#[derive(Clone, Debug, Default, PartialEq, Eq, MemDbg, MemSize)]
pub struct Histogram {
    counts: Vec<u32>,
    total_count: u64,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a histogram with the given counts, e.g. a static distribution.
    pub fn from_counts(counts: &[u32]) -> Self {
        let mut histogram = Self::default();
        histogram.ensure_len(counts.len());
        histogram.counts[..counts.len()].copy_from_slice(counts);
        histogram.total_count = counts.iter().map(|count| *count as u64).sum();
        histogram
    }

    /// Grows the table so that it has at least `len` slots.
    fn ensure_len(&mut self, len: usize) {
        if len > self.counts.len() {
            let rounded = len.div_ceil(HISTOGRAM_ROUNDING) * HISTOGRAM_ROUNDING;
            self.counts.resize(rounded, 0);
        }
    }

    /// Counts one more occurrence of `bucket`.
    #[inline]
    pub fn add(&mut self, bucket: u32) {
        let bucket = bucket as usize;
        self.ensure_len(bucket + 1);
        self.counts[bucket] += 1;
        self.total_count += 1;
    }

    /// Adds the counts of `other` to this histogram.
    pub fn merge(&mut self, other: &Histogram) {
        self.ensure_len(other.counts.len());
        for (count, other_count) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += other_count;
        }
        self.total_count += other.total_count;
    }

    /// Zeroes every count, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.counts.fill(0);
        self.total_count = 0;
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// The number of buckets with a nonzero count.
    pub fn live_symbols(&self) -> usize {
        self.counts.iter().filter(|count| **count > 0).count()
    }

    /// The number of symbols a code for this histogram has to describe: the last live bucket
    /// plus one. An empty histogram is described as a single-symbol alphabet.
    pub fn alphabet_size(&self) -> usize {
        self.counts
            .iter()
            .rposition(|count| *count > 0)
            .map_or(1, |last| last + 1)
    }
}
