use log::debug;
use rayon::prelude::*;

use crate::histogram::Histogram;
use crate::token::{HybridUintConfig, Token};
use crate::traits::folding::Fold;

/// Returns the index of the histogram governing `context`.
///
/// # Panics
/// If `context` is not smaller than `num_contexts`.
#[inline]
pub fn collapsed_context(context_map: Option<&[u8]>, num_contexts: usize, context: u32) -> usize {
    let context = context as usize;
    assert!(
        context < num_contexts,
        "context {} out of range, only {} contexts are configured",
        context,
        num_contexts
    );
    match context_map {
        Some(map) => map[context] as usize,
        None => context,
    }
}

/// Number of histograms needed to serve `num_contexts` raw contexts.
fn histograms_count(context_map: Option<&[u8]>, num_contexts: usize) -> usize {
    match context_map {
        Some(map) => {
            assert_eq!(
                map.len(),
                num_contexts,
                "the context map must have one entry per context"
            );
            map.iter().max().map_or(1, |max| *max as usize + 1)
        }
        None => num_contexts,
    }
}

/// Routes the buckets of the tokens of one encoding unit to the histograms of their contexts.
pub struct HistogramBuilder<'a> {
    histograms: Vec<Histogram>,
    context_map: Option<&'a [u8]>,
    num_contexts: usize,
    uint_config: HybridUintConfig,
}

impl<'a> HistogramBuilder<'a> {
    /// Creates a builder for `num_contexts` raw contexts. When a context map is given, it must
    /// have one entry per raw context, and one histogram is kept for each collapsed context.
    pub fn new(
        num_contexts: usize,
        context_map: Option<&'a [u8]>,
        uint_config: HybridUintConfig,
    ) -> Self {
        Self {
            histograms: vec![Histogram::default(); histograms_count(context_map, num_contexts)],
            context_map,
            num_contexts,
            uint_config,
        }
    }

    /// Adds the bucket of `token` to the histogram of its context.
    ///
    /// # Panics
    /// If the context of the token is out of range.
    #[inline]
    pub fn add_token(&mut self, token: &Token) {
        let context = collapsed_context(self.context_map, self.num_contexts, token.context);
        let bucket = self.uint_config.fold(token.value).bucket;
        self.histograms[context].add(bucket);
    }

    pub fn add_tokens<'t>(&mut self, tokens: impl IntoIterator<Item = &'t Token>) {
        for token in tokens {
            self.add_token(token);
        }
    }

    pub fn histograms(&self) -> &[Histogram] {
        &self.histograms
    }

    pub fn build(self) -> Vec<Histogram> {
        self.histograms
    }
}

/// Builds the histograms of a single encoding unit.
pub fn build_histograms(
    tokens: &[Token],
    num_contexts: usize,
    context_map: Option<&[u8]>,
    uint_config: HybridUintConfig,
) -> Vec<Histogram> {
    let mut builder = HistogramBuilder::new(num_contexts, context_map, uint_config);
    builder.add_tokens(tokens);
    builder.build()
}

/// Builds the histograms of many independent encoding units at once, one worker per unit.
pub fn build_histograms_parallel<T: AsRef<[Token]> + Sync>(
    units: &[T],
    num_contexts: usize,
    context_map: Option<&[u8]>,
    uint_config: HybridUintConfig,
) -> Vec<Vec<Histogram>> {
    units
        .par_iter()
        .map(|tokens| build_histograms(tokens.as_ref(), num_contexts, context_map, uint_config))
        .collect()
}

/// Folds the partial histograms of several units into one histogram per context.
pub fn merge_histograms(partials: Vec<Vec<Histogram>>) -> Vec<Histogram> {
    let units = partials.len();
    let mut partials = partials.into_iter();
    let Some(mut merged) = partials.next() else {
        return Vec::new();
    };

    for unit in partials {
        if unit.len() > merged.len() {
            merged.resize(unit.len(), Histogram::default());
        }
        for (histogram, partial) in merged.iter_mut().zip(unit.iter()) {
            histogram.merge(partial);
        }
    }

    debug!(
        "Merged the histograms of {} units into {} contexts",
        units,
        merged.len()
    );
    merged
}
