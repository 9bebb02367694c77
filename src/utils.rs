use std::ops::Neg;

use crate::Freq;

#[inline(always)]
pub fn floor_log2_nonzero(value: u32) -> u32 {
    value.ilog2()
}

/// Ceiling of log2; 0 for 1.
#[inline(always)]
pub fn ceil_log2_nonzero(value: u32) -> u32 {
    let floor = value.ilog2();
    if value.is_power_of_two() {
        floor
    } else {
        floor + 1
    }
}

/// The shannon entropy, in bits per symbol, of the distribution given by `counts`.
pub fn entropy(counts: &[u32]) -> f64 {
    let total = counts.iter().map(|count| *count as f64).sum::<f64>();
    let mut entropy = 0.0;

    for count in counts.iter().filter(|count| **count > 0) {
        let pr = *count as f64 / total;
        entropy += pr * f64::log2(pr);
    }
    entropy.neg()
}

/// The number of bits needed to encode the symbols counted in `counts` with a rank table of
/// `2^log_precision` slots holding `freqs`, i.e. the cross entropy times the number of symbols.
///
/// ```text
/// cost = - ∑ count(x) * log(freq(x) / 2^log_precision)
/// ```
pub fn ans_cost(counts: &[u32], freqs: &[Freq], log_precision: usize) -> f64 {
    let precision = (1_u64 << log_precision) as f64;

    counts
        .iter()
        .zip(freqs.iter())
        .filter(|(count, _)| **count > 0)
        .map(|(count, freq)| {
            assert!(*freq > 0, "counted symbol with frequency 0");
            *count as f64 * f64::log2(*freq as f64 / precision)
        })
        .sum::<f64>()
        .neg()
}

/// The number of bits needed to encode the symbols counted in `counts` with codewords of the
/// given `depths`.
pub fn prefix_cost(counts: &[u32], depths: &[u8]) -> u64 {
    counts
        .iter()
        .zip(depths.iter())
        .map(|(count, depth)| *count as u64 * *depth as u64)
        .sum()
}
