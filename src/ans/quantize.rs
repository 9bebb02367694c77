use crate::Freq;

/// Scales `counts` so that they sum up to `2^log_precision`.
///
/// Every count is scaled proportionally and rounded to the nearest integer, but never below 1
/// for a symbol that has been observed. The rounding drift is then charged to the symbol with
/// the largest count (the first one on ties). If that would leave it with nothing, the drift is
/// instead taken one unit at a time from whichever symbol has the largest frequency.
///
/// A single observed symbol gets the whole table. No symbol observed means no frequencies.
///
/// # Panics
/// If there are more observed symbols than slots in the table.
pub fn normalize_counts(counts: &[u32], log_precision: usize) -> Vec<Freq> {
    let precision = 1_u64 << log_precision;
    let mut freqs = vec![0 as Freq; counts.len()];

    let total = counts.iter().map(|count| *count as u64).sum::<u64>();
    let live = counts.iter().filter(|count| **count > 0).count();
    assert!(
        live as u64 <= precision,
        "{} symbols can't fit in a table of {} slots",
        live,
        precision
    );

    if live == 0 {
        return freqs;
    }

    let mut largest = 0;
    let mut assigned = 0_i64;
    for (symbol, count) in counts.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let scaled = ((*count as u64 * precision + total / 2) / total).max(1);
        freqs[symbol] = scaled as Freq;
        assigned += scaled as i64;
        if *count > counts[largest] {
            largest = symbol;
        }
    }

    let drift = precision as i64 - assigned;
    let corrected = freqs[largest] as i64 + drift;
    if corrected >= 1 {
        freqs[largest] = corrected as Freq;
    } else {
        for _ in 0..-drift {
            // first maximum, so that ties go to the lowest symbol
            let richest = freqs
                .iter()
                .enumerate()
                .rev()
                .max_by_key(|(_, freq)| **freq)
                .map_or(0, |(symbol, _)| symbol);
            freqs[richest] -= 1;
        }
    }

    debug_assert_eq!(
        freqs.iter().map(|freq| *freq as u64).sum::<u64>(),
        precision
    );
    freqs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ANS_LOG_TAB_SIZE;

    #[test]
    fn test_proportional_scaling() {
        assert_eq!(
            normalize_counts(&[10, 10, 6, 3, 3], ANS_LOG_TAB_SIZE),
            vec![1280, 1280, 768, 384, 384]
        );
        assert_eq!(
            normalize_counts(&[2, 0, 0, 0, 0, 1], ANS_LOG_TAB_SIZE),
            vec![2731, 0, 0, 0, 0, 1365]
        );
    }

    #[test]
    fn test_drift_goes_to_the_largest_symbol() {
        assert_eq!(
            normalize_counts(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], ANS_LOG_TAB_SIZE),
            vec![74, 149, 223, 298, 372, 447, 521, 596, 670, 746]
        );
    }

    #[test]
    fn test_rare_symbols_keep_one_slot() {
        let mut counts = vec![1000_u32];
        counts.extend(std::iter::repeat(1).take(300));

        let freqs = normalize_counts(&counts, ANS_LOG_TAB_SIZE);

        assert_eq!(freqs[0], 3196);
        assert!(freqs[1..].iter().all(|freq| *freq == 3));
    }

    #[test]
    fn test_single_symbol_and_empty() {
        assert_eq!(normalize_counts(&[0, 7, 0], ANS_LOG_TAB_SIZE), vec![0, 4096, 0]);
        assert_eq!(normalize_counts(&[0, 0], ANS_LOG_TAB_SIZE), vec![0, 0]);
    }

    #[test]
    fn test_drift_is_spread_when_largest_symbol_is_too_small() {
        // every symbol rounds up to 1 and the largest one can't pay for all of them
        let counts = [4_u32, 3, 1, 1, 1, 1, 1, 1];

        assert_eq!(normalize_counts(&counts, 3), vec![1; 8]);
    }
}
