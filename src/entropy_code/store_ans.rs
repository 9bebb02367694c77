use anyhow::Result;

use crate::bit_writer::BitWriter;
use crate::entropy_code::var_len::write_var_len_uint8;
use crate::prefix::canonical::reverse_codeword;
use crate::utils::floor_log2_nonzero;
use crate::{Freq, ANS_LOG_TAB_SIZE, ANS_TAB_SIZE};

/// The symbol of the log-count alphabet announcing a run of repeated frequencies.
pub const LOGCOUNT_RLE: usize = 13;

/// Depths of the fixed code of the log-counts, RLE symbol included.
pub const LOGCOUNT_DEPTHS: [u8; LOGCOUNT_RLE + 1] = [5, 4, 4, 4, 4, 4, 3, 3, 3, 3, 3, 6, 7, 7];

/// Canonical codewords of [`LOGCOUNT_DEPTHS`].
pub const LOGCOUNT_CODEWORDS: [u16; LOGCOUNT_RLE + 1] =
    [30, 10, 11, 12, 13, 14, 0, 1, 2, 3, 4, 62, 126, 127];

/// The shortest run of repeated frequencies worth an RLE symbol.
pub const MIN_REPEATS: usize = 3;

/// The longest run of repeated frequencies a single RLE symbol can describe.
pub const MAX_REPEATS: usize = MIN_REPEATS + 255;

/// The distribution giving each of `alphabet_size` symbols the same share of the table, the
/// first ones taking one more slot each for the remainder.
pub fn flat_freqs(alphabet_size: usize) -> Vec<Freq> {
    let share = ANS_TAB_SIZE as usize / alphabet_size;
    let remainder = ANS_TAB_SIZE as usize % alphabet_size;
    (0..alphabet_size)
        .map(|symbol| (share + (symbol < remainder) as usize) as Freq)
        .collect()
}

/// The log-count of a frequency: 0 for 0, otherwise the position of its leading bit plus one.
#[inline]
pub fn logcount(freq: Freq) -> usize {
    match freq {
        0 => 0,
        freq => floor_log2_nonzero(freq as u32) as usize + 1,
    }
}

#[inline]
fn write_logcount_symbol(symbol: usize, writer: &mut impl BitWriter) -> Result<()> {
    let depth = LOGCOUNT_DEPTHS[symbol];
    writer.write(
        depth as usize,
        reverse_codeword(LOGCOUNT_CODEWORDS[symbol], depth) as u64,
    )?;
    Ok(())
}

/// Writes the description of a quantized distribution whose last frequency is nonzero.
///
/// One or two live symbols are listed explicitly. A flat distribution is described by its size.
/// Any other distribution is written as the log-counts of its frequencies followed by their
/// mantissas. The largest frequency is left out and recovered from the table size: its
/// log-count is raised so that it is the first maximal one.
///
/// # Panics
/// If the frequencies don't sum up to [`ANS_TAB_SIZE`], if the alphabet has more than 256
/// symbols, or if the last frequency is 0.
pub fn write_ans_freqs(freqs: &[Freq], writer: &mut impl BitWriter) -> Result<()> {
    let alphabet_size = freqs.len();
    assert!(
        (1..=256).contains(&alphabet_size),
        "can't describe an alphabet of {} symbols",
        alphabet_size
    );
    assert_ne!(freqs[alphabet_size - 1], 0, "the last symbol must be live");
    assert_eq!(
        freqs.iter().map(|freq| *freq as u32).sum::<u32>(),
        ANS_TAB_SIZE,
        "frequencies must sum up to the table size"
    );

    let live = freqs
        .iter()
        .enumerate()
        .filter(|(_, freq)| **freq > 0)
        .map(|(symbol, _)| symbol)
        .collect::<Vec<usize>>();

    if live.len() <= 2 {
        writer.write(1, 1)?;
        writer.write(1, live.len() as u64 - 1)?;
        for symbol in live.iter() {
            write_var_len_uint8(*symbol, writer)?;
        }
        if live.len() == 2 {
            writer.write(ANS_LOG_TAB_SIZE, freqs[live[0]] as u64)?;
        }
        return Ok(());
    }

    writer.write(1, 0)?;
    if freqs == flat_freqs(alphabet_size).as_slice() {
        writer.write(1, 1)?;
        write_var_len_uint8(alphabet_size - 1, writer)?;
        return Ok(());
    }
    writer.write(1, 0)?;
    write_var_len_uint8(alphabet_size - 3, writer)?;

    // the first largest frequency
    let omit_pos = freqs
        .iter()
        .enumerate()
        .rev()
        .max_by_key(|(_, freq)| **freq)
        .map_or(0, |(symbol, _)| symbol);

    let logcounts = freqs.iter().map(|freq| logcount(*freq)).collect::<Vec<usize>>();
    let omit_log = logcounts
        .iter()
        .enumerate()
        .map(|(symbol, logcount)| if symbol < omit_pos { logcount + 1 } else { *logcount })
        .max()
        .unwrap_or(0);

    let mut repeated = vec![false; alphabet_size];
    let mut symbol = 0;
    while symbol < alphabet_size {
        if symbol == omit_pos {
            write_logcount_symbol(omit_log, writer)?;
            symbol += 1;
            continue;
        }
        write_logcount_symbol(logcounts[symbol], writer)?;

        let repeats = freqs[symbol + 1..]
            .iter()
            .enumerate()
            .take_while(|(offset, freq)| {
                **freq == freqs[symbol] && symbol + 1 + offset != omit_pos
            })
            .count()
            .min(MAX_REPEATS);

        if repeats >= MIN_REPEATS {
            write_logcount_symbol(LOGCOUNT_RLE, writer)?;
            write_var_len_uint8(repeats - MIN_REPEATS, writer)?;
            repeated[symbol + 1..=symbol + repeats].fill(true);
            symbol += repeats + 1;
        } else {
            symbol += 1;
        }
    }

    for (symbol, freq) in freqs.iter().enumerate() {
        let logcount = logcounts[symbol];
        if symbol == omit_pos || repeated[symbol] || logcount <= 1 {
            continue;
        }
        writer.write(logcount - 1, (*freq as u64) - (1 << (logcount - 1)))?;
    }
    Ok(())
}
