use anyhow::Result;
use itertools::Itertools;

use crate::bit_writer::BitWriter;
use crate::prefix::huffman_tree::create_huffman_tree;
use crate::prefix::PrefixCode;
use crate::utils::ceil_log2_nonzero;

/// The number of symbols of the code describing the depths of a prefix code.
pub const CODE_LENGTH_CODES: usize = 19;

/// The longest codeword of the code describing the depths.
pub const CODE_LENGTH_MAX_DEPTH: usize = 7;

/// Repeats the previous nonzero depth 3 to 6 times.
pub const REPEAT_PREVIOUS: u8 = 16;

/// Emits 3 to 10 zero depths.
pub const REPEAT_ZERO_SHORT: u8 = 17;

/// Emits 11 to 138 zero depths.
pub const REPEAT_ZERO_LONG: u8 = 18;

/// The order in which the depths of the code-length code are stored.
pub const CODE_LENGTH_ORDER: [usize; CODE_LENGTH_CODES] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// The largest number of live symbols described by listing them.
const MAX_SIMPLE_SYMBOLS: usize = 4;

/// A symbol of the code-length alphabet with its extra bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeLengthItem {
    pub code: u8,
    pub extra_bit_count: u8,
    pub extra_bits: u8,
}

impl CodeLengthItem {
    fn literal(depth: u8) -> Self {
        Self {
            code: depth,
            extra_bit_count: 0,
            extra_bits: 0,
        }
    }
}

/// Writes the description of `code`, whose alphabet has `code.len()` symbols.
///
/// Codes with at most four live symbols are described by listing the symbols, since their
/// depths can only take a few shapes. The others are described by their run-length coded depths.
///
/// # Panics
/// If the code has no live symbol.
pub fn write_prefix_code(code: &PrefixCode, writer: &mut impl BitWriter) -> Result<()> {
    let live = code
        .depths
        .iter()
        .enumerate()
        .filter(|(_, depth)| **depth > 0)
        .map(|(symbol, depth)| (*depth, symbol))
        .sorted()
        .collect::<Vec<(u8, usize)>>();
    assert!(!live.is_empty(), "a prefix code must have at least one symbol");

    if live.len() <= MAX_SIMPLE_SYMBOLS {
        write_simple_prefix_code(&live, code.len(), writer)
    } else {
        write_complex_prefix_code(&code.depths, writer)
    }
}

/// Lists the live symbols ordered by (depth, symbol). For four symbols one more bit tells
/// whether the depths are {2, 2, 2, 2} or {1, 2, 3, 3}.
fn write_simple_prefix_code(
    live: &[(u8, usize)],
    alphabet_size: usize,
    writer: &mut impl BitWriter,
) -> Result<()> {
    writer.write(2, 1)?;
    writer.write(2, live.len() as u64 - 1)?;

    let symbol_bits = ceil_log2_nonzero(alphabet_size as u32) as usize;
    for (_, symbol) in live {
        writer.write(symbol_bits, *symbol as u64)?;
    }

    if live.len() == MAX_SIMPLE_SYMBOLS {
        writer.write(1, (live[0].0 == 1) as u64)?;
    }
    Ok(())
}

fn write_complex_prefix_code(depths: &[u8], writer: &mut impl BitWriter) -> Result<()> {
    writer.write(2, 0)?;

    let items = run_length_code_depths(depths);
    let mut histogram = [0_u32; CODE_LENGTH_CODES];
    for item in items.iter() {
        histogram[item.code as usize] += 1;
    }

    // 19 symbols always fit in 2^7 codewords
    let code_length_code = PrefixCode::from_depths(
        create_huffman_tree(&histogram, CODE_LENGTH_MAX_DEPTH).unwrap_or_else(|_| unreachable!()),
    );

    let stored = CODE_LENGTH_ORDER
        .iter()
        .rposition(|code| code_length_code.depths[*code] > 0)
        .map_or(0, |last| last + 1)
        .max(4);
    writer.write(4, stored as u64 - 4)?;
    for code in CODE_LENGTH_ORDER.iter().take(stored) {
        writer.write(3, code_length_code.depths[*code] as u64)?;
    }

    for item in items {
        code_length_code.write_symbol(item.code as u16, writer)?;
        writer.write(item.extra_bit_count as usize, item.extra_bits as u64)?;
    }
    Ok(())
}

/// Run-length codes a sequence of depths: runs of zeros become repeat-zero codes, runs of a
/// nonzero depth become the depth followed by repeat-previous codes.
pub fn run_length_code_depths(depths: &[u8]) -> Vec<CodeLengthItem> {
    let mut items = Vec::new();

    for (depth, run) in depths.iter().dedup_with_count().map(|(run, depth)| (*depth, run)) {
        if depth == 0 {
            let mut left = run;
            while left >= 11 {
                let repeat = left.min(138);
                items.push(CodeLengthItem {
                    code: REPEAT_ZERO_LONG,
                    extra_bit_count: 7,
                    extra_bits: (repeat - 11) as u8,
                });
                left -= repeat;
            }
            if left >= 3 {
                items.push(CodeLengthItem {
                    code: REPEAT_ZERO_SHORT,
                    extra_bit_count: 3,
                    extra_bits: (left - 3) as u8,
                });
                left = 0;
            }
            items.extend(std::iter::repeat(CodeLengthItem::literal(0)).take(left));
        } else {
            items.push(CodeLengthItem::literal(depth));
            let mut left = run - 1;
            while left >= 3 {
                let repeat = left.min(6);
                items.push(CodeLengthItem {
                    code: REPEAT_PREVIOUS,
                    extra_bit_count: 2,
                    extra_bits: (repeat - 3) as u8,
                });
                left -= repeat;
            }
            items.extend(std::iter::repeat(CodeLengthItem::literal(depth)).take(left));
        }
    }

    items
}
