use log::{debug, info};

use crate::prefix::huffman_tree::create_huffman_tree;
use crate::prefix::{kraft_weight, PrefixCode};
use crate::{CodeError, PREFIX_MAX_ALPHABET_SIZE, PREFIX_MAX_DEPTH};

/// Extends `code` to `new_alphabet_size` symbols without changing the codeword of any of its
/// symbols.
///
/// Every existing symbol of depth `d` weighs `2^(15 - d)` and every new symbol weighs 1, then
/// the code is rebuilt over the combined weights. The new symbols can only take code space the
/// original code leaves unused: a complete code can't be extended, and neither can a code whose
/// free space is too small for the new symbols. In both cases the rebuilt code moves an existing
/// codeword and the extension is rejected.
pub fn extend_prefix_code(
    code: &PrefixCode,
    new_alphabet_size: usize,
) -> Result<PrefixCode, CodeError> {
    let current = code.len();
    if new_alphabet_size <= current {
        return Err(CodeError::ExtensionNotLarger {
            current,
            requested: new_alphabet_size,
        });
    }
    if new_alphabet_size > PREFIX_MAX_ALPHABET_SIZE {
        return Err(CodeError::AlphabetTooLarge {
            alphabet_size: new_alphabet_size,
            limit: PREFIX_MAX_ALPHABET_SIZE,
        });
    }

    let used = kraft_weight(&code.depths);
    if used > 1 << PREFIX_MAX_DEPTH {
        return Err(CodeError::OversubscribedCode { kraft_weight: used });
    }

    let weights = code
        .depths
        .iter()
        .map(|depth| match *depth {
            0 => 0,
            depth => 1_u32 << (PREFIX_MAX_DEPTH - depth as usize),
        })
        .chain(std::iter::repeat(1).take(new_alphabet_size - current))
        .collect::<Vec<u32>>();

    let extended = PrefixCode::from_depths(create_huffman_tree(&weights, PREFIX_MAX_DEPTH)?);

    if let Some(symbol) = (0..current).find(|symbol| {
        extended.depths[*symbol] != code.depths[*symbol]
            || extended.codewords[*symbol] != code.codewords[*symbol]
    }) {
        debug!(
            "Symbol {} would move from depth {} to depth {}",
            symbol, code.depths[symbol], extended.depths[symbol]
        );
        return Err(CodeError::ExtensionInfeasible { symbol });
    }

    Ok(extended)
}

/// Extends every code of a family to `new_alphabet_size` symbols.
pub fn extend_prefix_codes(
    codes: &[PrefixCode],
    new_alphabet_size: usize,
) -> Result<Vec<PrefixCode>, CodeError> {
    codes
        .iter()
        .enumerate()
        .map(|(index, code)| {
            let extended = extend_prefix_code(code, new_alphabet_size)?;
            info!(
                "Code {}: {} -> {} symbols, max depth {}, {} units of code space left",
                index,
                code.len(),
                extended.len(),
                extended.max_depth(),
                (1 << PREFIX_MAX_DEPTH) - extended.kraft_weight()
            );
            Ok(extended)
        })
        .collect()
}
