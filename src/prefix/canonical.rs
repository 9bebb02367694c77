use crate::PREFIX_MAX_DEPTH;

/// Assigns canonical codewords to the given depths.
///
/// Symbols are enumerated by depth and then by index: the first symbol of every depth gets the
/// code following the last one of the previous depth, shifted left by one bit for every depth
/// skipped. Symbols with depth 0 get codeword 0 and are not part of the code.
///
/// Codewords are returned most significant bit first, i.e. as they appear in the code tree.
pub fn convert_bit_depths_to_symbols(depths: &[u8]) -> Vec<u16> {
    let mut depth_counts = [0_u32; PREFIX_MAX_DEPTH + 1];
    for depth in depths.iter().filter(|depth| **depth > 0) {
        assert!(
            *depth as usize <= PREFIX_MAX_DEPTH,
            "depth {} exceeds the limit of {}",
            depth,
            PREFIX_MAX_DEPTH
        );
        depth_counts[*depth as usize] += 1;
    }

    let mut next_code = [0_u32; PREFIX_MAX_DEPTH + 1];
    let mut code = 0;
    for depth in 1..=PREFIX_MAX_DEPTH {
        code = (code + depth_counts[depth - 1]) << 1;
        next_code[depth] = code;
    }

    depths
        .iter()
        .map(|depth| match *depth as usize {
            0 => 0,
            depth => {
                let codeword = next_code[depth];
                next_code[depth] += 1;
                codeword as u16
            }
        })
        .collect()
}

/// Reverses the `depth` lowest bits of `codeword`, so that writing it least significant bit
/// first emits the codeword from its root.
#[inline(always)]
pub fn reverse_codeword(codeword: u16, depth: u8) -> u16 {
    match depth {
        0 => 0,
        depth => codeword.reverse_bits() >> (16 - depth as u32),
    }
}
