pub mod canonical;
pub mod extender;
pub mod huffman_tree;
pub mod printer;
pub mod stored;
pub mod static_codes;
pub mod update;

use anyhow::Result;
use epserde::Epserde;
use mem_dbg::{MemDbg, MemSize};

use crate::bit_writer::BitWriter;
use crate::prefix::canonical::{convert_bit_depths_to_symbols, reverse_codeword};
use crate::prefix::huffman_tree::create_huffman_tree;
use crate::{CodeError, Symbol, PREFIX_MAX_DEPTH};

/// A canonical prefix code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Epserde, MemDbg, MemSize)]
pub struct PrefixCode {
    /// The length of the codeword of each symbol, 0 for the symbols that are not part of the code.
    pub depths: Vec<u8>,

    /// The codeword of each symbol, most significant bit first.
    pub codewords: Vec<u16>,
}

impl PrefixCode {
    /// Creates a code from its depths and codewords.
    ///
    /// # Panics
    /// If the two tables have different lengths.
    pub fn new(depths: Vec<u8>, codewords: Vec<u16>) -> Self {
        assert_eq!(
            depths.len(),
            codewords.len(),
            "depths and codewords must have the same length"
        );
        Self { depths, codewords }
    }

    /// Creates the canonical code with the given depths.
    pub fn from_depths(depths: Vec<u8>) -> Self {
        let codewords = convert_bit_depths_to_symbols(&depths);
        Self { depths, codewords }
    }

    /// Builds the optimal canonical code for `counts` with codewords of at most
    /// [`PREFIX_MAX_DEPTH`] bits.
    pub fn from_counts(counts: &[u32]) -> Result<Self, CodeError> {
        Ok(Self::from_depths(create_huffman_tree(counts, PREFIX_MAX_DEPTH)?))
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// The code space used by the code, in units of `2^-PREFIX_MAX_DEPTH`.
    pub fn kraft_weight(&self) -> u64 {
        kraft_weight(&self.depths)
    }

    /// Whether every codeword of [`PREFIX_MAX_DEPTH`] bits starts with a codeword of the code.
    pub fn is_complete(&self) -> bool {
        self.kraft_weight() == 1 << PREFIX_MAX_DEPTH
    }

    pub fn max_depth(&self) -> u8 {
        self.depths.iter().copied().max().unwrap_or(0)
    }

    /// Writes the codeword of `symbol`.
    #[inline]
    pub fn write_symbol(&self, symbol: Symbol, writer: &mut impl BitWriter) -> Result<usize> {
        let depth = self.depths[symbol as usize];
        debug_assert!(depth > 0, "symbol {} is not part of the code", symbol);
        writer.write(
            depth as usize,
            reverse_codeword(self.codewords[symbol as usize], depth) as u64,
        )
    }
}

/// The code space used by `depths`, in units of `2^-PREFIX_MAX_DEPTH`.
pub fn kraft_weight(depths: &[u8]) -> u64 {
    depths
        .iter()
        .filter(|depth| **depth > 0)
        .map(|depth| 1_u64 << (PREFIX_MAX_DEPTH - *depth as usize))
        .sum()
}
