use std::ops::Index;

use log::debug;
use mem_dbg::{MemDbg, MemSize};

use crate::ans::quantize::normalize_counts;
use crate::prefix::canonical::convert_bit_depths_to_symbols;
use crate::prefix::huffman_tree::create_huffman_tree;
use crate::prefix::PrefixCode;
use crate::{
    CodeError, Freq, Symbol, ANS_LOG_TAB_SIZE, ANS_TAB_SIZE, PREFIX_MAX_DEPTH, RECIPROCAL_PRECISION,
};

/// Returns `floor(2^64 / freq)`, saturated to `u64::MAX` for a frequency of 1.
///
/// Dividing with it may give a quotient one unit too small, see [`AnsSymbolInfo::div`].
#[inline]
pub fn inverse_frequency(freq: Freq) -> u64 {
    if freq == 0 {
        return 0;
    }
    u64::try_from((1_u128 << RECIPROCAL_PRECISION) / freq as u128).unwrap_or(u64::MAX)
}

/// All the data needed to encode a specific [`Symbol`].
#[derive(Clone, Debug, Default, PartialEq, Eq, MemDbg, MemSize)]
pub struct AnsSymbolInfo {
    /// The quantized frequency of the symbol.
    pub freq: Freq,

    /// The first slot of the table owned by the symbol. The symbol owns the `freq` slots
    /// starting from it, so the rank `r` of the symbol is encoded as slot `cumul_freq + r`.
    pub cumul_freq: u16,

    /// See [`inverse_frequency`].
    pub inverse_freq: u64,

    /// The length of the codeword of the symbol in the prefix fallback.
    pub depth: u8,

    /// The codeword of the symbol in the prefix fallback, most significant bit first.
    pub bits: u16,
}

impl AnsSymbolInfo {
    /// Returns `state / freq` and `state % freq`.
    #[inline(always)]
    pub fn div(&self, state: u32) -> (u32, u32) {
        let mut quotient =
            ((state as u128 * self.inverse_freq as u128) >> RECIPROCAL_PRECISION) as u32;
        let mut remainder = state - quotient * self.freq as u32;
        if remainder >= self.freq as u32 {
            quotient += 1;
            remainder -= self.freq as u32;
        }
        (quotient, remainder)
    }
}

/// A rank table: the quantized distribution of a context, with the data needed to encode its
/// symbols with the rANS coder.
#[derive(Clone, Debug, Default, PartialEq, Eq, MemDbg, MemSize)]
pub struct AnsTable {
    /// A table containing, at each index, the data related to the symbol equal to that index.
    pub symbols: Vec<AnsSymbolInfo>,

    /// The owner of each slot of the table.
    pub reverse_rank: Vec<Symbol>,

    /// The log2 of the size of the table.
    pub log_precision: usize,
}

impl AnsTable {
    /// Quantizes `counts` and builds the table. A context without symbols is modeled as if it
    /// only had symbol 0.
    pub fn from_counts(counts: &[u32]) -> Result<Self, CodeError> {
        let mut freqs = normalize_counts(counts, ANS_LOG_TAB_SIZE);
        if freqs.iter().all(|freq| *freq == 0) {
            freqs.resize(freqs.len().max(1), 0);
            freqs[0] = ANS_TAB_SIZE as Freq;
        }
        Self::from_freqs(&freqs)
    }

    /// Builds the table of an already quantized distribution.
    ///
    /// # Panics
    /// If the frequencies don't sum up to [`ANS_TAB_SIZE`].
    pub fn from_freqs(freqs: &[Freq]) -> Result<Self, CodeError> {
        let total = freqs.iter().map(|freq| *freq as u32).sum::<u32>();
        assert_eq!(
            total, ANS_TAB_SIZE,
            "frequencies must sum up to {}",
            ANS_TAB_SIZE
        );

        let depths = create_huffman_tree(
            &freqs.iter().map(|freq| *freq as u32).collect::<Vec<_>>(),
            PREFIX_MAX_DEPTH,
        )?;
        let codewords = convert_bit_depths_to_symbols(&depths);

        let mut symbols = Vec::with_capacity(freqs.len());
        let mut reverse_rank = Vec::with_capacity(ANS_TAB_SIZE as usize);
        let mut cumul_freq = 0_u16;

        for (symbol, freq) in freqs.iter().enumerate() {
            symbols.push(AnsSymbolInfo {
                freq: *freq,
                cumul_freq,
                inverse_freq: inverse_frequency(*freq),
                depth: depths[symbol],
                bits: codewords[symbol],
            });
            reverse_rank.extend(std::iter::repeat(symbol as Symbol).take(*freq as usize));
            cumul_freq += *freq;
        }

        debug!(
            "Built a rank table of {} symbols ({} live)",
            symbols.len(),
            symbols.iter().filter(|info| info.freq > 0).count()
        );

        Ok(Self {
            symbols,
            reverse_rank,
            log_precision: ANS_LOG_TAB_SIZE,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn freqs(&self) -> Vec<Freq> {
        self.symbols.iter().map(|info| info.freq).collect()
    }

    /// The prefix code encoding the same symbols as this table.
    pub fn prefix_code(&self) -> PrefixCode {
        PrefixCode::new(
            self.symbols.iter().map(|info| info.depth).collect(),
            self.symbols.iter().map(|info| info.bits).collect(),
        )
    }
}

impl Index<Symbol> for AnsTable {
    type Output = AnsSymbolInfo;

    #[inline(always)]
    fn index(&self, symbol: Symbol) -> &Self::Output {
        &self.symbols[symbol as usize]
    }
}
