use anyhow::Result;

use crate::ans::model4encoder::AnsSymbolInfo;
use crate::bit_writer::BitWriter;
use crate::{State, ANS_LOG_TAB_SIZE, ANS_SIGNATURE, LOG2_B};

/// Used to extract the bits flushed from the state during the normalization.
const NORMALIZATION_MASK: State = (1 << LOG2_B) - 1;

/// A rANS coder emitting a 32-bit state and 16-bit chunks.
///
/// Symbols must be pushed in the reverse of the order they will be decoded in. The bits are
/// buffered and only written, reversed, by [`flush`](Self::flush), so that the decoder reads
/// them in the original order.
#[derive(Clone, Debug)]
pub struct AnsCoder {
    state: State,

    /// The chunks of bits pushed so far, as (number of bits, bits).
    chunks: Vec<(u8, u32)>,
}

impl Default for AnsCoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnsCoder {
    pub fn new() -> Self {
        Self {
            state: ANS_SIGNATURE << LOG2_B,
            chunks: Vec::new(),
        }
    }

    pub fn with_capacity(chunks: usize) -> Self {
        Self {
            chunks: Vec::with_capacity(chunks),
            ..Self::new()
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Pushes `n_bits` raw bits, which the decoder reads right after the chunk of the symbol
    /// pushed next.
    #[inline]
    pub fn push_bits(&mut self, n_bits: u8, bits: u32) {
        if n_bits > 0 {
            self.chunks.push((n_bits, bits));
        }
    }

    /// Encodes a single symbol.
    ///
    /// Note that the ANS decodes the sequence in reverse order.
    #[inline]
    pub fn put_symbol(&mut self, info: &AnsSymbolInfo) {
        debug_assert!(info.freq > 0, "can't encode a symbol with frequency 0");

        if (self.state >> (State::BITS as usize - ANS_LOG_TAB_SIZE)) >= info.freq as State {
            self.chunks.push((LOG2_B as u8, self.state & NORMALIZATION_MASK));
            self.state >>= LOG2_B;
        }

        let (quotient, remainder) = info.div(self.state);
        self.state = (quotient << ANS_LOG_TAB_SIZE) + info.cumul_freq as State + remainder;
    }

    /// Writes the final state and then every chunk, last pushed first.
    pub fn flush(self, writer: &mut impl BitWriter) -> Result<()> {
        writer.write(State::BITS as usize, self.state as u64)?;
        for (n_bits, bits) in self.chunks.into_iter().rev() {
            writer.write(n_bits as usize, bits as u64)?;
        }
        Ok(())
    }
}
