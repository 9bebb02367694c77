use anyhow::Result;
use dsi_bitstream::impls::{BufBitWriter, MemWordWriterVec};
use dsi_bitstream::traits::{BitWrite, LE};

/// A sink of bits.
///
/// Bits are appended least significant bit first: the first written bit ends up in the lowest
/// bit of the first byte.
pub trait BitWriter {
    /// Appends the `n_bits` lowest bits of `value` and returns how many bits were written.
    /// `n_bits` can be at most 64.
    fn write(&mut self, n_bits: usize, value: u64) -> Result<usize>;

    /// Appends zero bits until the stream is aligned to a byte boundary and returns how many
    /// were needed.
    fn zero_pad_to_byte(&mut self) -> Result<usize>;

    /// Returns the number of bits written so far.
    fn bit_position(&self) -> usize;
}

/// A [`BitWriter`] collecting the stream in memory, in little-endian 64-bit words.
pub struct VecBitWriter {
    inner: BufBitWriter<LE, MemWordWriterVec<u64, Vec<u64>>>,
    bits: usize,
}

impl Default for VecBitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VecBitWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            inner: BufBitWriter::new(MemWordWriterVec::new(Vec::with_capacity(
                bytes.div_ceil(8),
            ))),
            bits: 0,
        }
    }

    /// Pads the stream to a byte boundary and returns the written bytes.
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        self.zero_pad_to_byte()?;
        let len = self.bits / 8;

        let words = self.inner.into_inner()?.into_inner();
        let mut bytes = words
            .into_iter()
            .flat_map(|word| u64::from_le(word).to_le_bytes())
            .collect::<Vec<u8>>();
        // the last word is padded with zeros
        bytes.truncate(len);
        Ok(bytes)
    }

    /// Appends a whole byte stream, which must start at a byte boundary of this one.
    ///
    /// # Panics
    /// If the stream is not aligned to a byte boundary.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        assert_eq!(self.bits % 8, 0, "appending bytes to an unaligned stream");
        for byte in bytes {
            self.write(8, *byte as u64)?;
        }
        Ok(())
    }
}

impl BitWriter for VecBitWriter {
    #[inline]
    fn write(&mut self, n_bits: usize, value: u64) -> Result<usize> {
        assert!(n_bits <= 64, "can't write {} bits at once", n_bits);
        if n_bits == 0 {
            return Ok(0);
        }
        debug_assert!(
            n_bits == 64 || value >> n_bits == 0,
            "value {} doesn't fit in {} bits",
            value,
            n_bits
        );

        let written = self.inner.write_bits(value, n_bits)?;
        self.bits += written;
        Ok(written)
    }

    fn zero_pad_to_byte(&mut self) -> Result<usize> {
        match self.bits % 8 {
            0 => Ok(0),
            used => self.write(8 - used, 0),
        }
    }

    fn bit_position(&self) -> usize {
        self.bits
    }
}
