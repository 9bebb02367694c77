use mem_dbg::{MemDbg, MemSize};

use crate::traits::folding::Fold;
use crate::RawSymbol;

/// A value to be entropy coded together with the context that selects its code table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Token {
    pub value: RawSymbol,
    pub context: u32,
}

impl Token {
    pub fn new(context: u32, value: RawSymbol) -> Self {
        Self { value, context }
    }
}

/// The result of folding a value: the bucket modeled by the histograms and the raw bits emitted
/// verbatim after its code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BucketedSymbol {
    pub bucket: u32,
    pub extra_bit_count: u8,
    pub extra_bits: u32,
}

/// Parameters of the hybrid integer bucketing.
///
/// Values below `2^split_exponent` are their own bucket. Every bigger value is split in its
/// exponent, the `msb_in_token` bits following its leading one and its `lsb_in_token` lowest
/// bits, which together select the bucket. All the remaining bits are emitted raw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct HybridUintConfig {
    split_exponent: u32,
    msb_in_token: u32,
    lsb_in_token: u32,
    split: u32,
}

impl Default for HybridUintConfig {
    fn default() -> Self {
        Self::new(4, 2, 0)
    }
}

impl HybridUintConfig {
    /// The biggest split exponent that can be described in a stream.
    pub const MAX_SPLIT_EXPONENT: u32 = crate::PREFIX_MAX_DEPTH as u32;

    /// Creates a new configuration.
    ///
    /// # Panics
    /// If `split_exponent` is bigger than [`Self::MAX_SPLIT_EXPONENT`] or if the bits kept in the
    /// bucket exceed the split exponent.
    pub fn new(split_exponent: u32, msb_in_token: u32, lsb_in_token: u32) -> Self {
        assert!(
            split_exponent <= Self::MAX_SPLIT_EXPONENT,
            "split exponent {} is bigger than {}",
            split_exponent,
            Self::MAX_SPLIT_EXPONENT
        );
        assert!(
            msb_in_token + lsb_in_token <= split_exponent,
            "msb_in_token ({}) + lsb_in_token ({}) can't exceed the split exponent ({})",
            msb_in_token,
            lsb_in_token,
            split_exponent
        );
        Self {
            split_exponent,
            msb_in_token,
            lsb_in_token,
            split: 1 << split_exponent,
        }
    }

    pub fn split_exponent(&self) -> u32 {
        self.split_exponent
    }

    pub fn msb_in_token(&self) -> u32 {
        self.msb_in_token
    }

    pub fn lsb_in_token(&self) -> u32 {
        self.lsb_in_token
    }

    #[inline(always)]
    fn in_token(&self) -> u32 {
        self.msb_in_token + self.lsb_in_token
    }
}

impl Fold for HybridUintConfig {
    #[inline]
    fn fold(&self, value: RawSymbol) -> BucketedSymbol {
        if value < self.split {
            return BucketedSymbol {
                bucket: value,
                extra_bit_count: 0,
                extra_bits: 0,
            };
        }

        let exponent = value.ilog2();
        let mantissa = value - (1 << exponent);
        let lsb_mask = (1 << self.lsb_in_token) - 1;

        let bucket = self.split
            + ((exponent - self.split_exponent) << self.in_token())
            + ((mantissa >> (exponent - self.msb_in_token)) << self.lsb_in_token)
            + (mantissa & lsb_mask);
        let extra_bit_count = exponent - self.in_token();
        let extra_bits =
            ((value as u64 >> self.lsb_in_token) & ((1 << extra_bit_count) - 1)) as u32;

        BucketedSymbol {
            bucket,
            extra_bit_count: extra_bit_count as u8,
            extra_bits,
        }
    }

    #[inline]
    fn unfold(&self, bucket: u32, extra_bits: u32) -> RawSymbol {
        if bucket < self.split {
            return bucket;
        }

        let extra_bit_count = self.extra_bit_count(bucket);
        let low = bucket & ((1 << self.lsb_in_token) - 1);
        let msb = (bucket >> self.lsb_in_token) & ((1 << self.msb_in_token) - 1);
        let high = (1u64 << self.msb_in_token) | msb as u64;

        let value =
            (((high << extra_bit_count) | extra_bits as u64) << self.lsb_in_token) | low as u64;
        value as RawSymbol
    }

    #[inline]
    fn extra_bit_count(&self, bucket: u32) -> u32 {
        if bucket < self.split {
            return 0;
        }
        self.split_exponent - self.in_token() + ((bucket - self.split) >> self.in_token())
    }
}
