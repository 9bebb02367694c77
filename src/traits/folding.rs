use crate::token::BucketedSymbol;
use crate::RawSymbol;

/// This Fold trait allows for folding raw values into a small alphabet of buckets, plus some
/// raw bits needed to get back the original value, and for unfolding them.
///
/// Folding must be a bijection: two distinct values never share both the bucket and the extra
/// bits.
pub trait Fold {
    /// Folds `value` into its bucket and the extra bits that identify it within the bucket.
    fn fold(&self, value: RawSymbol) -> BucketedSymbol;

    /// Unfolds a value from its bucket and the extra bits that have been emitted with it.
    fn unfold(&self, bucket: u32, extra_bits: u32) -> RawSymbol;

    /// How many extra bits are emitted with every value of `bucket`.
    fn extra_bit_count(&self, bucket: u32) -> u32;

    /// The bucket of the largest representable value, i.e. the last symbol of the alphabet.
    fn max_bucket(&self) -> u32 {
        self.fold(RawSymbol::MAX).bucket
    }
}
