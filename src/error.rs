//! Error types for code construction.
//!
//! Only the failures a caller can react to live here: building a table for an alphabet that
//! does not fit the chosen code, or extending a static prefix code when the extension would
//! move an existing codeword. Precondition violations (contexts out of range, mismatched
//! table lengths, invalid bucketing parameters) are bugs of the caller and panic instead.

use std::fmt;

/// Error returned when a code table can't be built for the given input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// The alphabet has more symbols than the code can describe.
    AlphabetTooLarge {
        /// Number of symbols of the alphabet, i.e. last live symbol + 1.
        alphabet_size: usize,
        /// Maximum number of symbols supported by the code.
        limit: usize,
    },
    /// The requested alphabet size doesn't grow the code.
    ExtensionNotLarger { current: usize, requested: usize },
    /// The depths given as input use more code space than available.
    OversubscribedCode { kraft_weight: u64 },
    /// Extending the code would change the codeword of an existing symbol.
    ExtensionInfeasible { symbol: usize },
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphabetTooLarge {
                alphabet_size,
                limit,
            } => write!(
                f,
                "alphabet of {} symbols exceeds the limit of {} symbols",
                alphabet_size, limit
            ),
            Self::ExtensionNotLarger { current, requested } => write!(
                f,
                "new alphabet size {} must be larger than the current size {}",
                requested, current
            ),
            Self::OversubscribedCode { kraft_weight } => write!(
                f,
                "code is oversubscribed: kraft weight {} exceeds {}",
                kraft_weight,
                1u64 << crate::PREFIX_MAX_DEPTH
            ),
            Self::ExtensionInfeasible { symbol } => write!(
                f,
                "extension would change the codeword of symbol {}",
                symbol
            ),
        }
    }
}

impl std::error::Error for CodeError {}
