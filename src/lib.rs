pub mod ans;
pub mod bit_writer;
pub mod entropy_code;
pub mod error;
pub mod histogram;
pub mod params;
pub mod prefix;
pub mod token;

pub mod traits;
pub mod utils;

pub use error::CodeError;

/// The type representing the raw values carried by the tokens, i.e. the values coming from the
/// upstream transform stages.
pub type RawSymbol = u32;

/// The type representing a bucketed symbol, i.e. the index of a slot in a histogram or in a
/// code table.
///
/// # Note
/// Both code variants index their tables with this type: a prefix code can describe at most
/// `2^15` symbols and a rank table at most `2^8`, so u16 is always enough.
pub type Symbol = u16;

/// The type representing the state of the rANS coder.
pub type State = u32;

/// The type representing the quantized frequencies of a rank table. Since the frequencies sum up
/// to [`ANS_TAB_SIZE`], a single symbol can own at most the whole table.
pub type Freq = u16;

/// The log2 of the precision of the rank tables.
pub const ANS_LOG_TAB_SIZE: usize = 12;

/// The precision of the rank tables, i.e. the value every quantized distribution sums up to.
pub const ANS_TAB_SIZE: u32 = 1 << ANS_LOG_TAB_SIZE;

/// The maximum length of a codeword of a prefix code.
pub const PREFIX_MAX_DEPTH: usize = 15;

/// The maximum number of symbols a prefix code can describe.
pub const PREFIX_MAX_ALPHABET_SIZE: usize = 1 << PREFIX_MAX_DEPTH;

/// The rANS state starts from `ANS_SIGNATURE << LOG2_B`, which the decoder checks once the last
/// symbol is decoded.
pub const ANS_SIGNATURE: State = 0x13;

/// How many bits are flushed from the rANS state at once during the normalization.
pub const LOG2_B: usize = 16;

/// The granularity used to grow the histograms.
pub const HISTOGRAM_ROUNDING: usize = 8;

/// How many bits of precision the inverse frequencies have.
pub const RECIPROCAL_PRECISION: u32 = 64;
