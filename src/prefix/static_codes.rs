//! Static prefix codes over the small alphabets of the coefficient coders.
//!
//! Every code leaves some of its code space unused, which is what allows
//! [`extend_prefix_code`](crate::prefix::extender::extend_prefix_code) to grow it without
//! moving the existing codewords: the DC codes have room for 16 more symbols, the AC codes for
//! 8 more.
//!
//! The DC and AC tables below are illustrative: they are not the tables a decoder of the format
//! ships with. Those fill the whole code space, so they could not be extended this way; these
//! were built with spare room at the deepest level on purpose.

use std::fmt;

use crate::prefix::PrefixCode;

/// The number of symbols of the static codes.
pub const STATIC_ALPHABET_SIZE: usize = 16;

/// A prefix code stored as a constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticPrefixCode<const N: usize> {
    pub depths: [u8; N],
    pub bits: [u16; N],
}

impl<const N: usize> StaticPrefixCode<N> {
    pub fn to_prefix_code(&self) -> PrefixCode {
        PrefixCode::new(self.depths.to_vec(), self.bits.to_vec())
    }
}

/// The families of static codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixCodeFamily {
    Dc,
    Ac,
}

impl PrefixCodeFamily {
    /// The name of the constant holding the family.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Dc => "DC_PREFIX_CODES",
            Self::Ac => "AC_PREFIX_CODES",
        }
    }

    pub fn codes(&self) -> Vec<PrefixCode> {
        match self {
            Self::Dc => DC_PREFIX_CODES.iter().map(|code| code.to_prefix_code()).collect(),
            Self::Ac => AC_PREFIX_CODES.iter().map(|code| code.to_prefix_code()).collect(),
        }
    }
}

impl fmt::Display for PrefixCodeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dc => write!(f, "DC"),
            Self::Ac => write!(f, "AC"),
        }
    }
}

pub const DC_PREFIX_CODES: [StaticPrefixCode<STATIC_ALPHABET_SIZE>; 3] = [
    StaticPrefixCode {
        depths: [2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 6, 7, 8, 9, 10, 11],
        bits: [
            0x0000, 0x0001, 0x0004, 0x0005, 0x000c, 0x000d, 0x001c, 0x001d,
            0x003c, 0x003d, 0x003e, 0x007e, 0x00fe, 0x01fe, 0x03fe, 0x07fe,
        ],
    },
    StaticPrefixCode {
        depths: [1, 2, 4, 4, 4, 6, 6, 7, 7, 8, 8, 8, 10, 10, 10, 11],
        bits: [
            0x0000, 0x0002, 0x000c, 0x000d, 0x000e, 0x003c, 0x003d, 0x007c,
            0x007d, 0x00fc, 0x00fd, 0x00fe, 0x03fc, 0x03fd, 0x03fe, 0x07fe,
        ],
    },
    StaticPrefixCode {
        depths: [1, 3, 4, 4, 4, 4, 5, 5, 6, 6, 6, 7, 8, 9, 10, 11],
        bits: [
            0x0000, 0x0004, 0x000a, 0x000b, 0x000c, 0x000d, 0x001c, 0x001d,
            0x003c, 0x003d, 0x003e, 0x007e, 0x00fe, 0x01fe, 0x03fe, 0x07fe,
        ],
    },
];

pub const AC_PREFIX_CODES: [StaticPrefixCode<STATIC_ALPHABET_SIZE>; 4] = [
    StaticPrefixCode {
        depths: [1, 3, 3, 4, 4, 4, 5, 6, 8, 8, 9, 9, 9, 10, 11, 12],
        bits: [
            0x0000, 0x0004, 0x0005, 0x000c, 0x000d, 0x000e, 0x001e, 0x003e,
            0x00fc, 0x00fd, 0x01fc, 0x01fd, 0x01fe, 0x03fe, 0x07fe, 0x0ffe,
        ],
    },
    StaticPrefixCode {
        depths: [2, 2, 3, 3, 4, 4, 5, 5, 5, 6, 7, 8, 9, 10, 11, 12],
        bits: [
            0x0000, 0x0001, 0x0004, 0x0005, 0x000c, 0x000d, 0x001c, 0x001d,
            0x001e, 0x003e, 0x007e, 0x00fe, 0x01fe, 0x03fe, 0x07fe, 0x0ffe,
        ],
    },
    StaticPrefixCode {
        depths: [1, 3, 3, 4, 4, 4, 6, 6, 7, 7, 7, 8, 9, 10, 11, 12],
        bits: [
            0x0000, 0x0004, 0x0005, 0x000c, 0x000d, 0x000e, 0x003c, 0x003d,
            0x007c, 0x007d, 0x007e, 0x00fe, 0x01fe, 0x03fe, 0x07fe, 0x0ffe,
        ],
    },
    StaticPrefixCode {
        depths: [1, 2, 3, 4, 6, 6, 7, 7, 7, 9, 9, 10, 10, 10, 11, 12],
        bits: [
            0x0000, 0x0002, 0x0006, 0x000e, 0x003c, 0x003d, 0x007c, 0x007d,
            0x007e, 0x01fc, 0x01fd, 0x03fc, 0x03fd, 0x03fe, 0x07fe, 0x0ffe,
        ],
    },
];
