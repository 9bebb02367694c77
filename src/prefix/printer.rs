use std::io::{self, Write};

use itertools::Itertools;

use crate::prefix::PrefixCode;

const DEPTHS_PER_LINE: usize = 16;
const CODEWORDS_PER_LINE: usize = 8;

/// Writes `codes` as a Rust constant named `name` of
/// [`StaticPrefixCode`](crate::prefix::static_codes::StaticPrefixCode) entries.
///
/// # Panics
/// If the codes have different alphabet sizes.
pub fn write_prefix_codes<W: Write>(
    out: &mut W,
    name: &str,
    codes: &[PrefixCode],
) -> io::Result<()> {
    let alphabet_size = codes.first().map_or(0, |code| code.len());
    assert!(
        codes.iter().all(|code| code.len() == alphabet_size),
        "all the codes of a family must have the same alphabet size"
    );

    writeln!(
        out,
        "pub const {}: [StaticPrefixCode<{}>; {}] = [",
        name,
        alphabet_size,
        codes.len()
    )?;

    for code in codes {
        writeln!(out, "    StaticPrefixCode {{")?;
        writeln!(out, "        depths: [")?;
        for line in code.depths.chunks(DEPTHS_PER_LINE) {
            writeln!(out, "            {},", line.iter().join(", "))?;
        }
        writeln!(out, "        ],")?;
        writeln!(out, "        bits: [")?;
        for line in code.codewords.chunks(CODEWORDS_PER_LINE) {
            writeln!(
                out,
                "            {},",
                line.iter().map(|bits| format!("{:#06x}", bits)).join(", ")
            )?;
        }
        writeln!(out, "        ],")?;
        writeln!(out, "    }},")?;
    }

    writeln!(out, "];")
}
