use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;

use crate::prefix::extender::extend_prefix_codes;
use crate::prefix::printer::write_prefix_codes;
use crate::prefix::static_codes::{PrefixCodeFamily, STATIC_ALPHABET_SIZE};
use crate::prefix::stored::StoredPrefixCodes;

/// Extends the static codes of `family` to `new_alphabet_size` symbols, prints them to `out` as
/// a Rust constant and, if `store` is given, stores them there.
///
/// Fails without printing anything if the size doesn't grow the alphabet or if a code can't be
/// extended.
pub fn update_static_codes(
    family: PrefixCodeFamily,
    new_alphabet_size: usize,
    out: &mut impl Write,
    store: Option<&Path>,
) -> Result<()> {
    if new_alphabet_size <= STATIC_ALPHABET_SIZE {
        bail!(
            "The new alphabet size must be larger than {}, got {}",
            STATIC_ALPHABET_SIZE,
            new_alphabet_size
        );
    }

    let extended = extend_prefix_codes(&family.codes(), new_alphabet_size).with_context(|| {
        format!(
            "Could not extend the {} codes to {} symbols",
            family, new_alphabet_size
        )
    })?;

    write_prefix_codes(out, family.table_name(), &extended)?;
    out.flush()?;

    if let Some(path) = store {
        StoredPrefixCodes::new(extended).save(path)?;
        info!("Stored the extended {} codes in {}", family, path.display());
    }

    Ok(())
}
