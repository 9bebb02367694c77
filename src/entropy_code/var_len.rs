use anyhow::Result;

use crate::bit_writer::BitWriter;
use crate::token::HybridUintConfig;
use crate::utils::{ceil_log2_nonzero, floor_log2_nonzero};

/// Writes `value` in `[0, 255]` as a flag, then a 3-bit exponent and the mantissa.
pub fn write_var_len_uint8(value: usize, writer: &mut impl BitWriter) -> Result<()> {
    assert!(value < 1 << 8, "{} doesn't fit a VarLenUint8", value);
    write_var_len(value as u32, 3, writer)
}

/// Writes `value` in `[0, 65535]` as a flag, then a 4-bit exponent and the mantissa.
pub fn write_var_len_uint16(value: usize, writer: &mut impl BitWriter) -> Result<()> {
    assert!(value < 1 << 16, "{} doesn't fit a VarLenUint16", value);
    write_var_len(value as u32, 4, writer)
}

#[inline]
fn write_var_len(value: u32, exponent_bits: usize, writer: &mut impl BitWriter) -> Result<()> {
    if value == 0 {
        writer.write(1, 0)?;
        return Ok(());
    }
    let exponent = floor_log2_nonzero(value);
    writer.write(1, 1)?;
    writer.write(exponent_bits, exponent as u64)?;
    writer.write(exponent as usize, (value - (1 << exponent)) as u64)?;
    Ok(())
}

/// Writes the bucketing parameters of a table whose alphabet has at most `2^log_alpha_size`
/// symbols. When the split exponent equals `log_alpha_size` every bucket is a value, so the other
/// two parameters are not written.
///
/// # Panics
/// If the split exponent is bigger than `log_alpha_size`.
pub fn write_uint_config(
    config: &HybridUintConfig,
    log_alpha_size: usize,
    writer: &mut impl BitWriter,
) -> Result<()> {
    let split_exponent = config.split_exponent();
    assert!(
        split_exponent as usize <= log_alpha_size,
        "split exponent {} exceeds the log2 of the alphabet size {}",
        split_exponent,
        log_alpha_size
    );

    writer.write(
        ceil_log2_nonzero(log_alpha_size as u32 + 1) as usize,
        split_exponent as u64,
    )?;
    if split_exponent as usize == log_alpha_size {
        return Ok(());
    }
    writer.write(
        ceil_log2_nonzero(split_exponent + 1) as usize,
        config.msb_in_token() as u64,
    )?;
    writer.write(
        ceil_log2_nonzero(split_exponent - config.msb_in_token() + 1) as usize,
        config.lsb_in_token() as u64,
    )?;
    Ok(())
}
