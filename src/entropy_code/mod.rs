pub mod store_ans;
pub mod store_prefix;
pub mod var_len;

use anyhow::Result;
use log::{debug, info, warn};
use mem_dbg::{MemSize, SizeFlags};
use rayon::prelude::*;

use crate::ans::{AnsCoder, AnsTable};
use crate::bit_writer::{BitWriter, VecBitWriter};
use crate::entropy_code::store_ans::write_ans_freqs;
use crate::entropy_code::store_prefix::write_prefix_code;
use crate::entropy_code::var_len::{write_uint_config, write_var_len_uint16};
use crate::histogram::{build_histograms, collapsed_context, Histogram};
use crate::params::{EntropyParams, MIN_LOG_ALPHA_SIZE};
use crate::prefix::PrefixCode;
use crate::token::{HybridUintConfig, Token};
use crate::traits::folding::Fold;
use crate::utils::{ans_cost, entropy, prefix_cost};
use crate::{CodeError, Symbol, PREFIX_MAX_DEPTH};

/// The code of a single context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeTable {
    Prefix(PrefixCode),
    Ans(AnsTable),
}

impl CodeTable {
    /// The number of symbols described by the table.
    pub fn alphabet_size(&self) -> usize {
        match self {
            Self::Prefix(code) => code.len(),
            Self::Ans(table) => table.len(),
        }
    }

    /// The bytes of memory used by the table.
    pub fn memory_footprint(&self) -> usize {
        match self {
            Self::Prefix(code) => code.mem_size(SizeFlags::default()),
            Self::Ans(table) => table.mem_size(SizeFlags::default()),
        }
    }

    /// The estimated bits needed to encode the buckets counted in `counts` with this table.
    fn cost(&self, counts: &[u32]) -> f64 {
        let counts = &counts[..counts.len().min(self.alphabet_size())];
        match self {
            Self::Prefix(code) => prefix_cost(counts, &code.depths) as f64,
            Self::Ans(table) => ans_cost(counts, &table.freqs(), table.log_precision),
        }
    }
}

/// The code tables of an encoding unit, one per collapsed context, with the parameters needed
/// to describe them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntropyEncodingData {
    pub tables: Vec<CodeTable>,
    pub use_prefix_code: bool,
    pub uint_config: HybridUintConfig,
    pub log_alpha_size: usize,
}

impl EntropyEncodingData {
    /// The log2 of the alphabet size bound used to describe the bucketing parameters.
    fn config_log_alpha_size(&self) -> usize {
        if self.use_prefix_code {
            PREFIX_MAX_DEPTH
        } else {
            self.log_alpha_size
        }
    }

    /// Replaces every rank table with the prefix code built from its quantized frequencies.
    pub fn into_prefix_codes(self) -> Self {
        Self {
            tables: self
                .tables
                .into_iter()
                .map(|table| match table {
                    CodeTable::Ans(table) => CodeTable::Prefix(table.prefix_code()),
                    prefix => prefix,
                })
                .collect(),
            use_prefix_code: true,
            ..self
        }
    }

    /// Writes the description of every table, so that a decoder can rebuild them.
    ///
    /// # Panics
    /// If a table doesn't match the selected code.
    pub fn write_descriptions(&self, writer: &mut impl BitWriter) -> Result<()> {
        writer.write(1, self.use_prefix_code as u64)?;
        if !self.use_prefix_code {
            writer.write(2, (self.log_alpha_size - MIN_LOG_ALPHA_SIZE) as u64)?;
        }

        for _ in self.tables.iter() {
            write_uint_config(&self.uint_config, self.config_log_alpha_size(), writer)?;
        }

        if self.use_prefix_code {
            for table in self.tables.iter() {
                write_var_len_uint16(table.alphabet_size() - 1, writer)?;
            }
        }

        for table in self.tables.iter() {
            match (table, self.use_prefix_code) {
                (CodeTable::Prefix(code), true) => write_prefix_code(code, writer)?,
                (CodeTable::Ans(table), false) => write_ans_freqs(&table.freqs(), writer)?,
                _ => panic!("all the tables of a stream must use the selected code"),
            }
        }
        Ok(())
    }
}

/// Builds the table of a single context. A context without tokens gets a table with symbol 0
/// only.
fn build_code_table(histogram: &Histogram, params: &EntropyParams) -> Result<CodeTable, CodeError> {
    let alphabet_size = histogram.alphabet_size();
    let limit = params.max_alphabet_size();
    if alphabet_size > limit {
        return Err(CodeError::AlphabetTooLarge {
            alphabet_size,
            limit,
        });
    }

    let mut counts = vec![0_u32; alphabet_size];
    let available = histogram.counts().len().min(alphabet_size);
    counts[..available].copy_from_slice(&histogram.counts()[..available]);
    if histogram.is_empty() {
        counts[0] = 1;
    }

    Ok(match params.use_prefix_code {
        true => CodeTable::Prefix(PrefixCode::from_counts(&counts)?),
        false => CodeTable::Ans(AnsTable::from_counts(&counts)?),
    })
}

/// Builds the tables of all the histograms, in parallel. Nothing is written, so on error the
/// caller is free to retry with other parameters.
///
/// # Panics
/// If the split exponent of the bucketing parameters can't be described.
pub fn build_entropy_codes(
    histograms: &[Histogram],
    params: &EntropyParams,
) -> Result<EntropyEncodingData, CodeError> {
    assert!(
        params.uint_config.split_exponent() as usize <= params.config_log_alpha_size(),
        "split exponent {} exceeds the log2 of the alphabet size {}",
        params.uint_config.split_exponent(),
        params.config_log_alpha_size()
    );

    let tables = histograms
        .par_iter()
        .map(|histogram| build_code_table(histogram, params))
        .collect::<Result<Vec<CodeTable>, CodeError>>()?;

    debug!(
        "{:<8} | {:<8} | {:<5} | {:<12} | {:<12}",
        "Context", "Alphabet", "Live", "Entropy(b)", "Cost(b)"
    );
    for (context, (histogram, table)) in histograms.iter().zip(tables.iter()).enumerate() {
        debug!(
            "{:<8} | {:<8} | {:<5} | {:<12.1} | {:<12.1}",
            context,
            table.alphabet_size(),
            histogram.live_symbols(),
            entropy(histogram.counts()) * histogram.total_count() as f64,
            table.cost(histogram.counts()),
        );
    }

    info!(
        "Built {} {} tables using {} B",
        tables.len(),
        if params.use_prefix_code { "prefix" } else { "rank" },
        tables.iter().map(CodeTable::memory_footprint).sum::<usize>()
    );

    Ok(EntropyEncodingData {
        tables,
        use_prefix_code: params.use_prefix_code,
        uint_config: params.uint_config,
        log_alpha_size: params.log_alpha_size,
    })
}

/// Builds the tables of `histograms` and writes their descriptions.
///
/// If a table can't be built, nothing is written and the error carries the [`CodeError`].
pub fn write_histograms(
    histograms: &[Histogram],
    params: &EntropyParams,
    writer: &mut impl BitWriter,
) -> Result<EntropyEncodingData> {
    let codes = build_entropy_codes(histograms, params)?;
    describe_tables(&codes, writer)?;
    Ok(codes)
}

fn describe_tables(codes: &EntropyEncodingData, writer: &mut impl BitWriter) -> Result<()> {
    let start = writer.bit_position();
    codes.write_descriptions(writer)?;
    debug!(
        "Described {} tables in {} bits",
        codes.tables.len(),
        writer.bit_position() - start
    );
    Ok(())
}

/// Returns the bucket as a symbol of a table of `alphabet_size` symbols.
///
/// # Panics
/// If the bucket is not part of the table, i.e. the token was not counted when building it.
#[inline(always)]
fn table_symbol(bucket: u32, alphabet_size: usize, context: usize) -> Symbol {
    assert!(
        (bucket as usize) < alphabet_size,
        "bucket {} is not part of the table of context {}",
        bucket,
        context
    );
    bucket as Symbol
}

/// Writes the tokens, in order, with the tables of `codes`.
///
/// With prefix codes every token is its codeword followed by its extra bits. With rank tables
/// the tokens are fed in reverse to a single rANS coder whose output is written at the end.
///
/// # Panics
/// If a context is out of range or a token has not been counted when building the tables.
pub fn write_tokens(
    tokens: &[Token],
    codes: &EntropyEncodingData,
    context_map: Option<&[u8]>,
    writer: &mut impl BitWriter,
) -> Result<()> {
    let num_contexts = context_map.map_or(codes.tables.len(), |map| map.len());

    if codes.use_prefix_code {
        for token in tokens {
            let context = collapsed_context(context_map, num_contexts, token.context);
            let folded = codes.uint_config.fold(token.value);
            let CodeTable::Prefix(code) = &codes.tables[context] else {
                panic!("rank table of context {} in a prefix coded stream", context);
            };

            code.write_symbol(table_symbol(folded.bucket, code.len(), context), writer)?;
            writer.write(folded.extra_bit_count as usize, folded.extra_bits as u64)?;
        }
        return Ok(());
    }

    let mut coder = AnsCoder::with_capacity(tokens.len());
    for token in tokens.iter().rev() {
        let context = collapsed_context(context_map, num_contexts, token.context);
        let folded = codes.uint_config.fold(token.value);
        let CodeTable::Ans(table) = &codes.tables[context] else {
            panic!("prefix code of context {} in a rank coded stream", context);
        };

        coder.push_bits(folded.extra_bit_count, folded.extra_bits);
        coder.put_symbol(&table[table_symbol(folded.bucket, table.len(), context)]);
    }
    coder.flush(writer)
}

/// Encodes a whole unit: histograms, table descriptions and tokens, padded to a byte boundary.
///
/// If the alphabet is too large for rank tables, the unit falls back to prefix codes.
pub fn encode_unit(
    tokens: &[Token],
    num_contexts: usize,
    context_map: Option<&[u8]>,
    params: &EntropyParams,
    writer: &mut impl BitWriter,
) -> Result<EntropyEncodingData> {
    let histograms = build_histograms(tokens, num_contexts, context_map, params.uint_config);

    let codes = match build_entropy_codes(&histograms, params) {
        Err(CodeError::AlphabetTooLarge {
            alphabet_size,
            limit,
        }) if !params.use_prefix_code => {
            warn!(
                "Alphabet of {} symbols doesn't fit rank tables of {} symbols, \
                 falling back to prefix codes",
                alphabet_size, limit
            );
            build_entropy_codes(&histograms, &params.with_prefix_code(true))?
        }
        result => result?,
    };

    describe_tables(&codes, writer)?;
    write_tokens(tokens, &codes, context_map, writer)?;
    writer.zero_pad_to_byte()?;

    Ok(codes)
}

/// Encodes independent units in parallel and concatenates their streams in unit order.
pub fn encode_units<T: AsRef<[Token]> + Sync>(
    units: &[T],
    num_contexts: usize,
    context_map: Option<&[u8]>,
    params: &EntropyParams,
) -> Result<Vec<u8>> {
    let streams = units
        .par_iter()
        .map(|tokens| {
            let mut writer = VecBitWriter::new();
            encode_unit(tokens.as_ref(), num_contexts, context_map, params, &mut writer)?;
            writer.into_bytes()
        })
        .collect::<Result<Vec<Vec<u8>>>>()?;

    let mut writer = VecBitWriter::with_capacity(streams.iter().map(Vec::len).sum());
    for stream in streams.iter() {
        writer.append_bytes(stream)?;
    }

    info!(
        "Encoded {} units in {} B",
        streams.len(),
        writer.bit_position() / 8
    );
    writer.into_bytes()
}
