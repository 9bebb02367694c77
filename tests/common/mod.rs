/*
 * Utility functions used by the tests: token generators and a minimal decoder of the streams
 * produced by the writer, used to check that they can be read back.
 */
#![allow(dead_code)]

use std::collections::HashMap;

use dsi_bitstream::impls::{BufBitReader, MemWordReader};
use dsi_bitstream::traits::{BitRead, LE};

use jxl_entropy::entropy_code::store_ans::{flat_freqs, LOGCOUNT_DEPTHS, LOGCOUNT_RLE};
use jxl_entropy::entropy_code::store_prefix::CODE_LENGTH_ORDER;
use jxl_entropy::prefix::PrefixCode;
use jxl_entropy::token::{HybridUintConfig, Token};
use jxl_entropy::traits::folding::Fold;
use jxl_entropy::utils::ceil_log2_nonzero;
use jxl_entropy::{Freq, RawSymbol, ANS_LOG_TAB_SIZE, ANS_SIGNATURE, ANS_TAB_SIZE, PREFIX_MAX_DEPTH};
use rand::prelude::{Distribution, SmallRng};
use rand::{Rng, SeedableRng};
use rand_distr::Zipf;

/// Number of tokens of the generated units.
pub const TOKENS_LENGTH: usize = 20_000;

/// Maximum value that the zipfian distribution can output.
const MAXIMUM_VALUE: u64 = 1 << 20;

/// Creates [`TOKENS_LENGTH`] tokens whose values are sampled from a Zipfian distribution that
/// can output values up to [`MAXIMUM_VALUE`], spread uniformly over `num_contexts` contexts.
pub fn get_tokens(seed: u64, num_contexts: u32) -> Vec<Token> {
    get_tokens_with(seed, num_contexts, TOKENS_LENGTH, MAXIMUM_VALUE, 1.0)
}

pub fn get_tokens_with(
    seed: u64,
    num_contexts: u32,
    length: usize,
    maximum_value: u64,
    exponent: f64,
) -> Vec<Token> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let distribution = Zipf::new(maximum_value, exponent).unwrap();

    (0..length)
        .map(|_| {
            let value = distribution.sample(&mut rng) as RawSymbol - 1;
            Token::new(rng.gen_range(0..num_contexts), value)
        })
        .collect()
}

/// Reads bits least significant bit first, the way the writer emits them, keeping track of
/// the position.
pub struct BitReader {
    reader: BufBitReader<LE, MemWordReader<u64, Vec<u64>>>,
    position: usize,
    len: usize,
}

impl BitReader {
    pub fn new(bytes: &[u8]) -> Self {
        let mut words = bytes
            .chunks(8)
            .map(|chunk| {
                let mut word = [0_u8; 8];
                word[..chunk.len()].copy_from_slice(chunk);
                u64::from_le_bytes(word).to_le()
            })
            .collect::<Vec<u64>>();
        // room for the read-ahead of the buffered reader
        words.extend([0, 0]);

        Self {
            reader: BufBitReader::new(MemWordReader::new(words)),
            position: 0,
            len: bytes.len() * 8,
        }
    }

    pub fn read(&mut self, n_bits: usize) -> u64 {
        if n_bits == 0 {
            return 0;
        }
        assert!(
            self.position + n_bits <= self.len,
            "reading past the end of the stream"
        );
        self.position += n_bits;
        self.reader.read_bits(n_bits).unwrap()
    }

    pub fn jump_to_byte_boundary(&mut self) {
        let padding = self.position.next_multiple_of(8) - self.position;
        if padding > 0 {
            self.reader.skip_bits(padding).unwrap();
            self.position += padding;
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position == self.len
    }
}

pub fn read_var_len_uint8(reader: &mut BitReader) -> usize {
    read_var_len(reader, 3)
}

pub fn read_var_len_uint16(reader: &mut BitReader) -> usize {
    read_var_len(reader, 4)
}

fn read_var_len(reader: &mut BitReader, exponent_bits: usize) -> usize {
    if reader.read(1) == 0 {
        return 0;
    }
    let exponent = reader.read(exponent_bits) as usize;
    (1 << exponent) + reader.read(exponent) as usize
}

pub fn read_uint_config(reader: &mut BitReader, log_alpha_size: usize) -> HybridUintConfig {
    let split_exponent = reader.read(ceil_log2_nonzero(log_alpha_size as u32 + 1) as usize) as u32;
    if split_exponent as usize == log_alpha_size {
        return HybridUintConfig::new(split_exponent, 0, 0);
    }
    let msb = reader.read(ceil_log2_nonzero(split_exponent + 1) as usize) as u32;
    let lsb = reader.read(ceil_log2_nonzero(split_exponent - msb + 1) as usize) as u32;
    HybridUintConfig::new(split_exponent, msb, lsb)
}

/// A prefix code ready to be read one bit at a time.
pub struct PrefixDecoder {
    pub code: PrefixCode,
    lookup: HashMap<(u8, u16), u16>,
}

impl PrefixDecoder {
    pub fn new(code: PrefixCode) -> Self {
        let lookup = code
            .depths
            .iter()
            .zip(code.codewords.iter())
            .enumerate()
            .filter(|(_, (depth, _))| **depth > 0)
            .map(|(symbol, (depth, codeword))| ((*depth, *codeword), symbol as u16))
            .collect();
        Self { code, lookup }
    }

    pub fn read_symbol(&self, reader: &mut BitReader) -> u16 {
        let mut codeword = 0_u16;
        for depth in 1..=PREFIX_MAX_DEPTH as u8 {
            codeword = (codeword << 1) | reader.read(1) as u16;
            if let Some(symbol) = self.lookup.get(&(depth, codeword)) {
                return *symbol;
            }
        }
        panic!("invalid codeword at bit {}", reader.position());
    }
}

pub fn read_prefix_code(reader: &mut BitReader, alphabet_size: usize) -> PrefixCode {
    let mut depths = vec![0_u8; alphabet_size];

    if reader.read(2) == 1 {
        let symbols_count = reader.read(2) as usize + 1;
        let symbol_bits = ceil_log2_nonzero(alphabet_size as u32) as usize;
        let symbols = (0..symbols_count)
            .map(|_| reader.read(symbol_bits) as usize)
            .collect::<Vec<_>>();
        let shape: &[u8] = match symbols_count {
            1 => &[1],
            2 => &[1, 1],
            3 => &[1, 2, 2],
            _ if reader.read(1) == 0 => &[2, 2, 2, 2],
            _ => &[1, 2, 3, 3],
        };
        for (symbol, depth) in symbols.iter().zip(shape) {
            depths[*symbol] = *depth;
        }
        return PrefixCode::from_depths(depths);
    }

    let stored = reader.read(4) as usize + 4;
    let mut code_length_depths = vec![0_u8; CODE_LENGTH_ORDER.len()];
    for code in CODE_LENGTH_ORDER.iter().take(stored) {
        code_length_depths[*code] = reader.read(3) as u8;
    }
    let code_length_code = PrefixDecoder::new(PrefixCode::from_depths(code_length_depths));

    let mut filled = 0;
    let mut previous_nonzero = 0;
    while filled < alphabet_size {
        let (depth, repeat) = match code_length_code.read_symbol(reader) {
            16 => (previous_nonzero, 3 + reader.read(2) as usize),
            17 => (0, 3 + reader.read(3) as usize),
            18 => (0, 11 + reader.read(7) as usize),
            depth => (depth as u8, 1),
        };
        if depth > 0 {
            previous_nonzero = depth;
        }
        depths[filled..filled + repeat].fill(depth);
        filled += repeat;
    }

    PrefixCode::from_depths(depths)
}

pub fn read_ans_freqs(reader: &mut BitReader) -> Vec<Freq> {
    if reader.read(1) == 1 {
        let symbols_count = reader.read(1) as usize + 1;
        let symbols = (0..symbols_count)
            .map(|_| read_var_len_uint8(reader))
            .collect::<Vec<_>>();
        let mut freqs = vec![0; symbols.iter().max().unwrap() + 1];
        if symbols_count == 1 {
            freqs[symbols[0]] = ANS_TAB_SIZE as Freq;
        } else {
            let first = reader.read(ANS_LOG_TAB_SIZE) as Freq;
            freqs[symbols[0]] = first;
            freqs[symbols[1]] = ANS_TAB_SIZE as Freq - first;
        }
        return freqs;
    }

    if reader.read(1) == 1 {
        return flat_freqs(read_var_len_uint8(reader) + 1);
    }

    let alphabet_size = read_var_len_uint8(reader) + 3;
    let logcount_code = PrefixDecoder::new(PrefixCode::from_depths(LOGCOUNT_DEPTHS.to_vec()));

    let mut logcounts = vec![0_usize; alphabet_size];
    let mut repeated = vec![false; alphabet_size];
    let mut symbol = 0;
    while symbol < alphabet_size {
        let logcount = logcount_code.read_symbol(reader) as usize;
        if logcount == LOGCOUNT_RLE {
            let repeats = read_var_len_uint8(reader) + 3;
            for position in symbol..symbol + repeats {
                logcounts[position] = logcounts[symbol - 1];
                repeated[position] = true;
            }
            symbol += repeats;
        } else {
            logcounts[symbol] = logcount;
            symbol += 1;
        }
    }

    let max_logcount = *logcounts.iter().max().unwrap();
    let omit_pos = logcounts.iter().position(|lc| *lc == max_logcount).unwrap();

    let mut freqs = vec![0 as Freq; alphabet_size];
    for position in 0..alphabet_size {
        if position == omit_pos {
            continue;
        }
        freqs[position] = match (repeated[position], logcounts[position]) {
            (true, _) => freqs[position - 1],
            (false, 0) => 0,
            (false, 1) => 1,
            (false, logcount) => {
                ((1 << (logcount - 1)) + reader.read(logcount - 1)) as Freq
            }
        };
    }
    freqs[omit_pos] =
        (ANS_TAB_SIZE - freqs.iter().map(|freq| *freq as u32).sum::<u32>()) as Freq;
    freqs
}

/// The tables of a stream, as read back.
pub enum DecodedTable {
    Prefix(PrefixDecoder),
    Ans {
        freqs: Vec<Freq>,
        cumul: Vec<u32>,
        reverse_rank: Vec<u16>,
    },
}

pub struct DecodedCodes {
    pub use_prefix_code: bool,
    pub log_alpha_size: usize,
    pub uint_configs: Vec<HybridUintConfig>,
    pub tables: Vec<DecodedTable>,
}

impl DecodedCodes {
    pub fn freqs(&self, context: usize) -> &[Freq] {
        match &self.tables[context] {
            DecodedTable::Ans { freqs, .. } => freqs,
            DecodedTable::Prefix(_) => panic!("not a rank table"),
        }
    }

    pub fn prefix_code(&self, context: usize) -> &PrefixCode {
        match &self.tables[context] {
            DecodedTable::Prefix(decoder) => &decoder.code,
            DecodedTable::Ans { .. } => panic!("not a prefix code"),
        }
    }
}

pub fn read_histograms(reader: &mut BitReader, num_tables: usize) -> DecodedCodes {
    let use_prefix_code = reader.read(1) == 1;
    let log_alpha_size = match use_prefix_code {
        true => PREFIX_MAX_DEPTH,
        false => reader.read(2) as usize + 5,
    };

    let uint_configs = (0..num_tables)
        .map(|_| read_uint_config(reader, log_alpha_size))
        .collect::<Vec<_>>();

    let tables = if use_prefix_code {
        let sizes = (0..num_tables)
            .map(|_| read_var_len_uint16(reader) + 1)
            .collect::<Vec<_>>();
        sizes
            .into_iter()
            .map(|size| DecodedTable::Prefix(PrefixDecoder::new(read_prefix_code(reader, size))))
            .collect()
    } else {
        (0..num_tables)
            .map(|_| {
                let freqs = read_ans_freqs(reader);
                let mut cumul = Vec::with_capacity(freqs.len());
                let mut reverse_rank = Vec::with_capacity(ANS_TAB_SIZE as usize);
                for (symbol, freq) in freqs.iter().enumerate() {
                    cumul.push(reverse_rank.len() as u32);
                    reverse_rank.extend(std::iter::repeat(symbol as u16).take(*freq as usize));
                }
                DecodedTable::Ans {
                    freqs,
                    cumul,
                    reverse_rank,
                }
            })
            .collect()
    };

    DecodedCodes {
        use_prefix_code,
        log_alpha_size,
        uint_configs,
        tables,
    }
}

/// Reads the values of the tokens, whose contexts are known to the caller.
pub fn read_tokens(
    reader: &mut BitReader,
    codes: &DecodedCodes,
    contexts: &[u32],
    context_map: Option<&[u8]>,
) -> Vec<RawSymbol> {
    let collapse = |context: u32| match context_map {
        Some(map) => map[context as usize] as usize,
        None => context as usize,
    };

    if codes.use_prefix_code {
        return contexts
            .iter()
            .map(|context| {
                let context = collapse(*context);
                let DecodedTable::Prefix(decoder) = &codes.tables[context] else {
                    panic!("rank table in a prefix coded stream");
                };
                let config = codes.uint_configs[context];
                let bucket = decoder.read_symbol(reader) as u32;
                let extra_bits = reader.read(config.extra_bit_count(bucket) as usize) as u32;
                config.unfold(bucket, extra_bits)
            })
            .collect();
    }

    let mut state = reader.read(32) as u32;
    let values = contexts
        .iter()
        .map(|context| {
            let context = collapse(*context);
            let DecodedTable::Ans {
                freqs,
                cumul,
                reverse_rank,
            } = &codes.tables[context]
            else {
                panic!("prefix code in a rank coded stream");
            };
            let config = codes.uint_configs[context];

            let slot = state & (ANS_TAB_SIZE - 1);
            let bucket = reverse_rank[slot as usize] as usize;
            state = freqs[bucket] as u32 * (state >> ANS_LOG_TAB_SIZE) + slot - cumul[bucket];
            if state < 1 << 16 {
                state = (state << 16) | reader.read(16) as u32;
            }

            let extra_bits = reader.read(config.extra_bit_count(bucket as u32) as usize) as u32;
            config.unfold(bucket as u32, extra_bits)
        })
        .collect();

    assert_eq!(state, ANS_SIGNATURE << 16, "the final state must be the signature");
    values
}

/// Reads a whole unit written by `encode_unit`.
pub fn read_unit(
    reader: &mut BitReader,
    num_tables: usize,
    contexts: &[u32],
    context_map: Option<&[u8]>,
) -> (DecodedCodes, Vec<RawSymbol>) {
    let codes = read_histograms(reader, num_tables);
    let values = read_tokens(reader, &codes, contexts, context_map);
    reader.jump_to_byte_boundary();
    (codes, values)
}

pub fn values(tokens: &[Token]) -> Vec<RawSymbol> {
    tokens.iter().map(|token| token.value).collect()
}

pub fn contexts(tokens: &[Token]) -> Vec<u32> {
    tokens.iter().map(|token| token.context).collect()
}
