use jxl_entropy::token::Token;
use rand::prelude::{Distribution, SmallRng};
use rand::{Rng, SeedableRng};
use rand_distr::Zipf;

pub mod histograms;
pub mod tables;
pub mod writer;

/// Number of tokens used to bench.
const TOKENS_LENGTH: usize = 500_000;

/// Maximum value that the zipfian distribution can output.
const MAXIMUM_VALUE: u64 = 1 << 24;

/// Number of contexts the tokens are spread over.
const NUM_CONTEXTS: u32 = 16;

fn get_tokens(seed: u64) -> Vec<Token> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let distribution = Zipf::new(MAXIMUM_VALUE, 1.0).unwrap();

    (0..TOKENS_LENGTH)
        .map(|_| {
            let value = distribution.sample(&mut rng) as u32 - 1;
            Token::new(rng.gen_range(0..NUM_CONTEXTS), value)
        })
        .collect()
}
