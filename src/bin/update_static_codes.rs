use std::io::stdout;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use jxl_entropy::prefix::static_codes::PrefixCodeFamily;
use jxl_entropy::prefix::update::update_static_codes;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Family {
    Dc,
    Ac,
}

impl From<Family> for PrefixCodeFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::Dc => PrefixCodeFamily::Dc,
            Family::Ac => PrefixCodeFamily::Ac,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    about = "Extends a family of static prefix codes to a larger alphabet and prints it",
    long_about = None
)]
struct Args {
    /// The family of codes to extend.
    #[arg(value_enum, ignore_case = true)]
    family: Family,

    /// The alphabet size of the extended codes.
    new_alphabet_size: usize,

    /// Also store the extended codes, with ε-serde, at this path.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Increase the verbosity of the logs.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

pub fn main() -> Result<()> {
    let args = Args::parse();

    stderrlog::new()
        .verbosity(2 + args.verbose as usize)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .map_err(|err| anyhow!("Could not initialize the logger: {}", err))?;

    update_static_codes(
        args.family.into(),
        args.new_alphabet_size,
        &mut stdout().lock(),
        args.store.as_deref(),
    )
}
