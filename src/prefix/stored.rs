use std::path::Path;

use anyhow::{Context, Result};
use epserde::prelude::*;
use epserde::ser::Serialize;
use mem_dbg::{MemDbg, MemSize};

use crate::prefix::PrefixCode;

/// A family of prefix codes over the same alphabet, as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Epserde, MemDbg, MemSize)]
pub struct StoredPrefixCodes {
    pub alphabet_size: usize,
    pub codes: Vec<PrefixCode>,
}

impl StoredPrefixCodes {
    /// # Panics
    /// If the codes have different alphabet sizes.
    pub fn new(codes: Vec<PrefixCode>) -> Self {
        let alphabet_size = codes.first().map_or(0, PrefixCode::len);
        assert!(
            codes.iter().all(|code| code.len() == alphabet_size),
            "all the codes of a family must have the same alphabet size"
        );
        Self {
            alphabet_size,
            codes,
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.store(path)
            .with_context(|| format!("Could not store the codes in {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::load_full(path)
            .with_context(|| format!("Could not load the codes from {}", path.display()))
    }
}
