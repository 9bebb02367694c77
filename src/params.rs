use crate::token::HybridUintConfig;

/// The smallest log2 of the alphabet size a rank table can be built for.
pub const MIN_LOG_ALPHA_SIZE: usize = 5;

/// The biggest log2 of the alphabet size a rank table can be built for.
pub const MAX_LOG_ALPHA_SIZE: usize = 8;

/// Parameters shared by all the code tables of an encoding unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntropyParams {
    /// Whether to build prefix codes instead of rank tables.
    pub use_prefix_code: bool,

    /// How token values are bucketed.
    pub uint_config: HybridUintConfig,

    /// Log2 of the largest alphabet a rank table can describe.
    pub log_alpha_size: usize,
}

impl Default for EntropyParams {
    fn default() -> Self {
        Self {
            use_prefix_code: false,
            uint_config: HybridUintConfig::default(),
            log_alpha_size: MAX_LOG_ALPHA_SIZE,
        }
    }
}

impl EntropyParams {
    pub fn with_prefix_code(mut self, use_prefix_code: bool) -> Self {
        self.use_prefix_code = use_prefix_code;
        self
    }

    pub fn with_uint_config(mut self, uint_config: HybridUintConfig) -> Self {
        self.uint_config = uint_config;
        self
    }

    /// # Panics
    /// If `log_alpha_size` is outside `[MIN_LOG_ALPHA_SIZE, MAX_LOG_ALPHA_SIZE]`.
    pub fn with_log_alpha_size(mut self, log_alpha_size: usize) -> Self {
        assert!(
            (MIN_LOG_ALPHA_SIZE..=MAX_LOG_ALPHA_SIZE).contains(&log_alpha_size),
            "log_alpha_size must be in [{}, {}], got {}",
            MIN_LOG_ALPHA_SIZE,
            MAX_LOG_ALPHA_SIZE,
            log_alpha_size
        );
        self.log_alpha_size = log_alpha_size;
        self
    }

    /// The log2 of the alphabet size bound used to describe the bucketing parameters.
    pub fn config_log_alpha_size(&self) -> usize {
        if self.use_prefix_code {
            crate::PREFIX_MAX_DEPTH
        } else {
            self.log_alpha_size
        }
    }

    /// The largest alphabet size the selected code can describe.
    pub fn max_alphabet_size(&self) -> usize {
        if self.use_prefix_code {
            crate::PREFIX_MAX_ALPHABET_SIZE
        } else {
            1 << self.log_alpha_size
        }
    }
}
