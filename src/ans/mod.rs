pub mod encoder;
pub mod model4encoder;
pub mod quantize;

pub use encoder::AnsCoder;
pub use model4encoder::{inverse_frequency, AnsSymbolInfo, AnsTable};
pub use quantize::normalize_counts;
