pub mod combiner;
pub mod converter;
pub mod file_type;

pub use combiner::{CombineResult, Combiner};
pub use converter::ConverterClient;
