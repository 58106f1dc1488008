//! CSV dialect, tokenizer, encoder and line sources

mod dialect;
mod encoder;
mod line_source;
mod parser;

pub use dialect::{
    Dialect, DialectBuilder, DEFAULT_ESCAPE_CHARACTER, DEFAULT_LINE_END,
    DEFAULT_QUOTE_CHARACTER, DEFAULT_SEPARATOR, NULL_CHARACTER,
};
pub use encoder::CsvEncoder;
pub use line_source::{LineReader, LineSource};
pub use parser::{CsvParser, ParseOutcome};

// Re-export CompressionMethod from s-zip for convenience
pub use s_zip::CompressionMethod;

/// One logical CSV row
pub type Record = Vec<String>;
