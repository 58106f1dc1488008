//! # csvstream
//!
//! Configurable-dialect CSV reading and writing over line-oriented streams.
//!
//! ## Features
//!
//! - **Dialects**: separator, quote and escape characters, strict quoting,
//!   quote-insensitive parsing, leading line skipping, carriage return policy
//! - **Multi-line records**: quoted fields spanning physical lines are
//!   reassembled into one logical record
//! - **Streaming**: records are read one at a time, through `read_next`, a
//!   callback or a look-ahead iterator
//! - **Writer policies**: quote-all or quote-when-needed, escaping, null
//!   fields, trailing terminator suppression
//! - **Compressed files**: `.csv.zst` and `.csv.gz` detected from the file
//!   extension
//!
//! ## Quick Start
//!
//! ### Reading
//!
//! ```
//! use csvstream::csv::Dialect;
//! use csvstream::CsvReader;
//!
//! let data = "name,comment\nAlice,\"likes \\\"rust\\\"\"\nBob,\"two\nlines\"\n";
//! let mut reader = CsvReader::from_reader(data.as_bytes(), Dialect::default())
//!     .has_header(true);
//!
//! let rows = reader.read_all()?;
//! assert_eq!(rows[0], vec!["Alice", "likes \"rust\""]);
//! assert_eq!(rows[1], vec!["Bob", "two\nlines"]);
//! # Ok::<(), csvstream::CsvError>(())
//! ```
//!
//! ### Writing
//!
//! ```
//! use csvstream::csv::Dialect;
//! use csvstream::CsvWriter;
//!
//! let dialect = Dialect::builder()
//!     .separator(';')
//!     .quote_all_fields(false)
//!     .build()?;
//!
//! let mut writer = CsvWriter::new(Vec::new(), dialect);
//! writer.write_row(["id", "label"])?;
//! writer.write_record([Some("1"), None])?;
//! writer.write_row(["2", "a;b"])?;
//!
//! let text = String::from_utf8(writer.into_inner()?).unwrap();
//! assert_eq!(text, "id;label\n1;\n2;\"a;b\"\n");
//! # Ok::<(), csvstream::CsvError>(())
//! ```

pub mod csv;
pub mod csv_reader;
pub mod csv_writer;
pub mod error;

pub use csv::{CsvParser, Dialect, DialectBuilder, ParseOutcome, Record};
pub use csv_reader::{CsvReader, FileCsvReader, RecordIterator};
pub use csv_writer::{CharSink, CsvWriter, FileCsvWriter, FileSink};
pub use error::{CsvError, Result};

// Re-export CompressionMethod from s-zip for convenience
pub use csv::CompressionMethod;
