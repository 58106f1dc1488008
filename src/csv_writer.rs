//! CSV writing: dialect-compliant serialization to a character sink

use crate::csv::{CompressionMethod, CsvEncoder, Dialect};
use crate::error::{CsvError, Result};
use log::{debug, warn};
use s_zip::StreamingZipWriter;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Destination for serialized CSV text
///
/// Every [`std::io::Write`] is a sink; `close` then just flushes.
pub trait CharSink {
    fn write_str(&mut self, text: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    /// Flush and finalize; called at most once by [`CsvWriter`]
    fn close(&mut self) -> io::Result<()>;
}

impl<W: Write> CharSink for W {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }

    fn close(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}

/// File output, plain or as a single entry of a compressed archive
pub enum FileSink {
    Plain(BufWriter<File>),
    Zip(Option<StreamingZipWriter<File>>),
}

impl CharSink for FileSink {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        match self {
            FileSink::Plain(writer) => writer.write_all(text.as_bytes()),
            FileSink::Zip(Some(zip)) => zip
                .write_data(text.as_bytes())
                .map_err(|e| io::Error::other(format!("Failed to write to ZIP: {}", e))),
            FileSink::Zip(None) => Err(io::Error::other("ZIP archive already finished")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileSink::Plain(writer) => Write::flush(writer),
            FileSink::Zip(_) => Ok(()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        match self {
            FileSink::Plain(writer) => Write::flush(writer),
            FileSink::Zip(zip) => match zip.take() {
                Some(zip) => zip
                    .finish()
                    .map(|_| ())
                    .map_err(|e| io::Error::other(format!("Failed to finish ZIP: {}", e))),
                None => Ok(()),
            },
        }
    }
}

/// Writer over a plain or compressed CSV file
pub type FileCsvWriter = CsvWriter<FileSink>;

/// CSV writer serializing records according to a [`Dialect`]
///
/// Records are terminated with the dialect's line terminator, or, with
/// [`Dialect::avoid_trailing_terminator`], separated by it so the output
/// does not end with one. The sink is closed by [`CsvWriter::close`] or on
/// drop.
///
/// # Examples
///
/// ```
/// use csvstream::csv::Dialect;
/// use csvstream::CsvWriter;
///
/// let dialect = Dialect::builder().quote_all_fields(false).build().unwrap();
/// let mut out = Vec::new();
/// {
///     let mut writer = CsvWriter::new(&mut out, dialect);
///     writer.write_row(["Name", "Quote"]).unwrap();
///     writer.write_record([Some("Alice"), None, Some("a,b")]).unwrap();
///     assert_eq!(writer.written_lines(), 2);
/// }
/// assert_eq!(String::from_utf8(out).unwrap(), "Name,Quote\nAlice,,\"a,b\"\n");
/// ```
pub struct CsvWriter<W: CharSink> {
    sink: Option<W>,
    dialect: Dialect,

    // State
    written_lines: u64,
    buffer: String,
}

impl FileCsvWriter {
    /// Create a new CSV file with the default dialect - auto-detects compression
    ///
    /// # File Extensions
    /// - `.csv` → Uncompressed
    /// - `.csv.zst` or `.csv.zip` → Zstd compression (level 3)
    /// - `.csv.gz` → Deflate compression (level 6)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::CsvWriter;
    ///
    /// // Plain CSV
    /// let mut writer = CsvWriter::create("data.csv").unwrap();
    ///
    /// // Zstd compressed
    /// let mut writer = CsvWriter::create("data.csv.zst").unwrap();
    /// ```
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::create_with(path, Dialect::default())
    }

    /// Create a new CSV file with a custom dialect
    pub fn create_with<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_str().unwrap_or("");

        if path_str.ends_with(".csv.zst") || path_str.ends_with(".csv.zip") {
            Self::with_compression(path_ref, CompressionMethod::Zstd, 3, dialect)
        } else if path_str.ends_with(".csv.gz") {
            Self::with_compression(path_ref, CompressionMethod::Deflate, 6, dialect)
        } else {
            // Plain CSV - direct file write
            let file = File::create(path_ref)
                .map_err(|e| CsvError::WriteError(format!("Failed to create CSV file: {}", e)))?;
            debug!("Created {}", path_ref.display());
            Ok(CsvWriter::new(FileSink::Plain(BufWriter::new(file)), dialect))
        }
    }

    /// Create a compressed CSV file with explicit method and level
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `method` - Compression method (Zstd or Deflate)
    /// * `level` - Compression level:
    ///   - Zstd: 1-21 (recommend 3 for balanced)
    ///   - Deflate: 0-9 (recommend 6 for balanced)
    pub fn with_compression<P: AsRef<Path>>(
        path: P,
        method: CompressionMethod,
        level: u32,
        dialect: Dialect,
    ) -> Result<Self> {
        let path_ref = path.as_ref();

        // Create ZIP with single CSV entry
        let mut zip = StreamingZipWriter::with_method(path_ref, method, level)
            .map_err(|e| CsvError::WriteError(format!("Failed to create ZIP writer: {}", e)))?;

        // Entry name: extract from path or use "data.csv"
        let entry_name = path_ref
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| format!("{}.csv", s.trim_end_matches(".csv")))
            .unwrap_or_else(|| "data.csv".to_string());

        zip.start_entry(&entry_name)
            .map_err(|e| CsvError::WriteError(format!("Failed to start ZIP entry: {}", e)))?;
        debug!("Writing entry {} into {}", entry_name, path_ref.display());

        Ok(CsvWriter::new(FileSink::Zip(Some(zip)), dialect))
    }
}

impl<W: CharSink> CsvWriter<W> {
    /// Wrap a sink; the sink is owned until close or drop
    pub fn new(sink: W, dialect: Dialect) -> Self {
        CsvWriter {
            sink: Some(sink),
            dialect,
            written_lines: 0,
            buffer: String::with_capacity(4096),
        }
    }

    /// Dialect used to serialize records
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Mutable access to the dialect; its setters keep it valid
    pub fn dialect_mut(&mut self) -> &mut Dialect {
        &mut self.dialect
    }

    /// Number of records written so far
    pub fn written_lines(&self) -> u64 {
        self.written_lines
    }

    /// Write a record whose fields may be null
    ///
    /// `None` fields are written as nothing at all, never quoted.
    pub fn write_record<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let quote_all = self.dialect.quote_all_fields();
        self.write_record_quoted(fields, quote_all)
    }

    /// Write a record, overriding the dialect's quote-all setting
    pub fn write_record_quoted<I, S>(&mut self, fields: I, quote_all: bool) -> Result<()>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let sink = self
            .sink
            .as_mut()
            .ok_or_else(|| CsvError::InvalidState("CSV writer is closed".to_string()))?;

        // Reuse buffer
        self.buffer.clear();
        let terminator = self.dialect.line_terminator();
        let separate = self.dialect.avoid_trailing_terminator();
        if separate && self.written_lines > 0 {
            self.buffer.push_str(terminator);
        }
        CsvEncoder::new(&self.dialect).encode_record(fields, quote_all, &mut self.buffer);
        if !separate {
            self.buffer.push_str(terminator);
        }

        sink.write_str(&self.buffer)?;
        self.written_lines += 1;
        Ok(())
    }

    /// Write a row of strings
    ///
    /// # Examples
    ///
    /// ```
    /// use csvstream::csv::Dialect;
    /// use csvstream::CsvWriter;
    ///
    /// let mut writer = CsvWriter::new(Vec::new(), Dialect::default());
    /// writer.write_row(["Name", "Age", "City"]).unwrap();
    /// writer.write_row(vec!["Alice".to_string(), "30".to_string(), "NYC".to_string()]).unwrap();
    /// let out = writer.into_inner().unwrap();
    /// assert_eq!(out, b"\"Name\",\"Age\",\"City\"\n\"Alice\",\"30\",\"NYC\"\n");
    /// ```
    pub fn write_row<I, S>(&mut self, data: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.write_record(data.into_iter().map(Some))
    }

    /// Write several records of nullable fields
    pub fn write_all<I, R, S>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Write several rows of strings
    pub fn write_rows<I, R, S>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Flush buffered output to the sink; no-op once closed
    pub fn flush(&mut self) -> Result<()> {
        match self.sink.as_mut() {
            Some(sink) => Ok(sink.flush()?),
            None => Ok(()),
        }
    }

    /// Flush and release the sink; closing twice is a no-op
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut sink) = self.sink.take() {
            sink.close()?;
            debug!("Closed CSV writer after {} record(s)", self.written_lines);
        }
        Ok(())
    }

    /// Whether [`CsvWriter::close`] has released the sink
    pub fn is_closed(&self) -> bool {
        self.sink.is_none()
    }

    /// Flush and hand back the sink without closing it
    pub fn into_inner(mut self) -> Result<W> {
        let mut sink = self
            .sink
            .take()
            .ok_or_else(|| CsvError::InvalidState("CSV writer is closed".to_string()))?;
        sink.flush()?;
        Ok(sink)
    }
}

impl<W: CharSink> Drop for CsvWriter<W> {
    fn drop(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.close() {
                warn!("Failed to close CSV writer on drop: {}", e);
            }
        }
    }
}
