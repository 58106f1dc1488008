//! CSV reading: logical record assembly over a line source

use crate::csv::{CsvParser, Dialect, LineReader, LineSource, ParseOutcome, Record};
use crate::error::{CsvError, Result};
use log::{debug, trace, warn};
use s_zip::StreamingZipReader;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::iter::FusedIterator;
use std::path::Path;

/// Reader over a plain or decompressed CSV file
pub type FileCsvReader = CsvReader<LineReader<Box<dyn BufRead>>>;

/// CSV reader yielding whole logical records
///
/// A record may span several physical lines when a quoted field contains
/// line breaks. Leading lines configured through
/// [`Dialect::skip_lines`] are skipped once, before the first record.
///
/// # Examples
///
/// ```
/// use csvstream::csv::Dialect;
/// use csvstream::CsvReader;
///
/// let data = "id,note\n1,\"two\nlines\"\n2,plain\n";
/// let mut reader = CsvReader::from_reader(data.as_bytes(), Dialect::default());
///
/// while let Some(record) = reader.read_next().unwrap() {
///     println!("{:?}", record);
/// }
/// assert_eq!(reader.records_read(), 3);
/// assert_eq!(reader.lines_read(), 4);
/// ```
///
/// # With Headers
///
/// ```
/// use csvstream::csv::Dialect;
/// use csvstream::CsvReader;
///
/// let mut reader = CsvReader::from_reader("ID,Name\n1,Alice".as_bytes(), Dialect::default())
///     .has_header(true);
///
/// let rows = reader.read_all().unwrap();
/// assert_eq!(reader.headers(), Some(&["ID".to_string(), "Name".to_string()][..]));
/// assert_eq!(rows, vec![vec!["1", "Alice"]]);
/// ```
pub struct CsvReader<S> {
    source: Option<S>,
    parser: CsvParser,

    // State
    lines_skipped: bool,
    exhausted: bool,
    lines_read: u64,
    records_read: u64,

    // Configuration
    verify_reader: bool,
    has_header: bool,
    headers: Option<Record>,
}

impl FileCsvReader {
    /// Open CSV file with the default dialect - auto-detects compression
    ///
    /// # File Extensions
    /// - `.csv` → Uncompressed, direct read
    /// - `.csv.zst`, `.csv.zip` → Zstd decompression
    /// - `.csv.gz` → Deflate/Gzip decompression
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::CsvReader;
    ///
    /// // Plain CSV
    /// let reader = CsvReader::open("data.csv").unwrap();
    ///
    /// // Compressed CSV (auto-detected)
    /// let reader = CsvReader::open("data.csv.zst").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, Dialect::default())
    }

    /// Open CSV file with a custom dialect
    pub fn open_with<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_str().unwrap_or("");

        let input: Box<dyn BufRead> = if path_str.ends_with(".csv.zst")
            || path_str.ends_with(".csv.zip")
            || path_str.ends_with(".csv.gz")
        {
            // Compressed - use s-zip
            let mut zip = StreamingZipReader::open(path_ref)
                .map_err(|e| CsvError::ReadError(format!("Failed to open ZIP: {}", e)))?;

            // Find first .csv entry
            let entry_name = zip
                .entries()
                .iter()
                .find(|e| e.name.ends_with(".csv"))
                .or_else(|| zip.entries().first())
                .ok_or_else(|| CsvError::ReadError("No CSV entry found in archive".to_string()))?
                .name
                .clone();

            debug!("Reading entry {} from {}", entry_name, path_ref.display());
            let data = zip
                .read_entry_by_name(&entry_name)
                .map_err(|e| CsvError::ReadError(format!("Failed to read ZIP entry: {}", e)))?;
            Box::new(Cursor::new(data))
        } else {
            let file = File::open(path_ref)
                .map_err(|e| CsvError::ReadError(format!("Failed to open CSV file: {}", e)))?;
            debug!("Opened {}", path_ref.display());
            Box::new(BufReader::new(file))
        };

        let source = LineReader::new(input, dialect.keep_carriage_return());
        Ok(CsvReader::new(source, dialect))
    }
}

impl<R: Read> CsvReader<LineReader<BufReader<R>>> {
    /// Read CSV from any byte stream, line breaks handled per `dialect`
    pub fn from_reader(reader: R, dialect: Dialect) -> Self {
        let source = LineReader::new(BufReader::new(reader), dialect.keep_carriage_return());
        CsvReader::new(source, dialect)
    }
}

impl<S: LineSource> CsvReader<S> {
    /// Wrap a line source; the source is owned until [`CsvReader::close`]
    pub fn new(source: S, dialect: Dialect) -> Self {
        Self::with_parser(source, CsvParser::new(dialect))
    }

    /// Wrap a line source with an already configured parser
    pub fn with_parser(source: S, mut parser: CsvParser) -> Self {
        parser.reset();
        CsvReader {
            source: Some(source),
            parser,
            lines_skipped: false,
            exhausted: false,
            lines_read: 0,
            records_read: 0,
            verify_reader: true,
            has_header: false,
            headers: None,
        }
    }

    /// Check the source for remaining input before each line (builder pattern)
    ///
    /// Disable for sources whose [`LineSource::has_more`] cannot answer
    /// without consuming input.
    pub fn verify_reader(mut self, verify: bool) -> Self {
        self.verify_reader = verify;
        self
    }

    /// Indicate that the first record holds headers (builder pattern)
    ///
    /// When set to `true`, the first record is stored and accessible via
    /// `headers()` instead of being returned.
    pub fn has_header(mut self, has: bool) -> Self {
        self.has_header = has;
        self
    }

    /// Get header record if one was read
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// The parser driving this reader
    pub fn parser(&self) -> &CsvParser {
        &self.parser
    }

    /// Dialect used to parse records
    pub fn dialect(&self) -> &Dialect {
        self.parser.dialect()
    }

    /// Physical lines consumed so far, skipped lines included
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Logical records consumed so far, header included
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Read the next logical record
    ///
    /// Returns `Ok(None)` once input is exhausted or the reader is closed.
    /// An unterminated quoted field running into end of input is returned
    /// as the final record.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvstream::csv::Dialect;
    /// use csvstream::CsvReader;
    ///
    /// let mut reader = CsvReader::from_reader("a,b\nc,d".as_bytes(), Dialect::default());
    /// assert_eq!(reader.read_next().unwrap(), Some(vec!["a".to_string(), "b".to_string()]));
    /// assert_eq!(reader.read_next().unwrap(), Some(vec!["c".to_string(), "d".to_string()]));
    /// assert_eq!(reader.read_next().unwrap(), None);
    /// ```
    pub fn read_next(&mut self) -> Result<Option<Record>> {
        let record = self.read_record()?;
        if self.has_header && self.headers.is_none() {
            if let Some(header) = record {
                self.headers = Some(header);
                return self.read_record();
            }
        }
        Ok(record)
    }

    /// Read every remaining record into memory
    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Stream every remaining record to `consumer`
    ///
    /// Nothing is buffered beyond the current record. An error from the
    /// consumer stops reading and is returned. Returns the number of records
    /// handed to the consumer.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvstream::csv::Dialect;
    /// use csvstream::CsvReader;
    ///
    /// let mut reader = CsvReader::from_reader("1\n2\n3".as_bytes(), Dialect::default());
    /// let mut total = 0;
    /// let count = reader
    ///     .read_all_with(|record| {
    ///         total += record[0].parse::<i32>().unwrap();
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// assert_eq!((count, total), (3, 6));
    /// ```
    pub fn read_all_with<F>(&mut self, mut consumer: F) -> Result<u64>
    where
        F: FnMut(Record) -> Result<()>,
    {
        let mut count = 0;
        while let Some(record) = self.read_next()? {
            consumer(record)?;
            count += 1;
        }
        Ok(count)
    }

    /// Turn the reader into a one-ahead record iterator
    pub fn records(self) -> RecordIterator<S> {
        RecordIterator::new(self)
    }

    /// Release the source; later reads return `Ok(None)`
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!(
                "Closed CSV reader after {} line(s), {} record(s)",
                self.lines_read, self.records_read
            );
        }
        self.parser.reset();
    }

    /// Whether [`CsvReader::close`] has released the source
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        let mut line = match self.next_line()? {
            Some(line) => line,
            None => return Ok(None),
        };

        loop {
            if let ParseOutcome::Record(fields) = self.parser.parse_line_multi(&line)? {
                self.records_read += 1;
                return Ok(Some(fields));
            }

            let next = self.next_line().inspect_err(|_| {
                // The half-read record is lost with the failed line
                self.parser.reset();
            });
            line = match next? {
                Some(next) => {
                    trace!("Record continues on line {}", self.lines_read);
                    next
                }
                None => {
                    warn!(
                        "Un-terminated quoted field at end of input (line {})",
                        self.lines_read
                    );
                    let fields = self.parser.finish().unwrap_or_default();
                    self.records_read += 1;
                    return Ok(Some(fields));
                }
            };
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if self.exhausted {
            return Ok(None);
        }
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        if !self.lines_skipped {
            let skip = self.parser.dialect().skip_lines();
            for _ in 0..skip {
                if source.read_line()?.is_none() {
                    self.exhausted = true;
                    break;
                }
                self.lines_read += 1;
            }
            self.lines_skipped = true;
            if skip > 0 {
                debug!("Skipped {} leading line(s)", self.lines_read);
            }
            if self.exhausted {
                return Ok(None);
            }
        }

        if self.verify_reader && !source.has_more()? {
            self.exhausted = true;
            return Ok(None);
        }

        match source.read_line()? {
            Some(line) => {
                self.lines_read += 1;
                Ok(Some(line))
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}

impl<S: LineSource> IntoIterator for CsvReader<S> {
    type Item = Result<Record>;
    type IntoIter = RecordIterator<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.records()
    }
}

/// Iterator over CSV records with one record of look-ahead
///
/// The next record is fetched at construction and after every call to
/// `next`. A read error hit while fetching ahead is stored in place of the
/// record, so it surfaces on the following call to `next`, one call after
/// the read that failed. Until then [`RecordIterator::has_next`] is `true`
/// and [`RecordIterator::has_failed`] tells the two apart. The error is
/// yielded once, after which the iterator is finished for good.
///
/// # Examples
///
/// ```
/// use csvstream::csv::Dialect;
/// use csvstream::CsvReader;
///
/// let mut records = CsvReader::from_reader("a\nb".as_bytes(), Dialect::default()).records();
/// assert!(records.has_next());
/// assert_eq!(records.next().unwrap().unwrap(), vec!["a"]);
/// assert_eq!(records.next().unwrap().unwrap(), vec!["b"]);
/// assert!(!records.has_next());
/// ```
pub struct RecordIterator<S> {
    reader: CsvReader<S>,
    lookahead: Option<Result<Record>>,
}

impl<S: LineSource> RecordIterator<S> {
    /// Wrap `reader`, reading the first record right away
    pub fn new(mut reader: CsvReader<S>) -> Self {
        let lookahead = reader.read_next().transpose();
        RecordIterator { reader, lookahead }
    }

    /// Whether `next` will yield something, a record or a stored error
    pub fn has_next(&self) -> bool {
        self.lookahead.is_some()
    }

    /// Whether the look-ahead read failed; `next` then yields that error
    pub fn has_failed(&self) -> bool {
        matches!(self.lookahead, Some(Err(_)))
    }

    /// Borrow the upcoming record without advancing
    pub fn peek(&self) -> Option<&Record> {
        match &self.lookahead {
            Some(Ok(record)) => Some(record),
            _ => None,
        }
    }

    /// Borrow the underlying reader, e.g. for its counters
    pub fn reader(&self) -> &CsvReader<S> {
        &self.reader
    }

    /// Give the reader back; the pending look-ahead record is dropped
    pub fn into_inner(self) -> CsvReader<S> {
        self.reader
    }
}

impl<S: LineSource> Iterator for RecordIterator<S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.lookahead.take()?;
        // After an error the look-ahead stays empty
        if current.is_ok() {
            self.lookahead = self.reader.read_next().transpose();
        }
        Some(current)
    }
}

impl<S: LineSource> FusedIterator for RecordIterator<S> {}
