//! CSV line tokenizer with quote, escape and multi-line continuation handling

use super::dialect::Dialect;
use crate::error::{CsvError, Result};

/// Result of feeding one physical line to [`CsvParser::parse_line_multi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The logical record is complete
    Record(Vec<String>),
    /// A quoted field is still open; feed the next physical line
    NeedsMore,
}

/// Continuation carried between physical lines of one logical record
#[derive(Debug, Clone, Default)]
struct Pending {
    /// Fields already closed on earlier lines
    fields: Vec<String>,
    /// Content of the open quoted field, newline included
    text: String,
}

/// CSV parser turning physical lines into fields according to a [`Dialect`]
///
/// The parser owns its dialect. Continuation state for a quoted field that
/// spans lines lives inside the parser and only survives across calls to
/// [`CsvParser::parse_line_multi`].
///
/// # Examples
///
/// ```
/// use csvstream::csv::{CsvParser, ParseOutcome};
///
/// let mut parser = CsvParser::default();
/// assert_eq!(parser.parse_line(r#"a,"b,c",d"#).unwrap(), vec!["a", "b,c", "d"]);
///
/// assert_eq!(parser.parse_line_multi("\"abc").unwrap(), ParseOutcome::NeedsMore);
/// assert!(parser.is_pending());
/// assert_eq!(
///     parser.parse_line_multi("def\"").unwrap(),
///     ParseOutcome::Record(vec!["abc\ndef".to_string()])
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    dialect: Dialect,
    pending: Option<Pending>,
    in_field: bool,
}

impl CsvParser {
    /// Create a new CSV parser for `dialect`
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            pending: None,
            in_field: false,
        }
    }

    /// Dialect this parser tokenizes with
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Mutable access to the dialect; its setters keep it valid
    pub fn dialect_mut(&mut self) -> &mut Dialect {
        &mut self.dialect
    }

    /// Whether the last multi-line call left a quoted field open
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any continuation state
    pub fn reset(&mut self) {
        self.pending = None;
        self.in_field = false;
    }

    /// Drain continuation state as a record
    ///
    /// Returns the fields closed so far followed by the buffered content of
    /// the open field, as-is. `None` when nothing is pending.
    pub fn finish(&mut self) -> Option<Vec<String>> {
        self.in_field = false;
        self.pending.take().map(|pending| {
            let mut fields = pending.fields;
            fields.push(pending.text);
            fields
        })
    }

    /// Parse a line that must hold a complete record
    ///
    /// Stale continuation state is discarded first. An unterminated quoted
    /// field is a [`CsvError::Format`].
    pub fn parse_line(&mut self, line: &str) -> Result<Vec<String>> {
        match self.parse(line, false)? {
            ParseOutcome::Record(fields) => Ok(fields),
            // Single-line parsing reports open quotes as errors instead
            ParseOutcome::NeedsMore => Err(unterminated()),
        }
    }

    /// Parse one physical line of a record that may span several lines
    pub fn parse_line_multi(&mut self, line: &str) -> Result<ParseOutcome> {
        self.parse(line, true)
    }

    fn parse(&mut self, line: &str, multi_line: bool) -> Result<ParseOutcome> {
        if !multi_line {
            self.reset();
        }

        let dialect = &self.dialect;
        let separator = dialect.separator();
        let strict = dialect.strict_quotes();
        let ignore_quotations = dialect.ignore_quotations();

        let chars: Vec<char> = line.chars().collect();
        let mut in_quotes = false;
        let (mut fields, mut buffer, mut in_field) = match self.pending.take() {
            Some(pending) => {
                in_quotes = !ignore_quotations;
                (pending.fields, pending.text, self.in_field)
            }
            None => (Vec::new(), String::with_capacity(line.len()), false),
        };

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            let quoted_context = (in_quotes && !ignore_quotations) || in_field;

            if dialect.is_escape(c) && quoted_context {
                if let Some(n) = next.filter(|&n| dialect.is_quote(n) || dialect.is_escape(n)) {
                    buffer.push(n);
                    i += 2;
                    continue;
                }
            }

            if dialect.is_quote(c) {
                match next.filter(|&n| quoted_context && dialect.is_quote(n)) {
                    Some(n) => {
                        // Doubled quote inside quotes
                        buffer.push(n);
                        i += 1;
                    }
                    None => {
                        in_quotes = !in_quotes;
                        // Embedded quote in the middle of a field: a,bc"d"ef,g
                        if !strict
                            && i > 2
                            && chars[i - 1] != separator
                            && next.is_some_and(|n| n != separator)
                        {
                            if dialect.ignore_leading_whitespace()
                                && !buffer.is_empty()
                                && buffer.chars().all(char::is_whitespace)
                            {
                                buffer.clear();
                            } else {
                                buffer.push(c);
                            }
                        }
                    }
                }
                in_field = true;
            } else if c == separator && !(in_quotes && !ignore_quotations) {
                fields.push(std::mem::take(&mut buffer));
                in_field = false;
            } else if !strict || (in_quotes && !ignore_quotations) {
                buffer.push(c);
                in_field = true;
            }
            i += 1;
        }

        if in_quotes && !ignore_quotations {
            if !multi_line {
                self.in_field = false;
                return Err(unterminated());
            }
            // The line terminator was part of the quoted field
            buffer.push('\n');
            self.pending = Some(Pending {
                fields,
                text: buffer,
            });
            self.in_field = in_field;
            return Ok(ParseOutcome::NeedsMore);
        }

        self.in_field = false;
        fields.push(buffer);
        Ok(ParseOutcome::Record(fields))
    }
}

fn unterminated() -> CsvError {
    CsvError::Format("Un-terminated quoted field at end of CSV line".to_string())
}
