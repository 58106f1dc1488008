//! CSV dialect: control characters and mode flags shared by parser and writer

use crate::error::{CsvError, Result};

/// Default field separator
pub const DEFAULT_SEPARATOR: char = ',';
/// Default quote character
pub const DEFAULT_QUOTE_CHARACTER: char = '"';
/// Default escape character
pub const DEFAULT_ESCAPE_CHARACTER: char = '\\';
/// Default record terminator used by the writer
pub const DEFAULT_LINE_END: &str = "\n";
/// Sentinel meaning "no character". Never a valid separator.
pub const NULL_CHARACTER: char = '\0';

/// Set of control characters and flags governing CSV syntax
///
/// Separator, quote and escape, when defined, are always pairwise distinct.
/// Every fallible setter re-checks this and leaves the dialect untouched on
/// failure.
///
/// # Examples
///
/// ```
/// use csvstream::csv::Dialect;
///
/// let mut dialect = Dialect::default();
/// dialect.set_separator(';').unwrap();
///
/// // The quote cannot collide with the separator
/// assert!(dialect.set_quote(Some(';')).is_err());
/// assert_eq!(dialect.quote(), Some('"'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Dialect {
    separator: char,
    quote: Option<char>,
    escape: Option<char>,
    strict_quotes: bool,
    ignore_leading_whitespace: bool,
    ignore_quotations: bool,
    skip_lines: usize,
    keep_carriage_return: bool,
    line_terminator: String,
    quote_all_fields: bool,
    avoid_trailing_terminator: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            quote: Some(DEFAULT_QUOTE_CHARACTER),
            escape: Some(DEFAULT_ESCAPE_CHARACTER),
            strict_quotes: false,
            ignore_leading_whitespace: true,
            ignore_quotations: false,
            skip_lines: 0,
            keep_carriage_return: false,
            line_terminator: DEFAULT_LINE_END.to_string(),
            quote_all_fields: true,
            avoid_trailing_terminator: false,
        }
    }
}

impl Dialect {
    /// Start a [`DialectBuilder`] seeded with the defaults
    pub fn builder() -> DialectBuilder {
        DialectBuilder::new()
    }

    /// Field separator
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Quote character, `None` when quoting is disabled
    pub fn quote(&self) -> Option<char> {
        self.quote
    }

    /// Escape character, `None` when escaping is disabled
    pub fn escape(&self) -> Option<char> {
        self.escape
    }

    /// Whether characters outside quoted spans are discarded
    pub fn strict_quotes(&self) -> bool {
        self.strict_quotes
    }

    /// Whether whitespace before an embedded quote is dropped
    pub fn ignore_leading_whitespace(&self) -> bool {
        self.ignore_leading_whitespace
    }

    /// Whether quote characters are parsed as ordinary content
    pub fn ignore_quotations(&self) -> bool {
        self.ignore_quotations
    }

    /// Physical lines skipped before the first record
    pub fn skip_lines(&self) -> usize {
        self.skip_lines
    }

    /// Whether `\r` stays in line text instead of ending a line
    pub fn keep_carriage_return(&self) -> bool {
        self.keep_carriage_return
    }

    /// Record terminator written after (or between) records
    pub fn line_terminator(&self) -> &str {
        &self.line_terminator
    }

    /// Whether the writer quotes every field, special or not
    pub fn quote_all_fields(&self) -> bool {
        self.quote_all_fields
    }

    /// Whether the terminator goes between records instead of after each
    pub fn avoid_trailing_terminator(&self) -> bool {
        self.avoid_trailing_terminator
    }

    /// Set the field separator
    ///
    /// Fails if `separator` is [`NULL_CHARACTER`] or equals the current quote
    /// or escape character.
    pub fn set_separator(&mut self, separator: char) -> Result<()> {
        check_control_chars(separator, self.quote, self.escape)?;
        self.separator = separator;
        Ok(())
    }

    /// Set the quote character, or disable quoting with `None`
    pub fn set_quote(&mut self, quote: Option<char>) -> Result<()> {
        let quote = defined(quote);
        check_control_chars(self.separator, quote, self.escape)?;
        self.quote = quote;
        Ok(())
    }

    /// Set the escape character, or disable escaping with `None`
    pub fn set_escape(&mut self, escape: Option<char>) -> Result<()> {
        let escape = defined(escape);
        check_control_chars(self.separator, self.quote, escape)?;
        self.escape = escape;
        Ok(())
    }

    /// Set the record terminator appended (or prepended) by the writer
    pub fn set_line_terminator(&mut self, terminator: impl Into<String>) -> Result<()> {
        let terminator = terminator.into();
        if terminator.is_empty() {
            return Err(CsvError::Configuration(
                "line terminator must not be empty".to_string(),
            ));
        }
        self.line_terminator = terminator;
        Ok(())
    }

    /// Discard characters found outside quoted spans
    pub fn set_strict_quotes(&mut self, strict: bool) {
        self.strict_quotes = strict;
    }

    /// Drop whitespace-only content before an embedded quote
    pub fn set_ignore_leading_whitespace(&mut self, ignore: bool) {
        self.ignore_leading_whitespace = ignore;
    }

    /// Treat quote characters as ordinary content
    pub fn set_ignore_quotations(&mut self, ignore: bool) {
        self.ignore_quotations = ignore;
    }

    /// Number of physical lines the reader skips before the first record
    pub fn set_skip_lines(&mut self, lines: usize) {
        self.skip_lines = lines;
    }

    /// Keep `\r` in line text; only `\n` ends a line
    pub fn set_keep_carriage_return(&mut self, keep: bool) {
        self.keep_carriage_return = keep;
    }

    /// Quote every written field instead of only special ones
    pub fn set_quote_all_fields(&mut self, quote_all: bool) {
        self.quote_all_fields = quote_all;
    }

    /// Write the terminator before every record but the first
    pub fn set_avoid_trailing_terminator(&mut self, avoid: bool) {
        self.avoid_trailing_terminator = avoid;
    }

    /// Re-check every invariant
    ///
    /// Only needed for values that bypassed the setters, such as a dialect
    /// deserialized from a configuration file.
    pub fn validate(&self) -> Result<()> {
        check_control_chars(self.separator, self.quote, self.escape)?;
        if self.line_terminator.is_empty() {
            return Err(CsvError::Configuration(
                "line terminator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn is_quote(&self, c: char) -> bool {
        self.quote == Some(c)
    }

    pub(crate) fn is_escape(&self, c: char) -> bool {
        self.escape == Some(c)
    }
}

/// Map the NUL sentinel to `None`
fn defined(c: Option<char>) -> Option<char> {
    c.filter(|&c| c != NULL_CHARACTER)
}

fn check_control_chars(separator: char, quote: Option<char>, escape: Option<char>) -> Result<()> {
    if separator == NULL_CHARACTER {
        return Err(CsvError::Configuration(
            "the separator character must be defined".to_string(),
        ));
    }
    if quote == Some(separator) {
        return Err(CsvError::Configuration(format!(
            "the separator and quote characters must be different (both {:?})",
            separator
        )));
    }
    if escape == Some(separator) {
        return Err(CsvError::Configuration(format!(
            "the separator and escape characters must be different (both {:?})",
            separator
        )));
    }
    if let (Some(q), Some(e)) = (quote, escape) {
        if q == e {
            return Err(CsvError::Configuration(format!(
                "the quote and escape characters must be different (both {:?})",
                q
            )));
        }
    }
    Ok(())
}

/// Chainable builder producing a validated [`Dialect`]
///
/// Nothing is checked until [`DialectBuilder::build`], so intermediate
/// states may collide (e.g. swapping separator and quote).
///
/// # Examples
///
/// ```
/// use csvstream::csv::Dialect;
///
/// let dialect = Dialect::builder()
///     .separator('\t')
///     .no_escape()
///     .quote_all_fields(false)
///     .build()
///     .unwrap();
/// assert_eq!(dialect.separator(), '\t');
/// assert_eq!(dialect.escape(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DialectBuilder {
    dialect: Dialect,
}

impl DialectBuilder {
    /// Builder seeded with the default dialect
    pub fn new() -> Self {
        Self::default()
    }

    /// Field separator
    pub fn separator(mut self, separator: char) -> Self {
        self.dialect.separator = separator;
        self
    }

    /// Quote character
    pub fn quote(mut self, quote: char) -> Self {
        self.dialect.quote = defined(Some(quote));
        self
    }

    /// Disable quoting
    pub fn no_quote(mut self) -> Self {
        self.dialect.quote = None;
        self
    }

    /// Escape character
    pub fn escape(mut self, escape: char) -> Self {
        self.dialect.escape = defined(Some(escape));
        self
    }

    /// Disable escaping
    pub fn no_escape(mut self) -> Self {
        self.dialect.escape = None;
        self
    }

    /// Discard characters found outside quoted spans
    pub fn strict_quotes(mut self, strict: bool) -> Self {
        self.dialect.strict_quotes = strict;
        self
    }

    /// Drop whitespace-only content before an embedded quote
    pub fn ignore_leading_whitespace(mut self, ignore: bool) -> Self {
        self.dialect.ignore_leading_whitespace = ignore;
        self
    }

    /// Treat quote characters as ordinary content
    pub fn ignore_quotations(mut self, ignore: bool) -> Self {
        self.dialect.ignore_quotations = ignore;
        self
    }

    /// Physical lines the reader skips once before the first record
    pub fn skip_lines(mut self, lines: usize) -> Self {
        self.dialect.skip_lines = lines;
        self
    }

    /// Keep `\r` in line text
    pub fn keep_carriage_return(mut self, keep: bool) -> Self {
        self.dialect.keep_carriage_return = keep;
        self
    }

    /// Record terminator used by the writer
    pub fn line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.dialect.line_terminator = terminator.into();
        self
    }

    /// Quote every written field
    pub fn quote_all_fields(mut self, quote_all: bool) -> Self {
        self.dialect.quote_all_fields = quote_all;
        self
    }

    /// Leave no terminator after the last record
    pub fn avoid_trailing_terminator(mut self, avoid: bool) -> Self {
        self.dialect.avoid_trailing_terminator = avoid;
        self
    }

    /// Validate once and produce the dialect
    pub fn build(self) -> Result<Dialect> {
        self.dialect.validate()?;
        Ok(self.dialect)
    }
}
