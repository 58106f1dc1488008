//! CSV field encoding driven by a dialect

use super::dialect::Dialect;

/// CSV encoder for writing dialect-compliant records
pub struct CsvEncoder<'a> {
    dialect: &'a Dialect,
}

impl<'a> CsvEncoder<'a> {
    /// Encoder borrowing the dialect it writes
    pub fn new(dialect: &'a Dialect) -> Self {
        Self { dialect }
    }

    /// Encode entire record into buffer, without terminator
    ///
    /// `None` fields contribute nothing between separators.
    pub fn encode_record<I, S>(&self, fields: I, quote_all: bool, buffer: &mut String)
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                buffer.push(self.dialect.separator());
            }
            if let Some(field) = field {
                self.encode_field(field.as_ref(), quote_all, buffer);
            }
        }
    }

    /// Encode single field with quoting and escaping
    pub fn encode_field(&self, field: &str, quote_all: bool, buffer: &mut String) {
        let special = self.has_special_chars(field);
        let quote = self
            .dialect
            .quote()
            .filter(|_| quote_all || special);

        if let Some(q) = quote {
            buffer.push(q);
        }
        match self.dialect.escape() {
            Some(escape) if special => {
                for c in field.chars() {
                    if self.dialect.is_quote(c) || c == escape {
                        buffer.push(escape);
                    }
                    buffer.push(c);
                }
            }
            _ => buffer.push_str(field),
        }
        if let Some(q) = quote {
            buffer.push(q);
        }
    }

    /// Check if field holds a quote, escape, separator or line break
    pub fn has_special_chars(&self, field: &str) -> bool {
        field.chars().any(|c| {
            self.dialect.is_quote(c)
                || self.dialect.is_escape(c)
                || c == self.dialect.separator()
                || c == '\n'
                || c == '\r'
        })
    }
}
