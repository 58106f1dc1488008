//! Physical line sources feeding the CSV reader

use std::io::{self, BufRead};

/// Source of physical lines, without their terminators
pub trait LineSource {
    /// Next physical line, or `None` once input is exhausted
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Non-destructive check for remaining input
    fn has_more(&mut self) -> io::Result<bool>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }

    fn has_more(&mut self) -> io::Result<bool> {
        (**self).has_more()
    }
}

/// Line splitter over any buffered byte reader
///
/// By default a line ends at `\n`, `\r\n` or a lone `\r`, and no carriage
/// return reaches the caller. With `keep_carriage_return`, only `\n` ends a
/// line and every `\r` stays in the text.
///
/// # Examples
///
/// ```
/// use csvstream::csv::{LineReader, LineSource};
///
/// let mut lines = LineReader::new("a\r\nb\rc".as_bytes(), false);
/// assert_eq!(lines.read_line().unwrap().as_deref(), Some("a"));
/// assert_eq!(lines.read_line().unwrap().as_deref(), Some("b"));
/// assert_eq!(lines.read_line().unwrap().as_deref(), Some("c"));
/// assert_eq!(lines.read_line().unwrap(), None);
/// ```
pub struct LineReader<R> {
    inner: R,
    keep_carriage_return: bool,
    buffer: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    /// Split `inner` into lines, keeping `\r` only if asked to
    pub fn new(inner: R, keep_carriage_return: bool) -> Self {
        Self {
            inner,
            keep_carriage_return,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Whether `\r` characters stay in the returned lines
    pub fn keep_carriage_return(&self) -> bool {
        self.keep_carriage_return
    }

    /// Give back the wrapped reader
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fill `self.buffer` with one line; returns whether anything was read
    fn fill_line(&mut self) -> io::Result<bool> {
        self.buffer.clear();
        let mut read_any = false;
        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(read_any);
            }
            read_any = true;

            let stop = if self.keep_carriage_return {
                available.iter().position(|&b| b == b'\n')
            } else {
                available.iter().position(|&b| b == b'\n' || b == b'\r')
            };

            match stop {
                Some(pos) => {
                    let terminator = available[pos];
                    self.buffer.extend_from_slice(&available[..pos]);
                    self.inner.consume(pos + 1);
                    if terminator == b'\r' {
                        self.skip_line_feed()?;
                    }
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    self.buffer.extend_from_slice(available);
                    self.inner.consume(len);
                }
            }
        }
    }

    /// Swallow the `\n` of a `\r\n` pair, which may sit in the next chunk
    fn skip_line_feed(&mut self) -> io::Result<()> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => {
                    if buf.first() == Some(&b'\n') {
                        self.inner.consume(1);
                    }
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        if !self.fill_line()? {
            return Ok(None);
        }
        let line = std::str::from_utf8(&self.buffer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(line.to_string()))
    }

    fn has_more(&mut self) -> io::Result<bool> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(!buf.is_empty()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn collect<R: BufRead>(mut lines: LineReader<R>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = lines.read_line().unwrap() {
            out.push(line);
        }
        out
    }

    #[test]
    fn test_mixed_terminators() {
        let lines = LineReader::new("a\nb\r\nc\rd".as_bytes(), false);
        assert_eq!(collect(lines), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_trailing_terminator_adds_no_line() {
        let lines = LineReader::new("a\n".as_bytes(), false);
        assert_eq!(collect(lines), vec!["a"]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let lines = LineReader::new("a\n\n\nb".as_bytes(), false);
        assert_eq!(collect(lines), vec!["a", "", "", "b"]);
    }

    #[test]
    fn test_keep_carriage_return() {
        let lines = LineReader::new("a\r\nb\rc\n".as_bytes(), true);
        assert_eq!(collect(lines), vec!["a\r", "b\rc"]);
    }

    #[test]
    fn test_crlf_split_across_buffer_boundary() {
        // Capacity 2 puts "\r" and "\n" in different chunks
        let reader = BufReader::with_capacity(2, "a\r\nb".as_bytes());
        let lines = LineReader::new(reader, false);
        assert_eq!(collect(lines), vec!["a", "b"]);
    }

    #[test]
    fn test_long_line_across_chunks() {
        let text = "x".repeat(100) + "\nend";
        let reader = BufReader::with_capacity(7, text.as_bytes());
        let lines = LineReader::new(reader, false);
        assert_eq!(collect(lines), vec!["x".repeat(100), "end".to_string()]);
    }

    #[test]
    fn test_has_more_is_non_destructive() {
        let mut lines = LineReader::new("a\nb".as_bytes(), false);
        assert!(lines.has_more().unwrap());
        assert!(lines.has_more().unwrap());
        assert_eq!(lines.read_line().unwrap().as_deref(), Some("a"));
        assert_eq!(lines.read_line().unwrap().as_deref(), Some("b"));
        assert!(!lines.has_more().unwrap());
        assert_eq!(lines.read_line().unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let bytes: &[u8] = &[b'a', 0xff, b'\n'];
        let mut lines = LineReader::new(bytes, false);
        let err = lines.read_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
