//! Line cursor, tokenizer and record helpers
//!
//! The codec never touches files directly. Readers pull lines from a
//! [`LineSource`] through a [`LineCursor`], which tracks the current line
//! number so every error can point at the offending record. Writers push
//! lines into a [`LineSink`].

use std::fmt::Display;
use std::iter::Peekable;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Separator placed between fields on write.
pub const FIELD_SEPARATOR: &str = "  ";

/// Ordered, single-pass supply of text lines.
pub trait LineSource {
    /// Next line, or `None` once the source is exhausted.
    fn next_line(&mut self) -> Option<String>;

    /// Whether another call to [`next_line`](Self::next_line) would return `None`.
    fn at_end(&mut self) -> bool;
}

/// Append-only destination for serialized lines.
pub trait LineSink {
    fn push_line(&mut self, line: String);

    fn flush(&mut self) {}
}

impl LineSink for Vec<String> {
    fn push_line(&mut self, line: String) {
        self.push(line);
    }
}

/// [`LineSource`] backed by any iterator of strings.
pub struct IterSource<I: Iterator<Item = String>> {
    lines: Peekable<I>,
}

impl<I: Iterator<Item = String>> IterSource<I> {
    pub fn new(lines: I) -> Self {
        Self {
            lines: lines.peekable(),
        }
    }
}

impl<I: Iterator<Item = String>> LineSource for IterSource<I> {
    fn next_line(&mut self) -> Option<String> {
        self.lines.next()
    }

    fn at_end(&mut self) -> bool {
        self.lines.peek().is_none()
    }
}

/// Pull-based reader over a [`LineSource`] with line-number tracking.
pub struct LineCursor<'a> {
    source: Box<dyn LineSource + 'a>,
    line: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(source: impl LineSource + 'a) -> Self {
        Self {
            source: Box::new(source),
            line: 0,
        }
    }

    /// Cursor over the lines of an in-memory text. `\r\n` endings are accepted.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(IterSource::new(text.lines().map(str::to_owned)))
    }

    /// Cursor over an owned sequence of lines.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'a,
    {
        Self::new(IterSource::new(lines.into_iter()))
    }

    /// 1-based number of the most recently consumed line (0 before the first read).
    pub fn line_number(&self) -> usize {
        self.line
    }

    pub fn at_end(&mut self) -> bool {
        self.source.at_end()
    }

    /// Consume the next line.
    ///
    /// Fails with [`Error::TruncatedInput`] when the source is exhausted.
    pub fn next_line(&mut self) -> Result<String> {
        match self.source.next_line() {
            Some(line) => {
                self.line += 1;
                Ok(line)
            }
            None => Err(Error::TruncatedInput { line: self.line }),
        }
    }

    /// Consume the next line and split it into fields.
    pub fn next_record(&mut self) -> Result<Record> {
        let text = self.next_line()?;
        Ok(Record {
            line: self.line,
            fields: tokenize(&text),
        })
    }
}

/// Split a line on runs of whitespace, dropping empty tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// One tokenized input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    line: usize,
    fields: Vec<String>,
}

impl Record {
    /// Record built outside a cursor, mostly for tests.
    pub fn new(line: usize, text: &str) -> Self {
        Self {
            line,
            fields: tokenize(text),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Require exactly `expected` fields.
    pub fn expect_len(&self, expected: usize) -> Result<&Self> {
        if self.fields.len() == expected {
            Ok(self)
        } else {
            Err(self.count_mismatch(expected))
        }
    }

    /// Parse field `index`.
    pub fn parse<T: FromStr>(&self, index: usize) -> Result<T> {
        let token = self
            .fields
            .get(index)
            .ok_or_else(|| self.count_mismatch(index + 1))?;
        token.parse().map_err(|_| Error::NumberFormat {
            line: self.line,
            token: token.clone(),
        })
    }

    /// Parse field `index` as a `0`/`1` flag.
    pub fn flag(&self, index: usize) -> Result<bool> {
        let token = self
            .fields
            .get(index)
            .ok_or_else(|| self.count_mismatch(index + 1))?;
        match token.as_str() {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(Error::InvalidFlag {
                line: self.line,
                token: token.clone(),
            }),
        }
    }

    /// Parse every field, requiring exactly `expected` of them.
    pub fn parse_all<T: FromStr>(&self, expected: usize) -> Result<Vec<T>> {
        self.expect_len(expected)?;
        (0..expected).map(|i| self.parse(i)).collect()
    }

    fn count_mismatch(&self, expected: usize) -> Error {
        Error::FieldCountMismatch {
            line: self.line,
            expected,
            found: self.fields.len(),
        }
    }
}

/// Join values with the canonical field separator.
pub fn join_fields<I, T>(values: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

/// Serialized form of a flag.
pub fn flag_str(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(tokenize("  1990 \t 1992   1 "), vec!["1990", "1992", "1"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t").is_empty());
    }

    #[test]
    fn test_cursor_tracks_line_numbers() {
        let mut cursor = LineCursor::from_text("a\nb c\r\n");
        assert!(!cursor.at_end());
        assert_eq!(cursor.next_line().unwrap(), "a");
        assert_eq!(cursor.line_number(), 1);
        let record = cursor.next_record().unwrap();
        assert_eq!(record.line(), 2);
        assert_eq!(record.fields(), ["b", "c"]);
        assert!(cursor.at_end());
    }

    #[test]
    fn test_cursor_past_end_is_truncated() {
        let mut cursor = LineCursor::from_lines(vec!["only".to_string()]);
        cursor.next_line().unwrap();
        assert_eq!(
            cursor.next_line(),
            Err(Error::TruncatedInput { line: 1 })
        );
    }

    #[test]
    fn test_record_parse_errors() {
        let record = Record::new(7, "1.5 x 2");
        assert_eq!(record.parse::<f64>(0).unwrap(), 1.5);
        assert_eq!(
            record.parse::<f64>(1),
            Err(Error::NumberFormat {
                line: 7,
                token: "x".to_string()
            })
        );
        assert_eq!(
            record.parse_all::<f64>(2),
            Err(Error::FieldCountMismatch {
                line: 7,
                expected: 2,
                found: 3
            })
        );
        assert!(matches!(
            record.parse::<i32>(5),
            Err(Error::FieldCountMismatch { expected: 6, .. })
        ));
    }

    #[test]
    fn test_record_flags() {
        let record = Record::new(1, "0 1 2");
        assert!(!record.flag(0).unwrap());
        assert!(record.flag(1).unwrap());
        assert!(matches!(record.flag(2), Err(Error::InvalidFlag { .. })));
    }

    #[test]
    fn test_join_fields_uses_two_spaces() {
        assert_eq!(join_fields([1.0, 0.25, 3.5]), "1  0.25  3.5");
        assert_eq!(join_fields(Vec::<f64>::new()), "");
    }
}
