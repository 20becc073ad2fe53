//! Growable text buffer used as the serializer's workspace
//!
//! Every mutating operation is bounds-checked and reports allocation failure
//! through [`Error::Memory`] instead of aborting.

use std::fmt;
use std::io::Read;
use std::path::Path;

use super::error::{Error, Result};

/// Owned text buffer with insert/remove/replace by byte offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynString {
    text: String,
}

/// One line of a [`DynString`], without its `\n` or `\r\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan<'a> {
    /// Byte offset of the first character of the line
    pub start: usize,
    pub text: &'a str,
    /// Byte offset just past the line terminator, or the end of the text
    pub end: usize,
}

/// Lazy line iterator, see [`DynString::lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.text[start..];
        let (line, advance) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], idx + 1),
            None => (rest, rest.len()),
        };
        let line = line.strip_suffix('\r').unwrap_or(line);
        self.pos += advance;
        Some(LineSpan {
            start,
            text: line,
            end: self.pos,
        })
    }
}

/// Iterate the lines of any text the same way [`DynString::lines`] does.
pub fn lines_of(text: &str) -> Lines<'_> {
    Lines { text, pos: 0 }
}

/// Counts formatted bytes without storing them.
struct ByteCounter(usize);

impl fmt::Write for ByteCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

impl DynString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut text = String::new();
        text.try_reserve(capacity)?;
        Ok(Self { text })
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let mut out = Self::with_capacity(text.len())?;
        out.text.push_str(text);
        Ok(out)
    }

    /// Read everything left in `reader`. `origin` only labels errors.
    pub fn from_reader<R: Read>(reader: &mut R, origin: &Path) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io("reading", origin, e))?;
        let text = String::from_utf8(bytes).map_err(|e| {
            Error::Format(format!("{} is not valid UTF-8: {e}", origin.display()))
        })?;
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.text.capacity()
    }

    /// Drop the content but keep the allocation
    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n')
    }

    pub fn append_str(&mut self, text: &str) -> Result<()> {
        self.text.try_reserve(text.len())?;
        self.text.push_str(text);
        Ok(())
    }

    pub fn append_char(&mut self, c: char) -> Result<()> {
        self.text.try_reserve(c.len_utf8())?;
        self.text.push(c);
        Ok(())
    }

    /// Append `format_args!` output. The size is measured with a dry run first
    /// so the buffer grows once.
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        use fmt::Write as _;

        let mut counter = ByteCounter(0);
        counter
            .write_fmt(args)
            .map_err(|_| Error::Format("formatting failed while measuring".into()))?;
        self.text.try_reserve(counter.0)?;
        self.text
            .write_fmt(args)
            .map_err(|_| Error::Format("formatting failed while writing".into()))
    }

    pub fn insert_str(&mut self, pos: usize, text: &str) -> Result<()> {
        self.check_range(pos, 0)?;
        self.text.try_reserve(text.len())?;
        self.text.insert_str(pos, text);
        Ok(())
    }

    pub fn remove_range(&mut self, pos: usize, len: usize) -> Result<()> {
        self.check_range(pos, len)?;
        self.text.replace_range(pos..pos + len, "");
        Ok(())
    }

    pub fn replace_range(&mut self, pos: usize, len: usize, text: &str) -> Result<()> {
        self.check_range(pos, len)?;
        if text.len() > len {
            self.text.try_reserve(text.len() - len)?;
        }
        self.text.replace_range(pos..pos + len, text);
        Ok(())
    }

    /// First occurrence of `needle` at or after `from`
    pub fn find_str(&self, needle: &str, from: usize) -> Option<usize> {
        self.text
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|idx| idx + from)
    }

    /// Lines split on `\n` (a `\r` before it is dropped); a trailing fragment without newline is included,
    /// an empty fragment after a final `\n` is not. Call again to restart.
    pub fn lines(&self) -> Lines<'_> {
        lines_of(&self.text)
    }

    fn check_range(&self, pos: usize, len: usize) -> Result<()> {
        let size = self.text.len();
        let out_of_bounds = || Error::Range { pos, len, size };
        let end = pos.checked_add(len).ok_or_else(out_of_bounds)?;
        if end > size || !self.text.is_char_boundary(pos) || !self.text.is_char_boundary(end) {
            return Err(out_of_bounds());
        }
        Ok(())
    }
}

impl fmt::Display for DynString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for DynString {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
