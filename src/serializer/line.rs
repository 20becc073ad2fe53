//! Shape of individual lines: indentation, headers, `key: value` entries

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::serializer::{COMMENT_PREFIX, INDENT_UNIT};

/// `<indent><key>:<spaces><value>` where the value starts with a non-blank
static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*([A-Za-z0-9_-]+):[ \t]*([^ \t\n].*)$").expect("entry pattern is valid")
});

/// Byte ranges of an entry line, relative to the line start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryShape {
    pub key: Range<usize>,
    pub value: Range<usize>,
}

/// Leading indentation in units: one tab or two spaces each
pub fn indentation_level(line: &str) -> usize {
    let bytes = line.as_bytes();
    let mut level = 0;
    let mut i = 0;
    loop {
        match bytes.get(i) {
            Some(b'\t') => i += 1,
            Some(b' ') if bytes.get(i + 1) == Some(&b' ') => i += 2,
            _ => break,
        }
        level += 1;
    }
    level
}

/// Whitespace-only and comment lines carry no structure
pub fn is_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX)
}

/// `[A-Za-z0-9_-]+`
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Line is exactly `<indent><name>:` (trailing whitespace tolerated)
pub fn is_header(line: &str, name: &str) -> bool {
    line.trim()
        .strip_suffix(':')
        .is_some_and(|head| head == name)
}

pub fn parse_entry(line: &str) -> Option<EntryShape> {
    let caps = ENTRY_RE.captures(line)?;
    let key = caps.get(1)?;
    let value = caps.get(2)?;
    Some(EntryShape {
        key: key.range(),
        value: value.range(),
    })
}

/// Whitespace written in front of a line at `level`
pub fn indent(level: usize) -> String {
    INDENT_UNIT.repeat(level)
}
