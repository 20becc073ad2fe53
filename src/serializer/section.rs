//! Get/set of `key: value` lines inside an isolated section buffer
//!
//! The buffer holds the current section's direct entries, unindented and
//! `\n`-terminated. The first line whose key matches wins.

use std::ops::Range;

use super::dyn_string::DynString;
use super::error::{Error, Result};
use super::line::is_identifier;

/// Byte range of the value of `key` inside `buffer`
fn find_value(buffer: &DynString, key: &str) -> Option<Range<usize>> {
    buffer.lines().find_map(|line| {
        let rest = line.text.strip_prefix(key)?.strip_prefix(':')?;
        let blanks = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        let start = line.start + key.len() + 1 + blanks;
        Some(start..line.start + line.text.len())
    })
}

/// Value text stored for `key`, leading blanks trimmed.
pub fn get_entry<'a>(buffer: &'a DynString, key: &str) -> Option<&'a str> {
    find_value(buffer, key).map(|range| &buffer.as_str()[range])
}

/// Store `value` under `key`: replaces the value portion of an existing line,
/// otherwise appends a new line. Returns `true` when an existing line was
/// updated.
pub fn set_entry(buffer: &mut DynString, key: &str, value: &str) -> Result<bool> {
    validate_entry(key, value)?;

    if let Some(range) = find_value(buffer, key) {
        // `key:value` with no blank gets the canonical single space
        let (pos, len) = (range.start, range.end - range.start);
        let separator = &buffer.as_str()[range.start - 1..range.start];
        if separator == ":" {
            buffer.replace_range(pos, len, &format!(" {value}"))?;
        } else {
            buffer.replace_range(pos, len, value)?;
        }
        return Ok(true);
    }

    if !buffer.is_empty() && !buffer.ends_with_newline() {
        buffer.append_char('\n')?;
    }
    buffer.append_fmt(format_args!("{key}: {value}\n"))?;
    Ok(false)
}

/// Keys must be bare identifiers and values a single non-empty line, otherwise
/// the written file would not read back.
pub fn validate_entry(key: &str, value: &str) -> Result<()> {
    if !is_identifier(key) {
        return Err(Error::invalid(format!(
            "key '{key}' must be non-empty and only contain [A-Za-z0-9_-]"
        )));
    }
    if value.contains('\n') || value.contains('\r') {
        return Err(Error::invalid(format!("value for '{key}' spans several lines")));
    }
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("value for '{key}' is empty")));
    }
    if value.starts_with([' ', '\t']) {
        // Leading blanks are dropped when the line is read back
        return Err(Error::invalid(format!("value for '{key}' starts with whitespace")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> DynString {
        DynString::from_text(text).unwrap()
    }

    #[test]
    fn test_get_exact_key_only() {
        let buf = buffer("int_val_2: 7\nint_val: 42\n");
        assert_eq!(get_entry(&buf, "int_val"), Some("42"));
        assert_eq!(get_entry(&buf, "int_val_2"), Some("7"));
        assert_eq!(get_entry(&buf, "int"), None);
        assert_eq!(get_entry(&buf, "missing"), None);
    }

    #[test]
    fn test_get_trims_leading_blanks() {
        let buf = buffer("name:\t  spaced value\n");
        assert_eq!(get_entry(&buf, "name"), Some("spaced value"));
    }

    #[test]
    fn test_first_match_wins() {
        let buf = buffer("dup: 1\ndup: 2\n");
        assert_eq!(get_entry(&buf, "dup"), Some("1"));
    }

    #[test]
    fn test_set_replaces_value_only() {
        let mut buf = buffer("a: 1\nb: 2\nc: 3\n");
        assert!(set_entry(&mut buf, "b", "200").unwrap());
        assert_eq!(buf.as_str(), "a: 1\nb: 200\nc: 3\n");
    }

    #[test]
    fn test_set_appends_when_missing() {
        let mut buf = buffer("a: 1\n");
        assert!(!set_entry(&mut buf, "z", "last").unwrap());
        assert_eq!(buf.as_str(), "a: 1\nz: last\n");

        let mut empty = DynString::new();
        set_entry(&mut empty, "first", "1").unwrap();
        assert_eq!(empty.as_str(), "first: 1\n");
    }

    #[test]
    fn test_set_normalizes_missing_space() {
        let mut buf = buffer("a:1\n");
        assert!(set_entry(&mut buf, "a", "2").unwrap());
        assert_eq!(buf.as_str(), "a: 2\n");
    }

    #[test]
    fn test_set_rejects_unwritable_input() {
        let mut buf = DynString::new();
        assert!(matches!(set_entry(&mut buf, "bad key", "1"), Err(Error::InvalidArgument(_))));
        assert!(matches!(set_entry(&mut buf, "k", "two\nlines"), Err(Error::InvalidArgument(_))));
        assert!(matches!(set_entry(&mut buf, "k", "  "), Err(Error::InvalidArgument(_))));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_set_rejects_leading_whitespace() {
        let mut buf = buffer("title: old\n");
        assert!(matches!(
            set_entry(&mut buf, "title", "  indented title"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(set_entry(&mut buf, "title", "\ttabbed"), Err(Error::InvalidArgument(_))));
        assert_eq!(buf.as_str(), "title: old\n");

        // Inner and trailing blanks read back unchanged
        set_entry(&mut buf, "title", "two  words ").unwrap();
        assert_eq!(get_entry(&buf, "title"), Some("two  words "));
    }
}
