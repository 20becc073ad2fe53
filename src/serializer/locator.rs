//! Structural scan that isolates one section of the backing file
//!
//! A section is addressed by its header path (root first). Header `i` must sit
//! at indentation `i`, and its direct entries at indentation `depth + 1`. The
//! scan walks the text once, descending one header at a time; if a line drops
//! below the level being searched, the path has been left and the remaining
//! headers do not exist yet.

use std::ops::Range;

use tracing::{debug, trace};

use super::dyn_string::{DynString, lines_of};
use super::error::Result;
use super::line::{indentation_level, is_blank, is_header, parse_entry};

/// A direct entry of the located section, as absolute byte ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpan {
    pub key: Range<usize>,
    pub value: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBody {
    /// Byte just after the section's header line
    pub header_end: usize,
    /// Byte just after the last non-blank line belonging to the section
    pub end: usize,
    /// Lines at exactly `depth + 1` that look like `key: value`
    pub entries: Vec<EntrySpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Found(SectionBody),
    /// Only the first `matched` headers exist. New headers belong at `insert_at`.
    Missing { matched: usize, insert_at: usize },
}

impl Location {
    pub fn is_found(&self) -> bool {
        matches!(self, Location::Found(_))
    }
}

/// Find the section addressed by `path` inside `content`.
pub fn locate<S: AsRef<str>>(content: &str, path: &[S]) -> Location {
    if path.is_empty() {
        return Location::Missing {
            matched: 0,
            insert_at: content.len(),
        };
    }

    let total = content.len();
    let mut lines = lines_of(content);
    let mut level = 0;
    // End of the last line known to be inside the deepest matched header
    let mut scope_end = total;

    while level < path.len() {
        let Some(line) = lines.next() else {
            let insert_at = if level == 0 { total } else { scope_end };
            return Location::Missing { matched: level, insert_at };
        };
        if is_blank(line.text) {
            continue;
        }

        let indent = indentation_level(line.text);
        if indent < level {
            trace!(level, line = line.text, "left header hierarchy");
            return Location::Missing {
                matched: level,
                insert_at: scope_end,
            };
        }

        let line_end = line.end;
        let header: &str = path[level].as_ref();
        if indent == level && is_header(line.text, header) {
            trace!(level, header, "matched header");
            level += 1;
            scope_end = line_end;
        } else if level > 0 {
            scope_end = line_end;
        }
    }

    // All headers matched: collect the body
    let depth = path.len() - 1;
    let header_end = scope_end;
    let mut body = SectionBody {
        header_end,
        end: header_end,
        entries: Vec::new(),
    };

    for line in lines {
        if is_blank(line.text) {
            continue;
        }
        let indent = indentation_level(line.text);
        if indent <= depth {
            break;
        }
        body.end = line.end;
        if indent > depth + 1 {
            // Belongs to a nested subsection
            continue;
        }
        if let Some(shape) = parse_entry(line.text) {
            body.entries.push(EntrySpan {
                key: line.start + shape.key.start..line.start + shape.key.end,
                value: line.start + shape.value.start..line.start + shape.value.end,
            });
        }
    }

    Location::Found(body)
}

/// Copy the direct entries of `path` (unindented, one per line) into `out`.
/// Returns `false` when the section does not exist.
pub fn extract_section<S: AsRef<str>>(
    content: &str,
    path: &[S],
    out: &mut DynString,
) -> Result<bool> {
    out.clear();
    let body = match locate(content, path) {
        Location::Found(body) => body,
        Location::Missing { matched, .. } => {
            debug!(
                matched,
                wanted = path.len(),
                section = path.last().map_or("", |s| s.as_ref()),
                "section not present in file"
            );
            return Ok(false);
        }
    };

    for entry in &body.entries {
        out.append_str(&content[entry.key.clone()])?;
        out.append_str(": ")?;
        out.append_str(&content[entry.value.clone()])?;
        out.append_char('\n')?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
root:
  a: 1
  b: two words
  sub:
    c: 3
    deeper:
      d: 4
  e: 5
other:
  a: 9
";

    fn extract(content: &str, path: &[&str]) -> (bool, String) {
        let mut out = DynString::new();
        let found = extract_section(content, path, &mut out).unwrap();
        (found, out.into_string())
    }

    #[test]
    fn test_extract_root_skips_nested_entries() {
        let (found, text) = extract(SAMPLE, &["root"]);
        assert!(found);
        assert_eq!(text, "a: 1\nb: two words\ne: 5\n");
    }

    #[test]
    fn test_extract_nested() {
        assert_eq!(extract(SAMPLE, &["root", "sub"]), (true, "c: 3\n".to_string()));
        assert_eq!(
            extract(SAMPLE, &["root", "sub", "deeper"]),
            (true, "d: 4\n".to_string())
        );
    }

    #[test]
    fn test_sibling_sections_isolated() {
        assert_eq!(extract(SAMPLE, &["other"]), (true, "a: 9\n".to_string()));
    }

    #[test]
    fn test_missing_section_is_soft() {
        let (found, text) = extract(SAMPLE, &["absent"]);
        assert!(!found);
        assert!(text.is_empty());

        // `sub` exists under root but not under other
        assert!(!extract(SAMPLE, &["other", "sub"]).0);
    }

    #[test]
    fn test_missing_reports_insertion_point() {
        match locate(SAMPLE, &["root", "new_sub"]) {
            Location::Missing { matched, insert_at } => {
                assert_eq!(matched, 1);
                assert_eq!(&SAMPLE[insert_at..], "other:\n  a: 9\n");
            }
            found => panic!("unexpected {found:?}"),
        }

        match locate(SAMPLE, &["nowhere"]) {
            Location::Missing { matched, insert_at } => {
                assert_eq!(matched, 0);
                assert_eq!(insert_at, SAMPLE.len());
            }
            found => panic!("unexpected {found:?}"),
        }
    }

    #[test]
    fn test_header_substring_does_not_match() {
        let content = "cfg_old:\n  a: 1\ncfg:\n  a: 2\n";
        assert_eq!(extract(content, &["cfg"]), (true, "a: 2\n".to_string()));
    }

    #[test]
    fn test_tabs_and_blank_lines() {
        let content = "root:\n\tx: 1\n\n\t# comment\n\ty: 2\nnext:\n";
        assert_eq!(extract(content, &["root"]), (true, "x: 1\ny: 2\n".to_string()));
    }

    #[test]
    fn test_body_bounds() {
        let Location::Found(body) = locate(SAMPLE, &["root", "sub"]) else {
            panic!("sub should exist");
        };
        assert_eq!(&SAMPLE[..body.header_end], "root:\n  a: 1\n  b: two words\n  sub:\n");
        assert!(SAMPLE[body.end..].starts_with("  e: 5"));
        assert_eq!(body.entries.len(), 1);
        assert_eq!(&SAMPLE[body.entries[0].value.clone()], "3");
    }

    #[test]
    fn test_header_at_end_without_newline() {
        let content = "root:\n  a: 1\nsub_root:";
        let Location::Found(body) = locate(content, &["sub_root"]) else {
            panic!("header should be found");
        };
        assert_eq!(body.header_end, content.len());
        assert_eq!(body.end, content.len());
        assert!(body.entries.is_empty());
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(
            locate("", &["cfg"]),
            Location::Missing {
                matched: 0,
                insert_at: 0
            }
        );
    }
}
