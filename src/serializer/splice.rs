//! Merge an edited section buffer back into the full file text
//!
//! The section is re-located on the fresh copy of the file. Missing headers are
//! created, values of existing direct entries are replaced in place and new
//! keys are inserted after the last line of the section, in buffer order.
//! Everything else in the file is left byte-for-byte untouched.

use std::collections::{HashMap, HashSet};

use tracing::{debug, error};

use super::dyn_string::{DynString, lines_of};
use super::line::{indent, parse_entry};
use super::locator::{Location, SectionBody, locate};

/// What a splice changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpliceReport {
    pub headers_created: usize,
    pub updated: usize,
    pub inserted: usize,
    /// Edits that failed and were left out
    pub skipped: usize,
}

/// Pending replacement of `len` bytes at `pos`
struct Edit {
    pos: usize,
    len: usize,
    text: String,
}

/// Write the entries of `section` into the section `path` of `content`.
///
/// A failing edit is logged and skipped so the remaining entries still land.
pub fn splice_section<S: AsRef<str>>(
    content: &mut DynString,
    path: &[S],
    section: &DynString,
) -> SpliceReport {
    let mut report = SpliceReport::default();
    let depth = path.len().saturating_sub(1);

    let body = match locate(content.as_str(), path) {
        Location::Found(body) => body,
        Location::Missing { matched, insert_at } => {
            match create_headers(content, path, matched, insert_at) {
                Some(body) => {
                    report.headers_created = path.len() - matched;
                    body
                }
                None => {
                    report.skipped = section.lines().count();
                    return report;
                }
            }
        }
    };

    // Only the first occurrence of a key in the file is authoritative
    let mut existing = HashMap::new();
    for entry in &body.entries {
        let key = &content.as_str()[entry.key.clone()];
        existing.entry(key.to_string()).or_insert(entry.value.clone());
    }

    let mut edits = Vec::new();
    let mut appended = String::new();
    let mut seen = HashSet::new();
    for line in section.lines() {
        let Some(shape) = parse_entry(line.text) else {
            continue;
        };
        let key = &line.text[shape.key.clone()];
        let value = &line.text[shape.value.clone()];
        if !seen.insert(key.to_string()) {
            continue;
        }

        match existing.get(key) {
            Some(range) => {
                if &content.as_str()[range.clone()] != value {
                    edits.push(Edit {
                        pos: range.start,
                        len: range.end - range.start,
                        text: value.to_string(),
                    });
                }
                report.updated += 1;
            }
            None => {
                appended.push_str(&indent(depth + 1));
                appended.push_str(key);
                appended.push_str(": ");
                appended.push_str(value);
                appended.push('\n');
                report.inserted += 1;
            }
        }
    }

    if !appended.is_empty() {
        if body.end == content.len() && !content.is_empty() && !content.ends_with_newline() {
            appended.insert(0, '\n');
        }
        edits.push(Edit {
            pos: body.end,
            len: 0,
            text: appended,
        });
    }

    // Back to front keeps the earlier offsets valid
    edits.sort_by(|a, b| b.pos.cmp(&a.pos));
    for edit in edits {
        if let Err(e) = content.replace_range(edit.pos, edit.len, &edit.text) {
            error!(pos = edit.pos, len = edit.len, error = %e, "failed to apply section edit, skipping");
            let lines = lines_of(&edit.text).count().max(1);
            if edit.len == 0 {
                report.inserted = report.inserted.saturating_sub(lines);
            } else {
                report.updated = report.updated.saturating_sub(1);
            }
            report.skipped += lines;
        }
    }

    debug!(?report, "spliced section");
    report
}

/// Append the headers `path[matched..]` at `insert_at` and return the (empty)
/// body of the innermost one.
fn create_headers<S: AsRef<str>>(
    content: &mut DynString,
    path: &[S],
    matched: usize,
    insert_at: usize,
) -> Option<SectionBody> {
    let mut headers = String::new();
    if insert_at > 0 && !content.as_str()[..insert_at].ends_with('\n') {
        headers.push('\n');
    }
    for (level, name) in path.iter().enumerate().skip(matched) {
        headers.push_str(&indent(level));
        headers.push_str(name.as_ref());
        headers.push_str(":\n");
    }

    if let Err(e) = content.insert_str(insert_at, &headers) {
        error!(insert_at, error = %e, "failed to create section headers");
        return None;
    }

    let header_end = insert_at + headers.len();
    Some(SectionBody {
        header_end,
        end: header_end,
        entries: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splice(content: &str, path: &[&str], section: &str) -> (String, SpliceReport) {
        let mut content = DynString::from_text(content).unwrap();
        let section = DynString::from_text(section).unwrap();
        let report = splice_section(&mut content, path, &section);
        (content.into_string(), report)
    }

    #[test]
    fn test_creates_root_in_empty_file() {
        let (out, report) = splice("", &["cfg"], "int_val: 42\n");
        assert_eq!(out, "cfg:\n  int_val: 42\n");
        assert_eq!(report.headers_created, 1);
        assert_eq!(report.inserted, 1);
    }

    #[test]
    fn test_updates_in_place_and_appends() {
        let original = "cfg:\n  a: 1\n  b: 2\nother:\n  a: 1\n";
        let (out, report) = splice(original, &["cfg"], "a: 10\nb: 2\nc: 3\n");
        assert_eq!(out, "cfg:\n  a: 10\n  b: 2\n  c: 3\nother:\n  a: 1\n");
        assert_eq!(report.updated, 2);
        assert_eq!(report.inserted, 1);
    }

    #[test]
    fn test_sibling_with_same_key_untouched() {
        let original = "a_sec:\n  k: 1\nb_sec:\n  k: 1\n";
        let (out, _) = splice(original, &["a_sec"], "k: 2\n");
        assert_eq!(out, "a_sec:\n  k: 2\nb_sec:\n  k: 1\n");
    }

    #[test]
    fn test_nested_key_with_same_name_is_not_reused() {
        // `k` under `sub` must not be mistaken for root's `k`
        let original = "root:\n  sub:\n    k: 1\n";
        let (out, report) = splice(original, &["root"], "k: 2\n");
        assert_eq!(out, "root:\n  sub:\n    k: 1\n  k: 2\n");
        assert_eq!(report.inserted, 1);
    }

    #[test]
    fn test_creates_missing_subsection_inside_parent() {
        let original = "root:\n  a: 1\nother:\n  b: 2\n";
        let (out, report) = splice(original, &["root", "sub", "leaf"], "x: 5\n");
        assert_eq!(
            out,
            "root:\n  a: 1\n  sub:\n    leaf:\n      x: 5\nother:\n  b: 2\n"
        );
        assert_eq!(report.headers_created, 2);
    }

    #[test]
    fn test_unchanged_buffer_is_idempotent() {
        let (first, _) = splice("", &["cfg", "sub"], "a: 1\nb: text here\n");
        let (second, report) = splice(&first, &["cfg", "sub"], "a: 1\nb: text here\n");
        assert_eq!(first, second);
        assert_eq!(report.inserted, 0);
        assert_eq!(report.updated, 2);
    }

    #[test]
    fn test_file_without_trailing_newline() {
        let (out, _) = splice("cfg:\n  a: 1", &["cfg"], "a: 1\nb: 2\n");
        assert_eq!(out, "cfg:\n  a: 1\n  b: 2\n");

        let (out, _) = splice("first:\n  x: 1", &["second"], "y: 2\n");
        assert_eq!(out, "first:\n  x: 1\nsecond:\n  y: 2\n");
    }

    #[test]
    fn test_preserves_comments_and_tabs() {
        let original = "# settings\ncfg:\n\ta: 1\n\n\t# keep me\nnext:\n";
        let (out, _) = splice(original, &["cfg"], "a: 2\nb: 3\n");
        assert_eq!(out, "# settings\ncfg:\n\ta: 2\n  b: 3\n\n\t# keep me\nnext:\n");
    }
}
