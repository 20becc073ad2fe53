//! Serializer session: one settings file, one open section at a time
//!
//! The same sequence of `entry` calls either writes values (save mode) or
//! reads them back (load mode), so a settings type only describes its layout
//! once:
//!
//! ```no_run
//! use vn_dashboard::serializer::{Mode, Session};
//!
//! fn settings(mode: Mode, volume: &mut u32, title: &mut String) -> vn_dashboard::serializer::Result<()> {
//!     let mut session = Session::init("config", "app.yml", "general", mode)?;
//!     session.entry("volume", volume)?;
//!     session.subsection_begin("window")?;
//!     session.entry("title", title)?;
//!     session.subsection_end()?;
//!     session.shutdown()
//! }
//! ```

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, trace};

use crate::system::{ensure_directory_exists, ensure_file_exists};

use super::dyn_string::DynString;
use super::error::{Error, Result};
use super::header_stack::HeaderStack;
use super::locator::extract_section;
use super::section::{get_entry, set_entry};
use super::splice::{SpliceReport, splice_section};
use super::value::{EntryValue, Value, ValueKind};

/// Whether entry calls write or read. Fixed for a session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Save,
    Load,
}

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    /// `None` once shut down
    file: Option<File>,
    mode: Mode,
    headers: HeaderStack,
    /// Direct entries of the current section, `key: value\n` each
    section: DynString,
    section_found: bool,
}

impl Session {
    /// Open (creating if needed, never truncating) `dir/file_name` and load the
    /// root section `root`.
    pub fn init(
        dir: impl AsRef<Path>,
        file_name: &str,
        root: &str,
        mode: Mode,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        if file_name.is_empty() {
            return Err(Error::invalid("no file name given"));
        }

        let mut headers = HeaderStack::new();
        headers.push(root)?;

        ensure_directory_exists(dir)?;
        let path = dir.join(file_name);
        ensure_file_exists(&path)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| Error::io("opening", &path, e))?;
        debug!(path = %path.display(), root, ?mode, "opened settings file");

        let mut session = Self {
            path,
            file: Some(file),
            mode,
            headers,
            section: DynString::new(),
            section_found: false,
        };
        session.reload_section()?;
        Ok(session)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Nesting depth of the current section, root is 0
    pub fn depth(&self) -> usize {
        self.headers.depth()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root-to-current section names
    pub fn section_path(&self) -> &[String] {
        self.headers.as_slice()
    }

    /// Whether the current section existed in the file when it was opened
    pub fn section_found(&self) -> bool {
        self.section_found
    }

    /// Current section's entries, unindented
    pub fn section_text(&self) -> &str {
        self.section.as_str()
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Save: store `value` under `key`. Load: overwrite `value` with the stored
    /// one if present and parseable, otherwise leave it untouched.
    ///
    /// Returns `true` when the key already existed in the section.
    pub fn entry<T: EntryValue>(&mut self, key: &str, value: &mut T) -> Result<bool> {
        self.ensure_open()?;
        match self.mode {
            Mode::Save => set_entry(&mut self.section, key, &value.render_entry()),
            Mode::Load => {
                let Some(text) = get_entry(&self.section, key) else {
                    trace!(key, "entry not found");
                    return Ok(false);
                };
                match T::parse_entry(text) {
                    Some(parsed) => {
                        *value = parsed;
                        Ok(true)
                    }
                    None => {
                        debug!(key, text, "stored value does not parse, keeping default");
                        Ok(false)
                    }
                }
            }
        }
    }

    /// Like [`Session::entry`] for a tagged [`Value`]; load parses as the
    /// value's current kind.
    pub fn entry_value(&mut self, key: &str, value: &mut Value) -> Result<bool> {
        self.ensure_open()?;
        match self.mode {
            Mode::Save => set_entry(&mut self.section, key, &value.render()),
            Mode::Load => {
                let parsed = get_entry(&self.section, key)
                    .and_then(|text| Value::parse(value.kind(), text));
                match parsed {
                    Some(parsed) => {
                        *value = parsed;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
        }
    }

    /// [`Session::entry_value`] with a format tag (`%d`, `%llu`, `%s`, `f64`,
    /// ...). The tag must name the value's kind.
    pub fn entry_with_format(&mut self, key: &str, value: &mut Value, format: &str) -> Result<bool> {
        let kind: ValueKind = format.parse()?;
        if kind != value.kind() {
            return Err(Error::Format(format!(
                "format '{format}' reads {kind} but '{key}' holds {}",
                value.kind()
            )));
        }
        self.entry_value(key, value)
    }

    /// String entry. Loading keeps at most `max_len` bytes (cut on a character
    /// boundary) instead of failing on longer values.
    pub fn entry_str(&mut self, key: &str, value: &mut String, max_len: usize) -> Result<bool> {
        if max_len == 0 {
            return Err(Error::invalid(format!("no room to load '{key}'")));
        }
        let found = self.entry(key, value)?;
        if self.mode == Mode::Load && found && value.len() > max_len {
            let mut cut = max_len;
            while !value.is_char_boundary(cut) {
                cut -= 1;
            }
            debug!(key, len = value.len(), max_len, "truncating loaded string");
            value.truncate(cut);
        }
        Ok(found)
    }

    /// Descend into the child section `name`. Save mode writes the current
    /// section first.
    pub fn subsection_begin(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        self.flush()?;
        self.headers.push(name)?;
        trace!(section = name, depth = self.depth(), "entered subsection");
        self.reload_section()
    }

    /// Return to the parent section. Save mode writes the current section first.
    pub fn subsection_end(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.headers.len() <= 1 {
            return Err(Error::invalid("cannot leave the root section"));
        }
        self.flush()?;
        let left = self.headers.pop()?;
        trace!(section = %left, depth = self.depth(), "left subsection");
        self.reload_section()
    }

    /// Save mode: merge the current section into the file and rewrite it.
    /// Load mode: nothing to do.
    pub fn flush(&mut self) -> Result<()> {
        if self.mode == Mode::Load {
            return Ok(());
        }
        let mut content = self.read_file()?;
        let report = splice_section(&mut content, self.headers.as_slice(), &self.section);
        self.write_file(&content)?;
        log_report(&self.path, self.headers.as_slice(), report);
        Ok(())
    }

    /// Final flush (save mode) and close. Later calls fail with
    /// [`Error::NotInitialized`].
    pub fn shutdown(&mut self) -> Result<()> {
        self.ensure_open()?;
        let flushed = self.flush();
        self.file = None;
        self.section.clear();
        self.headers.clear();
        debug!(path = %self.path.display(), "closed settings file");
        flushed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.file.is_none() {
            return Err(Error::NotInitialized);
        }
        Ok(())
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(Error::NotInitialized)
    }

    fn read_file(&mut self) -> Result<DynString> {
        let path = self.path.clone();
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| Error::io("rewinding", &path, e))?;
        DynString::from_reader(file, &path)
    }

    fn write_file(&mut self, content: &DynString) -> Result<()> {
        let path = self.path.clone();
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| Error::io("rewinding", &path, e))?;
        file.set_len(0)
            .map_err(|e| Error::io("truncating", &path, e))?;
        file.write_all(content.as_str().as_bytes())
            .map_err(|e| Error::io("writing", &path, e))?;
        file.flush().map_err(|e| Error::io("flushing", &path, e))
    }

    /// Re-scan the file for the section on top of the header stack.
    fn reload_section(&mut self) -> Result<()> {
        let content = self.read_file()?;
        self.section_found = extract_section(content.as_str(), self.headers.as_slice(), &mut self.section)?;
        trace!(
            section = self.headers.peek().unwrap_or_default(),
            found = self.section_found,
            entries = self.section.lines().count(),
            "loaded section"
        );
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.is_open() {
            if let Err(e) = self.shutdown() {
                error!(path = %self.path.display(), error = %e, "failed to save settings on drop");
            }
        }
    }
}

fn log_report(path: &Path, headers: &[String], report: SpliceReport) {
    let section = headers.join(".");
    if report.skipped > 0 {
        error!(path = %path.display(), %section, skipped = report.skipped, "some entries could not be saved");
    }
    if report.headers_created > 0 || report.inserted > 0 {
        info!(
            path = %path.display(),
            %section,
            headers_created = report.headers_created,
            inserted = report.inserted,
            "added new settings"
        );
    }
}
