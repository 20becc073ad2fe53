//! Typed entry values
//!
//! Each value kind carries its own rendering and parsing, so a value is never
//! reinterpreted through a mismatched width. The printf-style tags used by
//! older callers (`%d`, `%llu`, `%s`, ...) are accepted as names for kinds and
//! anything else is rejected.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
    Str,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::I32 => "i32",
            ValueKind::U32 => "u32",
            ValueKind::I64 => "i64",
            ValueKind::U64 => "u64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Bool => "bool",
            ValueKind::Str => "str",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let kind = match tag.trim() {
            "%d" | "%i" | "i32" | "int" => ValueKind::I32,
            "%u" | "u32" => ValueKind::U32,
            "%ld" | "%lld" | "i64" => ValueKind::I64,
            "%lu" | "%llu" | "u64" => ValueKind::U64,
            "%f" | "f32" | "float" => ValueKind::F32,
            "%lf" | "%Lf" | "f64" | "double" => ValueKind::F64,
            "bool" => ValueKind::Bool,
            "%s" | "%[^\\n]" | "%[^\n]" | "str" | "string" => ValueKind::Str,
            other => {
                return Err(Error::Format(format!("unrecognized value format '{other}'")));
            }
        };
        Ok(kind)
    }
}

/// A value of one of the supported kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::I32(_) => ValueKind::I32,
            Value::U32(_) => ValueKind::U32,
            Value::I64(_) => ValueKind::I64,
            Value::U64(_) => ValueKind::U64,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
        }
    }

    /// Zero / empty value of `kind`
    pub fn default_of(kind: ValueKind) -> Self {
        match kind {
            ValueKind::I32 => Value::I32(0),
            ValueKind::U32 => Value::U32(0),
            ValueKind::I64 => Value::I64(0),
            ValueKind::U64 => Value::U64(0),
            ValueKind::F32 => Value::F32(0.0),
            ValueKind::F64 => Value::F64(0.0),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Str => Value::Str(String::new()),
        }
    }

    /// Parse file text as `kind`; `None` when it does not fit.
    pub fn parse(kind: ValueKind, text: &str) -> Option<Self> {
        let value = match kind {
            ValueKind::I32 => Value::I32(i32::parse_entry(text)?),
            ValueKind::U32 => Value::U32(u32::parse_entry(text)?),
            ValueKind::I64 => Value::I64(i64::parse_entry(text)?),
            ValueKind::U64 => Value::U64(u64::parse_entry(text)?),
            ValueKind::F32 => Value::F32(f32::parse_entry(text)?),
            ValueKind::F64 => Value::F64(f64::parse_entry(text)?),
            ValueKind::Bool => Value::Bool(bool::parse_entry(text)?),
            ValueKind::Str => Value::Str(String::parse_entry(text)?),
        };
        Some(value)
    }

    pub fn render(&self) -> String {
        match self {
            Value::I32(v) => v.render_entry(),
            Value::U32(v) => v.render_entry(),
            Value::I64(v) => v.render_entry(),
            Value::U64(v) => v.render_entry(),
            Value::F32(v) => v.render_entry(),
            Value::F64(v) => v.render_entry(),
            Value::Bool(v) => v.render_entry(),
            Value::Str(v) => v.render_entry(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Types that can be stored as the value of an entry line
pub trait EntryValue: Sized {
    /// Text written after `key: `
    fn render_entry(&self) -> String;

    /// Value read back from the text after `key: ` (leading blanks already
    /// trimmed). `None` leaves the caller's value untouched.
    fn parse_entry(text: &str) -> Option<Self>;
}

/// Numbers are read from the first blank-delimited token, like `scanf`.
fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

macro_rules! numeric_entry {
    ($($ty:ty),*) => {
        $(
            impl EntryValue for $ty {
                fn render_entry(&self) -> String {
                    self.to_string()
                }

                fn parse_entry(text: &str) -> Option<Self> {
                    first_token(text)?.parse().ok()
                }
            }
        )*
    };
}

numeric_entry!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl EntryValue for bool {
    fn render_entry(&self) -> String {
        self.to_string()
    }

    fn parse_entry(text: &str) -> Option<Self> {
        // Older files stored flags as unsigned integers
        match first_token(text)? {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl EntryValue for String {
    fn render_entry(&self) -> String {
        self.clone()
    }

    fn parse_entry(text: &str) -> Option<Self> {
        let line = text.split('\n').next().unwrap_or_default();
        Some(line.to_string())
    }
}
