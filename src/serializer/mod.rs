//! Section-scoped, line-oriented settings serializer
//!
//! Settings files use an indentation-significant, YAML-like layout:
//!
//! ```text
//! root_section:
//!   key1: value1
//!   nested_section:
//!     key2: value2
//! ```
//!
//! A [`Session`] keeps only the current section in memory. Edits are spliced
//! back into the file text without touching unrelated sections, comments or
//! formatting.

mod dyn_string;
mod error;
mod header_stack;
mod line;
mod locator;
mod section;
mod session;
mod splice;
mod value;

pub use dyn_string::{DynString, LineSpan, Lines};
pub use error::{Error, Result};
pub use header_stack::HeaderStack;
pub use locator::{EntrySpan, Location, SectionBody, extract_section, locate};
pub use section::{get_entry, set_entry};
pub use session::{Mode, Session};
pub use splice::{SpliceReport, splice_section};
pub use value::{EntryValue, Value, ValueKind};
