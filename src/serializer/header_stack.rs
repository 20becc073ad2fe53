//! Root-to-current chain of section names

use crate::constants::serializer::{HEADER_STACK_INITIAL_CAPACITY, MAX_SECTION_NAME_LEN};

use super::error::{Error, Result};
use super::line::is_identifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderStack {
    names: Vec<String>,
}

impl Default for HeaderStack {
    fn default() -> Self {
        Self {
            names: Vec::with_capacity(HEADER_STACK_INITIAL_CAPACITY),
        }
    }
}

impl HeaderStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str) -> Result<()> {
        if name.len() >= MAX_SECTION_NAME_LEN {
            return Err(Error::invalid(format!(
                "section name is {} bytes, limit is {}",
                name.len(),
                MAX_SECTION_NAME_LEN - 1
            )));
        }
        if !is_identifier(name) {
            return Err(Error::invalid(format!(
                "section name '{name}' must be non-empty and only contain [A-Za-z0-9_-]"
            )));
        }
        self.names.push(name.to_string());
        Ok(())
    }

    pub fn pop(&mut self) -> Result<String> {
        self.names.pop().ok_or(Error::EmptyStack)
    }

    /// Current (innermost) section
    pub fn peek(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    /// Name at nesting level `index` (0 = root)
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Nesting depth of the current section, root is 0
    pub fn depth(&self) -> usize {
        self.names.len().saturating_sub(1)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}
