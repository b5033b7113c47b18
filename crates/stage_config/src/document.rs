//! Parsed scene document.
//!
//! A [`Document`] is an ordered list of [`Section`]s, each an ordered list of
//! key/value items. Lookups are case-insensitive on section names and keys.

use std::path::Path;

use tracing::debug;

use crate::error::DocumentError;
use crate::line::{Line, classify};

/// One `[name]` block of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    /// Lower-cased section name.
    name: String,
    /// Lower-cased keys with their values, in declaration order.
    items: Vec<(String, String)>,
}

impl Section {
    fn new(name: String) -> Self {
        Self {
            name,
            items: Vec::new(),
        }
    }

    /// The lower-cased section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a key (case-insensitive).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_ascii_lowercase();
        self.items
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(key, value)` pairs in declaration order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the section has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn set(&mut self, key: String, value: String) {
        match self.items.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.items.push((key, value)),
        }
    }
}

/// A parsed document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    /// Read and parse a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] if the file cannot be read, or
    /// [`DocumentError::Syntax`] for the first malformed line.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let source = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = source.len(), "read scene document");
        Self::parse(&source)
    }

    /// Parse a document from source text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Syntax`] for the first malformed line.
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let mut doc = Self::default();
        let mut current: Option<usize> = None;

        for (idx, raw) in source.lines().enumerate() {
            let number = idx + 1;
            match classify(raw, number)? {
                Line::Skip => {}
                Line::Header(name) => {
                    current = Some(doc.section_index(&name.to_ascii_lowercase()));
                }
                Line::Assign { key, value } => {
                    let Some(section) = current else {
                        return Err(DocumentError::syntax(
                            number,
                            "assignment outside of any section",
                        ));
                    };
                    doc.sections[section].set(key.to_ascii_lowercase(), value.to_string());
                }
            }
        }

        Ok(doc)
    }

    /// Index of the named section, creating it at the end if new.
    fn section_index(&mut self, name: &str) -> usize {
        if let Some(idx) = self.sections.iter().position(|s| s.name == name) {
            return idx;
        }
        self.sections.push(Section::new(name.to_string()));
        self.sections.len() - 1
    }

    /// Iterate over sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Look up a section by name (case-insensitive).
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        let name = name.to_ascii_lowercase();
        self.sections.iter().find(|s| s.name == name)
    }

    /// Look up one value.
    #[must_use]
    pub fn item(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }
}
