//! The localized string table.
//!
//! A `StringTable` is built once from a document and is immutable afterwards.
//! Lookups never fail: a missing or empty translation falls back to the
//! entry's source text, and an unknown id falls back to the id itself, so the
//! editor always has something to render.

use crate::i18n::format::{parse_document, write_document};
use crate::i18n::ids::MessageId;
use crate::i18n::{Context, Document, Entry, Language, LoadError, TableValidator, Violation};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Indexed, read-only view of a string table document.
#[derive(Debug, Clone)]
pub struct StringTable {
    document: Document,
    /// id -> (context index, entry index)
    index: HashMap<String, (usize, usize)>,
}

impl StringTable {
    /// Build a table from a parsed document.
    ///
    /// # Errors
    /// Returns `LoadError::DuplicateIds` if any id appears more than once.
    pub fn from_document(document: Document) -> Result<Self, LoadError> {
        let duplicates = TableValidator::duplicate_ids(&document);
        if !duplicates.is_empty() {
            return Err(LoadError::DuplicateIds(duplicates));
        }

        let mut index = HashMap::new();
        for (ctx_idx, context) in document.contexts.iter().enumerate() {
            for (entry_idx, entry) in context.entries.iter().enumerate() {
                index.insert(entry.id.clone(), (ctx_idx, entry_idx));
            }
        }

        debug!(
            contexts = document.contexts.len(),
            entries = index.len(),
            "Indexed string table"
        );
        Ok(Self { document, index })
    }

    /// Parse a table from XML text.
    pub fn parse(xml: &str) -> Result<Self, LoadError> {
        Self::from_document(parse_document(xml)?)
    }

    /// Load a table from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&xml)?;
        info!(
            "Loaded string table {} ({} entries, language {})",
            path.display(),
            table.len(),
            table.language()
        );
        Ok(table)
    }

    /// Display string for an id.
    ///
    /// Returns the translation when it is present and non-empty, otherwise the
    /// entry's source text. Ids not in the table are returned unchanged.
    pub fn lookup<'a>(&'a self, id: &'a str) -> &'a str {
        match self.get(id) {
            Some(entry) => entry.display_text(),
            None => id,
        }
    }

    /// Display string for a structured id.
    pub fn label(&self, id: &MessageId) -> String {
        let id = id.to_string();
        self.lookup(&id).to_string()
    }

    /// The entry with this exact id.
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.index
            .get(id)
            .map(|&(ctx, entry)| &self.document.contexts[ctx].entries[entry])
    }

    /// Entries of a context in file order. Unknown contexts have no entries.
    pub fn entries_for(&self, context: &str) -> &[Entry] {
        self.document
            .contexts
            .iter()
            .find(|ctx| ctx.name == context)
            .map(|ctx| ctx.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Check the table invariants.
    pub fn validate(&self) -> Vec<Violation> {
        TableValidator::validate(&self.document).violations
    }

    /// All contexts in file order.
    pub fn contexts(&self) -> &[Context] {
        &self.document.contexts
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn version(&self) -> &str {
        &self.document.version
    }

    pub fn language(&self) -> &Language {
        &self.document.language
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Serialize the table in normalized form.
    pub fn to_xml(&self) -> String {
        write_document(&self.document)
    }
}
