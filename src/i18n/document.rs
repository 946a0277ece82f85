//! Plain data model of a string table file.
//!
//! A `Document` mirrors the file one-to-one: contexts and messages keep their
//! file order, and an absent `<translation>` child is kept distinct from an
//! empty one so that serialization reproduces what was read.

use crate::i18n::Language;
use serde::Serialize;

/// One `(id, source, translation)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Unique identifier (e.g. "AUDIOENGINESOLOUDREQUESTBUS_NAME")
    pub id: String,

    /// Untranslated text, used as the fallback display string
    pub source: String,

    /// Display string; `None` when the message has no `<translation>` child
    pub translation: Option<String>,
}

impl Entry {
    /// Create an entry with a translation.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            translation: Some(translation.into()),
        }
    }

    /// Create an entry whose source text is its own id, the convention used by
    /// the reflection export step.
    pub fn keyed(id: impl Into<String>, translation: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            source: id.clone(),
            id,
            translation: Some(translation.into()),
        }
    }

    /// The non-empty translation, if any.
    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether this entry has a non-empty translation.
    pub fn is_translated(&self) -> bool {
        self.translation().is_some()
    }

    /// Text to render: the translation, or the source when there is none.
    pub fn display_text(&self) -> &str {
        self.translation().unwrap_or(&self.source)
    }
}

/// A named group of entries for one reflected API surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Context {
    /// Context name (e.g. "EBus: AudioEngineSoLoudRequestBus")
    pub name: String,

    /// Entries in file order
    pub entries: Vec<Entry>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }
}

/// A whole string table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Format version from the root `version` attribute (e.g. "2.1")
    pub version: String,

    /// Language of the translations
    pub language: Language,

    /// Contexts in file order
    pub contexts: Vec<Context>,
}

impl Document {
    pub fn new(version: impl Into<String>, language: Language) -> Self {
        Self {
            version: version.into(),
            language,
            contexts: Vec::new(),
        }
    }

    /// All entries across all contexts, in file order, with their context name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.contexts
            .iter()
            .flat_map(|ctx| ctx.entries.iter().map(move |e| (ctx.name.as_str(), e)))
    }
}
