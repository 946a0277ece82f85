use crate::i18n::Violation;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a string table cannot be loaded. Any of these aborts the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read string table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("unexpected <{found}> inside <{parent}>")]
    UnexpectedElement { found: String, parent: String },

    #[error("unexpected text inside <{parent}>: {text:?}")]
    UnexpectedText { parent: String, text: String },

    #[error("document ended inside <{inside}>")]
    UnexpectedEof { inside: String },

    #[error("document has no <TS> root element")]
    MissingRoot,

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("invalid language tag {value:?}")]
    InvalidLanguage { value: String },

    #[error("document contains no <context>")]
    NoContexts,

    #[error("context #{index} has no <name>")]
    MissingContextName { index: usize },

    #[error("message `{id}` in context `{context}` has no <source>")]
    MissingSource { id: String, context: String },

    #[error("{} duplicate message id(s), first: {}", .0.len(), .0[0])]
    DuplicateIds(Vec<Violation>),
}

impl LoadError {
    pub(crate) fn xml(position: u64, err: impl std::fmt::Display) -> Self {
        LoadError::Xml {
            position,
            message: err.to_string(),
        }
    }
}
