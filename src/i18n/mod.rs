//! Localized string table for the Script Canvas node palette.
//!
//! Maps stable ids for the audio engine request bus (and its methods and
//! parameters) to the names, tooltips and categories shown in the editor.
//!
//! # Architecture
//!
//! - `document`: plain data model mirroring the table file
//! - `format`: XML reader/writer for the table file
//! - `ids`: the `<BUS>_[<METHOD>_[PARAM<N>_]]<ROLE>` id scheme
//! - `language`: validated language tag of a table
//! - `table`: indexed, immutable table with fallback lookups
//! - `registry`: process-wide published table
//! - `validator`: uniqueness and hierarchy checks
//! - `stats`: translation coverage report
//!
//! # Example
//!
//! ```rust,ignore
//! use scriptcanvas_strings::i18n::{tr, TableRegistry};
//!
//! // Publish a table once at startup
//! TableRegistry::install_from("Assets/Editor/audioenginesoloud_scriptcanvas.ts")?;
//!
//! // Render labels anywhere
//! let label = tr("AUDIOENGINESOLOUDREQUESTBUS_SETAUDIOBUSVOLUMEDB_NAME");
//! ```

mod document;
mod error;
pub mod format;
pub mod ids;
mod language;
mod registry;
mod stats;
mod table;
mod validator;

pub use document::{Context, Document, Entry};
pub use error::LoadError;
pub use ids::{MessageId, Role};
pub use language::Language;
pub use registry::{bundled_table, tr, TableRegistry, BUNDLED_TABLE, BUNDLED_TABLE_ASSET};
pub use stats::{RoleCounts, TableStats};
pub use table::StringTable;
pub use validator::{TableValidator, ValidationReport, Violation};
