//! Table registry: the single, process-wide string table.
//!
//! The table is published once, at startup, and never mutated afterwards. It
//! uses `OnceLock` so any number of threads can read it without locking. If
//! nothing was installed before the first read, the bundled table is used.

use crate::i18n::StringTable;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

/// String table shipped with the audio engine editor assets.
pub const BUNDLED_TABLE: &str = include_str!("../../assets/audioenginesoloud_scriptcanvas.ts");

/// Asset path the engine loads the table from.
pub const BUNDLED_TABLE_ASSET: &str = "/editor/audioenginesoloud_scriptcanvas";

/// Global table instance (initialized once)
static TABLE: OnceLock<StringTable> = OnceLock::new();

/// Parse the bundled table.
///
/// # Panics
/// Panics if the bundled asset is not a valid table. The asset is compiled
/// into the crate and covered by tests.
pub fn bundled_table() -> StringTable {
    StringTable::parse(BUNDLED_TABLE).expect("Bundled string table should be valid")
}

/// Global string table registry.
pub struct TableRegistry;

impl TableRegistry {
    /// Publish a table for the rest of the process.
    ///
    /// # Returns
    /// * `Ok(&StringTable)` with the published table
    /// * `Err` if a table was already published (including the bundled one,
    ///   published implicitly by an earlier `get`)
    pub fn install(table: StringTable) -> Result<&'static StringTable> {
        let entries = table.len();
        if TABLE.set(table).is_err() {
            bail!("A string table has already been installed");
        }
        info!("Installed string table with {} entries", entries);
        Ok(Self::get())
    }

    /// Load a table from disk and publish it.
    pub fn install_from(path: impl AsRef<Path>) -> Result<&'static StringTable> {
        let path = path.as_ref();
        let table = StringTable::load(path)
            .with_context(|| format!("Failed to load string table {}", path.display()))?;

        let violations = table.validate();
        if !violations.is_empty() {
            warn!(
                "String table {} has {} invariant violation(s)",
                path.display(),
                violations.len()
            );
        }

        Self::install(table)
    }

    /// Get the published table, publishing the bundled one if none was installed.
    pub fn get() -> &'static StringTable {
        TABLE.get_or_init(|| {
            info!("No string table installed, using bundled {}", BUNDLED_TABLE_ASSET);
            bundled_table()
        })
    }

    /// Whether a table has been published.
    pub fn is_installed() -> bool {
        TABLE.get().is_some()
    }
}

/// Display string for an id from the published table.
pub fn tr(id: &str) -> &str {
    TableRegistry::get().lookup(id)
}
