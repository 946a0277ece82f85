//! Translation coverage statistics for a string table.

use crate::i18n::ids::{MessageId, Role};
use crate::i18n::StringTable;
use serde::Serialize;
use std::collections::BTreeSet;

/// Per-role entry counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub name: usize,
    pub tooltip: usize,
    pub category: usize,
}

/// Report describing how much of a table is translated.
#[derive(Debug, Clone, Serialize)]
pub struct TableStats {
    /// Language of the table
    pub language: String,

    /// Number of contexts
    pub contexts: usize,

    /// Number of entries
    pub entries: usize,

    /// Entries with a non-empty translation
    pub translated: usize,

    /// Entries that fall back to their source text
    pub untranslated: usize,

    /// Translated entries as a percentage (0-100)
    pub translation_rate: f64,

    /// Entries per role (ids outside the naming scheme are not counted)
    pub roles: RoleCounts,

    /// Distinct methods that have at least one entry
    pub methods: usize,

    /// Distinct method parameters that have at least one entry
    pub params: usize,
}

impl TableStats {
    /// Collect statistics over every entry of a table.
    pub fn collect(table: &StringTable) -> Self {
        let mut translated = 0;
        let mut roles = RoleCounts::default();
        let mut methods = BTreeSet::new();
        let mut params = BTreeSet::new();

        for (context, entry) in table.document().entries() {
            if entry.is_translated() {
                translated += 1;
            }

            let Some(id) = MessageId::parse(&entry.id) else {
                continue;
            };
            match id.role() {
                Role::Name => roles.name += 1,
                Role::Tooltip => roles.tooltip += 1,
                Role::Category => roles.category += 1,
            }
            if let Some(method) = id.method() {
                methods.insert((context, method.to_string()));
                if let Some(index) = id.param() {
                    params.insert((context, method.to_string(), index));
                }
            }
        }

        let entries = table.len();
        let translation_rate = if entries > 0 {
            (translated as f64 / entries as f64) * 100.0
        } else {
            0.0
        };

        TableStats {
            language: table.language().to_string(),
            contexts: table.contexts().len(),
            entries,
            translated,
            untranslated: entries - translated,
            translation_rate,
            roles,
            methods: methods.len(),
            params: params.len(),
        }
    }
}
