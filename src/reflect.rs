//! Shape of the reflected request bus, as the scripting layer registers it.
//!
//! The descriptor is what the export step walks to produce table entries.
//! Tooling uses it to check a table covers every reflected method and to
//! regenerate a context when the bus changes.

use crate::i18n::ids::{bus_context_name, MessageId, Role};
use crate::i18n::{Context, Document, Entry, StringTable};
use tracing::debug;

/// A reflected bus event and its parameter names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<String>,
}

impl MethodDescriptor {
    pub fn new(name: &str, params: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// A reflected request bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusDescriptor {
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
}

impl BusDescriptor {
    /// The SoLoud audio engine request bus.
    pub fn audio_engine_soloud() -> Self {
        Self {
            name: "AudioEngineSoLoudRequestBus".to_string(),
            methods: vec![
                MethodDescriptor::new("LoadAudioBusLayout", &["layoutFilePath"]),
                MethodDescriptor::new("SetAudioBusVolumeDb", &["busName", "volume"]),
                MethodDescriptor::new("SetAudioBusVolumeLinear", &["busName", "volume"]),
                MethodDescriptor::new("SetAudioBusMuted", &["busName", "isMuted"]),
                MethodDescriptor::new("SetAudioBusMono", &["busName", "isMono"]),
                MethodDescriptor::new(
                    "SetAudioBusFilter",
                    &["busName", "filterIndex", "filterName"],
                ),
                MethodDescriptor::new(
                    "SetAudioBusFilterEnabled",
                    &["busName", "filterIndex", "isEnabled"],
                ),
                MethodDescriptor::new(
                    "SetAudioBusFilterParam",
                    &["busName", "filterIndex", "paramName", "paramValue"],
                ),
            ],
        }
    }

    /// Name of the context holding this bus's entries.
    pub fn context_name(&self) -> String {
        bus_context_name(&self.name)
    }

    /// Every id the export step emits for this bus, in export order.
    pub fn expected_ids(&self) -> Vec<MessageId> {
        let mut ids: Vec<MessageId> = Role::ALL
            .iter()
            .map(|&role| MessageId::for_bus(&self.name, role))
            .collect();

        for method in &self.methods {
            ids.push(MessageId::for_method(&self.name, &method.name, Role::Name));
            ids.push(MessageId::for_method(&self.name, &method.name, Role::Tooltip));
            for index in 0..method.params.len() as u32 {
                ids.push(MessageId::for_param(&self.name, &method.name, index, Role::Name));
                ids.push(MessageId::for_param(
                    &self.name,
                    &method.name,
                    index,
                    Role::Tooltip,
                ));
            }
        }

        ids
    }

    /// `NAME` ids of the bus, its methods and their parameters that the table
    /// does not contain.
    pub fn missing_names(&self, table: &StringTable) -> Vec<MessageId> {
        self.expected_ids()
            .into_iter()
            .filter(|id| id.role() == Role::Name && table.get(&id.to_string()).is_none())
            .collect()
    }

    /// Regenerate this bus's context.
    ///
    /// Every expected id gets an entry whose source is the id. Non-empty
    /// translations from `existing` are carried over; everything else is left
    /// empty for translators.
    pub fn export_context(&self, existing: Option<&StringTable>) -> Context {
        let mut context = Context::new(self.context_name());
        let mut carried = 0;

        for id in self.expected_ids() {
            let id = id.to_string();
            let translation = existing
                .and_then(|table| table.get(&id))
                .and_then(|entry| entry.translation())
                .unwrap_or_default()
                .to_string();
            if !translation.is_empty() {
                carried += 1;
            }
            context.entries.push(Entry::keyed(id, translation));
        }

        debug!(
            context = %context.name,
            entries = context.entries.len(),
            carried,
            "Exported bus context"
        );
        context
    }

    /// Copy of the table's document with this bus's context regenerated.
    ///
    /// An existing context of the same name is replaced where it stands;
    /// otherwise the new one is appended. Other contexts are kept as they are.
    pub fn export_into(&self, table: &StringTable) -> Document {
        let exported = self.export_context(Some(table));
        let mut document = table.document().clone();

        match document
            .contexts
            .iter()
            .position(|ctx| ctx.name == exported.name)
        {
            Some(index) => document.contexts[index] = exported,
            None => document.contexts.push(exported),
        }
        document
    }
}
