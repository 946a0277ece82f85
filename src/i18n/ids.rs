//! Message identifier scheme.
//!
//! Every entry id encodes where its string is shown:
//!
//! ```text
//! <BUS>_<ROLE>                          bus node
//! <BUS>_<METHOD>_<ROLE>                 method node
//! <BUS>_<METHOD>_PARAM<N>_<ROLE>        method parameter slot
//! ```
//!
//! Segments are uppercase alphanumerics. Reflected names such as
//! `AudioEngineSoLoudRequestBus` are turned into segments by [`segment`].

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

static ID_REGEX: OnceLock<Regex> = OnceLock::new();

/// Kind prefix of contexts generated for request buses.
pub const EBUS_CONTEXT_PREFIX: &str = "EBus: ";

/// What a string is used for on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Name,
    Tooltip,
    Category,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Name, Role::Tooltip, Role::Category];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Name => "NAME",
            Role::Tooltip => "TOOLTIP",
            Role::Category => "CATEGORY",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "NAME" => Ok(Role::Name),
            "TOOLTIP" => Ok(Role::Tooltip),
            "CATEGORY" => Ok(Role::Category),
            other => anyhow::bail!("Unknown role: '{}'", other),
        }
    }
}

/// A parsed or constructed entry id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId {
    bus: String,
    method: Option<String>,
    param: Option<u32>,
    role: Role,
}

impl MessageId {
    /// Id of a string on the bus node itself.
    pub fn for_bus(bus: &str, role: Role) -> Self {
        Self {
            bus: segment(bus),
            method: None,
            param: None,
            role,
        }
    }

    /// Id of a string on a method node.
    pub fn for_method(bus: &str, method: &str, role: Role) -> Self {
        Self {
            bus: segment(bus),
            method: Some(segment(method)),
            param: None,
            role,
        }
    }

    /// Id of a string on a method parameter slot (0-based index).
    pub fn for_param(bus: &str, method: &str, index: u32, role: Role) -> Self {
        Self {
            bus: segment(bus),
            method: Some(segment(method)),
            param: Some(index),
            role,
        }
    }

    /// Parse an id string. Returns `None` when the id does not follow the scheme.
    pub fn parse(id: &str) -> Option<Self> {
        let regex = ID_REGEX.get_or_init(|| {
            Regex::new(
                r"^([A-Z0-9]+)(?:_([A-Z0-9]+)(?:_PARAM([0-9]+))?)?_(NAME|TOOLTIP|CATEGORY)$",
            )
            .unwrap()
        });

        let caps = regex.captures(id)?;
        let param = match caps.get(3) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };

        Some(Self {
            bus: caps[1].to_string(),
            method: caps.get(2).map(|m| m.as_str().to_string()),
            param,
            role: caps[4].parse().ok()?,
        })
    }

    pub fn bus(&self) -> &str {
        &self.bus
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn param(&self) -> Option<u32> {
        self.param
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The `NAME` id of the method this id belongs to, if it is a method or
    /// parameter id.
    pub fn method_name_id(&self) -> Option<MessageId> {
        self.method.as_ref().map(|method| MessageId {
            bus: self.bus.clone(),
            method: Some(method.clone()),
            param: None,
            role: Role::Name,
        })
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_", self.bus)?;
        if let Some(method) = &self.method {
            write!(f, "{}_", method)?;
            if let Some(index) = self.param {
                write!(f, "PARAM{}_", index)?;
            }
        }
        f.write_str(self.role.as_str())
    }
}

/// Turn a reflected name into an id segment: uppercase, alphanumerics only.
pub fn segment(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Context name for a reflected request bus (e.g. "EBus: AudioEngineSoLoudRequestBus").
pub fn bus_context_name(bus: &str) -> String {
    format!("{}{}", EBUS_CONTEXT_PREFIX, bus)
}

/// Id prefix shared by every entry of a context, including the trailing
/// underscore (e.g. "AUDIOENGINESOLOUDREQUESTBUS_").
pub fn context_id_prefix(context_name: &str) -> String {
    let bus = context_name
        .split_once(": ")
        .map(|(_, bus)| bus)
        .unwrap_or(context_name);
    format!("{}_", segment(bus))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUS: &str = "AudioEngineSoLoudRequestBus";

    // ==================== Construction Tests ====================

    #[test]
    fn test_for_bus() {
        let id = MessageId::for_bus(BUS, Role::Category);
        assert_eq!(id.to_string(), "AUDIOENGINESOLOUDREQUESTBUS_CATEGORY");
    }

    #[test]
    fn test_for_method() {
        let id = MessageId::for_method(BUS, "SetAudioBusVolumeDb", Role::Name);
        assert_eq!(
            id.to_string(),
            "AUDIOENGINESOLOUDREQUESTBUS_SETAUDIOBUSVOLUMEDB_NAME"
        );
    }

    #[test]
    fn test_for_param() {
        let id = MessageId::for_param(BUS, "SetAudioBusFilterParam", 3, Role::Name);
        assert_eq!(
            id.to_string(),
            "AUDIOENGINESOLOUDREQUESTBUS_SETAUDIOBUSFILTERPARAM_PARAM3_NAME"
        );
    }

    #[test]
    fn test_segment_strips_punctuation() {
        assert_eq!(segment("Set Audio-Bus_Volume (dB)"), "SETAUDIOBUSVOLUMEDB");
        assert_eq!(segment(""), "");
    }

    // ==================== Parse Tests ====================

    #[test]
    fn test_parse_bus_id() {
        let id = MessageId::parse("AUDIOENGINESOLOUDREQUESTBUS_TOOLTIP").unwrap();
        assert_eq!(id.bus(), "AUDIOENGINESOLOUDREQUESTBUS");
        assert_eq!(id.method(), None);
        assert_eq!(id.param(), None);
        assert_eq!(id.role(), Role::Tooltip);
    }

    #[test]
    fn test_parse_method_id() {
        let id = MessageId::parse("AUDIOENGINESOLOUDREQUESTBUS_SETAUDIOBUSMUTED_NAME").unwrap();
        assert_eq!(id.method(), Some("SETAUDIOBUSMUTED"));
        assert_eq!(id.param(), None);
        assert_eq!(id.role(), Role::Name);
    }

    #[test]
    fn test_parse_param_id() {
        let id =
            MessageId::parse("AUDIOENGINESOLOUDREQUESTBUS_LOADAUDIOBUSLAYOUT_PARAM0_TOOLTIP")
                .unwrap();
        assert_eq!(id.method(), Some("LOADAUDIOBUSLAYOUT"));
        assert_eq!(id.param(), Some(0));
        assert_eq!(id.role(), Role::Tooltip);
    }

    #[test]
    fn test_parse_method_ending_in_param() {
        // "SETAUDIOBUSFILTERPARAM" is a method name, not a parameter slot
        let id = MessageId::parse("AUDIOENGINESOLOUDREQUESTBUS_SETAUDIOBUSFILTERPARAM_NAME")
            .unwrap();
        assert_eq!(id.method(), Some("SETAUDIOBUSFILTERPARAM"));
        assert_eq!(id.param(), None);
    }

    #[test]
    fn test_parse_rejects_non_scheme_ids() {
        for bad in [
            "",
            "NAME",
            "bus_NAME",
            "BUS_LABEL",
            "BUS__NAME",
            "BUS_METHOD_PARAMX_NAME",
            "BUS_METHOD_PARAM0_EXTRA_NAME",
        ] {
            assert!(MessageId::parse(bad).is_none(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_method_name_id() {
        let id = MessageId::parse("BUS_METHOD_PARAM2_TOOLTIP").unwrap();
        assert_eq!(id.method_name_id().unwrap().to_string(), "BUS_METHOD_NAME");
        assert!(MessageId::parse("BUS_NAME").unwrap().method_name_id().is_none());
    }

    // ==================== Context Name Tests ====================

    #[test]
    fn test_bus_context_name() {
        assert_eq!(bus_context_name(BUS), "EBus: AudioEngineSoLoudRequestBus");
    }

    #[test]
    fn test_context_id_prefix() {
        assert_eq!(
            context_id_prefix("EBus: AudioEngineSoLoudRequestBus"),
            "AUDIOENGINESOLOUDREQUESTBUS_"
        );
        assert_eq!(context_id_prefix("Handler: MyBus"), "MYBUS_");
        assert_eq!(context_id_prefix("PlainBus"), "PLAINBUS_");
    }

    // ==================== Role Tests ====================

    #[test]
    fn test_role_from_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("name".parse::<Role>().is_err());
    }
}
