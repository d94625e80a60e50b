//! Wire protocol shared by the bridge and the panel firmware.
//!
//! Both directions carry a flat two-field JSON record `{"name", "value"}`
//! with no versioning; schema changes require updating both endpoints.
//! Keeping the shapes in a dedicated crate keeps the runtime crates free of
//! codec details.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod vocab;

/// Sentinel substituted when an inbound record carries no usable name.
pub const UNKNOWN_EVENT_NAME: &str = "unknown";

const LOG_PREVIEW_LIMIT: usize = 120;

/// Outbound command record. Field order is fixed by the struct, which keeps
/// the encoded form canonical and consecutive-duplicate comparison on the
/// encoded string meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelCommand {
    pub name: String,
    pub value: String,
}

impl PanelCommand {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Compact JSON encoding used on the wire and as the dedup key.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Event decoded from an inbound panel message. `value` stays an open JSON
/// value; the panel reports plain strings for most events but structured
/// payloads for things like device info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelEvent {
    pub name: String,
    pub value: Value,
}

impl PanelEvent {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// String form of the value: borrowed for JSON strings, empty for null,
    /// compact JSON otherwise.
    pub fn value_str(&self) -> Cow<'_, str> {
        match &self.value {
            Value::String(text) => Cow::Borrowed(text.as_str()),
            Value::Null => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Deserializes the value into a concrete type, `None` when it does not
    /// fit.
    pub fn value_as<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.value.clone()).ok()
    }
}

/// Decodes one inbound payload. Only a JSON parse failure is an error; a
/// payload missing the `name`/`value` shape decodes with the `unknown`
/// sentinel name and an empty value, since the device is untrusted input.
pub fn decode_event(payload: &str) -> serde_json::Result<PanelEvent> {
    let record: Value = serde_json::from_str(payload)?;
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_EVENT_NAME)
        .to_string();
    let value = record
        .get("value")
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()));
    Ok(PanelEvent { name, value })
}

/// Bounded preview of a payload for log lines. Long payloads are cut at a
/// char boundary with the original byte length appended.
pub fn preview(text: &str) -> Cow<'_, str> {
    if text.len() <= LOG_PREVIEW_LIMIT {
        return Cow::Borrowed(text);
    }
    let mut end = LOG_PREVIEW_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}... ({} bytes)", &text[..end], text.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_encoding_is_canonical() {
        let cmd = PanelCommand::new("goto_page", "home");
        assert_eq!(
            cmd.encode().unwrap(),
            r#"{"name":"goto_page","value":"home"}"#
        );
    }

    #[test]
    fn equal_commands_encode_identically() {
        let a = PanelCommand::new("notify", "hello").encode().unwrap();
        let b = PanelCommand::new("notify", "hello").encode().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn decodes_well_formed_event() {
        let event = decode_event(r#"{"name":"touch","value":"button1"}"#).unwrap();
        assert_eq!(event.name, "touch");
        assert_eq!(event.value_str(), "button1");
    }

    #[test]
    fn decodes_structured_value() {
        let event = decode_event(r#"{"name":"res_device_info","value":{"fw":12}}"#).unwrap();
        assert_eq!(event.name, "res_device_info");
        assert_eq!(event.value["fw"], 12);
        assert_eq!(event.value_str(), r#"{"fw":12}"#);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let event = decode_event(r#"{"value":"orphan"}"#).unwrap();
        assert_eq!(event.name, UNKNOWN_EVENT_NAME);
        assert_eq!(event.value_str(), "orphan");

        let event = decode_event(r#"{"name":"sleep"}"#).unwrap();
        assert_eq!(event.name, "sleep");
        assert_eq!(event.value_str(), "");
    }

    #[test]
    fn non_object_payload_decodes_to_sentinel() {
        let event = decode_event("42").unwrap();
        assert_eq!(event.name, UNKNOWN_EVENT_NAME);
        assert_eq!(event.value_str(), "");
    }

    #[test]
    fn non_string_name_decodes_to_sentinel() {
        let event = decode_event(r#"{"name":7,"value":"x"}"#).unwrap();
        assert_eq!(event.name, UNKNOWN_EVENT_NAME);
        assert_eq!(event.value_str(), "x");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(decode_event("not-json").is_err());
    }

    #[test]
    fn value_as_deserializes_concrete_types() {
        let event = PanelEvent::new("brightness", serde_json::json!(80));
        assert_eq!(event.value_as::<u8>(), Some(80));
        assert_eq!(event.value_as::<String>(), None);
    }

    #[test]
    fn preview_keeps_short_payloads_borrowed() {
        assert!(matches!(preview("short"), Cow::Borrowed("short")));
    }

    #[test]
    fn preview_truncates_long_payloads() {
        let long = "x".repeat(500);
        let shown = preview(&long);
        assert!(shown.len() < long.len());
        assert!(shown.ends_with("(500 bytes)"));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let long = "é".repeat(200);
        let shown = preview(&long);
        assert!(shown.starts_with('é'));
    }
}
