//! Multi-variant diagram response.
//!
//! The backend returns one description per [`DiagramKind`] on every request:
//!
//! ```json
//! { "flowchart": "...", "sequence": "...", "statemachine": "...", "class": "..." }
//! ```
//!
//! Decoding only checks that the body is a JSON object. Whether the variant
//! for a given kind is usable is decided later by [`DiagramResponse::select`],
//! so one bad variant does not spoil the others.

use codegram_core::DiagramKind;
use serde_json::{Map, Value};

use crate::error::{ResponseShapeError, TransportError};

/// Key the reference backend uses for state-machine diagrams.
///
/// Accepted as a fallback when the canonical `statemachine` key is absent.
const LEGACY_STATE_KEY: &str = "state";

/// Key of the backend's error payload (e.g. unsupported language).
const ERROR_KEY: &str = "error";

/// Decoded backend response holding every diagram variant.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramResponse {
    fields: Map<String, Value>,
}

impl DiagramResponse {
    /// Decode a response body.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Decode` if the body is not a JSON object, and
    /// `TransportError::Rejected` if it is an error payload with no diagrams.
    pub fn decode(body: &[u8]) -> Result<Self, TransportError> {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => return Err(TransportError::Decode(e.to_string())),
        };
        Self::from_value(value)
    }

    /// Build a response from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`DiagramResponse::decode`].
    pub fn from_value(value: Value) -> Result<Self, TransportError> {
        let Value::Object(fields) = value else {
            return Err(TransportError::Decode(format!(
                "expected a JSON object, got {}",
                json_type_name(&value)
            )));
        };

        let response = Self { fields };
        if !response.has_any_variant()
            && let Some(Value::String(message)) = response.fields.get(ERROR_KEY)
        {
            return Err(TransportError::Rejected(message.clone()));
        }

        Ok(response)
    }

    /// Build a response from `(kind, description)` pairs.
    pub fn from_variants<'a>(variants: impl IntoIterator<Item = (DiagramKind, &'a str)>) -> Self {
        let fields = variants
            .into_iter()
            .map(|(kind, description)| (kind.as_str().to_owned(), Value::from(description)))
            .collect();
        Self { fields }
    }

    /// Description for `kind`.
    ///
    /// Reads the field literally named by the kind's identifier. For
    /// [`DiagramKind::StateMachine`] the legacy `state` field is used only when
    /// `statemachine` is absent.
    ///
    /// # Errors
    ///
    /// Returns `ResponseShapeError` if the field is absent, not a string, or
    /// blank.
    pub fn select(&self, kind: DiagramKind) -> Result<&str, ResponseShapeError> {
        let value = self
            .fields
            .get(kind.as_str())
            .or_else(|| match kind {
                DiagramKind::StateMachine => self.fields.get(LEGACY_STATE_KEY),
                _ => None,
            })
            .ok_or(ResponseShapeError::Missing(kind))?;

        match value {
            Value::String(s) if s.trim().is_empty() => Err(ResponseShapeError::Empty(kind)),
            Value::String(s) => Ok(s),
            _ => Err(ResponseShapeError::NotText(kind)),
        }
    }

    /// Kinds whose variant is present and usable.
    pub fn available_kinds(&self) -> impl Iterator<Item = DiagramKind> + '_ {
        DiagramKind::ALL
            .into_iter()
            .filter(|kind| self.select(*kind).is_ok())
    }

    fn has_any_variant(&self) -> bool {
        DiagramKind::ALL
            .iter()
            .any(|kind| self.fields.contains_key(kind.as_str()))
            || self.fields.contains_key(LEGACY_STATE_KEY)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn full_response() -> DiagramResponse {
        DiagramResponse::from_value(json!({
            "flowchart": "graph TD; A-->B;",
            "sequence": "sequenceDiagram\nA ->> B: call",
            "statemachine": "stateDiagram-v2\n[*] --> Start",
            "class": "classDiagram\nclass Foo {}",
        }))
        .unwrap()
    }

    #[test]
    fn test_select_reads_field_named_by_kind() {
        let response = full_response();

        assert_eq!(
            response.select(DiagramKind::Flowchart).unwrap(),
            "graph TD; A-->B;"
        );
        assert_eq!(
            response.select(DiagramKind::Sequence).unwrap(),
            "sequenceDiagram\nA ->> B: call"
        );
        assert_eq!(
            response.select(DiagramKind::StateMachine).unwrap(),
            "stateDiagram-v2\n[*] --> Start"
        );
        assert_eq!(
            response.select(DiagramKind::Class).unwrap(),
            "classDiagram\nclass Foo {}"
        );
    }

    #[test]
    fn test_select_has_no_cross_field_leakage() {
        // Each field holds its own key, so any leakage shows up as a mismatch
        let response = DiagramResponse::from_value(json!({
            "flowchart": "flowchart",
            "sequence": "sequence",
            "statemachine": "statemachine",
            "class": "class",
        }))
        .unwrap();

        for kind in DiagramKind::ALL {
            assert_eq!(response.select(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn test_select_missing_field() {
        let response =
            DiagramResponse::from_variants([(DiagramKind::Flowchart, "graph TD; A-->B;")]);

        assert_eq!(
            response.select(DiagramKind::Class),
            Err(ResponseShapeError::Missing(DiagramKind::Class))
        );
    }

    #[test]
    fn test_select_empty_field() {
        let response = DiagramResponse::from_variants([(DiagramKind::Sequence, "   ")]);

        assert_eq!(
            response.select(DiagramKind::Sequence),
            Err(ResponseShapeError::Empty(DiagramKind::Sequence))
        );
    }

    #[test]
    fn test_select_non_string_field() {
        let response = DiagramResponse::from_value(json!({ "flowchart": 42 })).unwrap();

        assert_eq!(
            response.select(DiagramKind::Flowchart),
            Err(ResponseShapeError::NotText(DiagramKind::Flowchart))
        );
    }

    #[test]
    fn test_legacy_state_key_serves_statemachine() {
        let response = DiagramResponse::from_value(json!({
            "flowchart": "flowchart TD",
            "state": "stateDiagram-v2\n[*] --> Start",
        }))
        .unwrap();

        assert_eq!(
            response.select(DiagramKind::StateMachine).unwrap(),
            "stateDiagram-v2\n[*] --> Start"
        );
    }

    #[test]
    fn test_canonical_statemachine_key_wins_over_legacy() {
        let response = DiagramResponse::from_value(json!({
            "statemachine": "stateDiagram-v2\nA --> B",
            "state": "stateDiagram-v2\nC --> D",
        }))
        .unwrap();

        assert_eq!(
            response.select(DiagramKind::StateMachine).unwrap(),
            "stateDiagram-v2\nA --> B"
        );
    }

    #[test]
    fn test_legacy_state_key_only_applies_to_statemachine() {
        let response = DiagramResponse::from_value(json!({ "state": "stateDiagram-v2" })).unwrap();

        assert_eq!(
            response.select(DiagramKind::Flowchart),
            Err(ResponseShapeError::Missing(DiagramKind::Flowchart))
        );
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = DiagramResponse::decode(b"[1, 2, 3]").unwrap_err();
        assert!(
            matches!(err, TransportError::Decode(ref msg) if msg.contains("an array")),
            "Expected TransportError::Decode, got {err:?}"
        );
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let err = DiagramResponse::decode(b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[test]
    fn test_decode_error_payload_is_rejected() {
        let body = br#"{"error": "Unsupported language: rust"}"#;
        let err = DiagramResponse::decode(body).unwrap_err();
        assert_eq!(
            err,
            TransportError::Rejected("Unsupported language: rust".to_owned())
        );
    }

    #[test]
    fn test_decode_error_key_alongside_variants_is_not_rejected() {
        let body = br#"{"flowchart": "flowchart TD", "error": "partial"}"#;
        let response = DiagramResponse::decode(body).unwrap();
        assert_eq!(
            response.select(DiagramKind::Flowchart).unwrap(),
            "flowchart TD"
        );
    }

    #[test]
    fn test_available_kinds() {
        let response = DiagramResponse::from_value(json!({
            "flowchart": "flowchart TD",
            "sequence": "",
            "class": "classDiagram",
        }))
        .unwrap();

        let kinds: Vec<_> = response.available_kinds().collect();
        assert_eq!(kinds, vec![DiagramKind::Flowchart, DiagramKind::Class]);
    }
}
