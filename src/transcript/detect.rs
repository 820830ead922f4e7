//! Schema version detection from the decoded buffer alone

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// Bare array of messages, no reference data
    V1 = 1,
    /// Versioned record with messages and reference tables
    V2 = 2,
}

impl SchemaVersion {
    pub fn number(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Outcome of inspecting a decrypted, decompressed buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionTag {
    Known(SchemaVersion),
    /// Matches no known shape; carries the offending marker for diagnostics
    Unrecognized(String),
}

/// Determine which schema generation produced `buffer`. Never fails.
pub fn detect_version(buffer: &[u8]) -> VersionTag {
    match serde_json::from_slice::<Value>(buffer) {
        Ok(value) => match super::adapter_for(&value) {
            Some(schema) => VersionTag::Known(schema.version),
            None => VersionTag::Unrecognized(describe(&value)),
        },
        Err(e) => VersionTag::Unrecognized(malformed_marker(&e)),
    }
}

pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("version") {
            Some(version) => format!("version {}", version),
            None => "object without version field".to_string(),
        },
        Value::Array(_) => "array".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Bool(b) => format!("bool {}", b),
        Value::Null => "null".to_string(),
    }
}

pub(crate) fn malformed_marker(err: &serde_json::Error) -> String {
    format!("malformed JSON ({})", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detect(value: Value) -> VersionTag {
        detect_version(&serde_json::to_vec(&value).unwrap())
    }

    #[test]
    fn test_array_is_v1() {
        assert_eq!(detect(json!([])), VersionTag::Known(SchemaVersion::V1));
        assert_eq!(
            detect(json!([{"id": "1"}])),
            VersionTag::Known(SchemaVersion::V1)
        );
    }

    #[test]
    fn test_versioned_object_is_v2() {
        assert_eq!(
            detect(json!({"version": 2, "entities": {}, "messages": []})),
            VersionTag::Known(SchemaVersion::V2)
        );
    }

    #[test]
    fn test_other_versions_unrecognized() {
        assert_eq!(
            detect(json!({"version": 3})),
            VersionTag::Unrecognized("version 3".to_string())
        );
        assert_eq!(
            detect(json!({"version": 1})),
            VersionTag::Unrecognized("version 1".to_string())
        );
        assert_eq!(
            detect(json!({"version": "2"})),
            VersionTag::Unrecognized("version \"2\"".to_string())
        );
    }

    #[test]
    fn test_object_without_version() {
        assert_eq!(
            detect(json!({"messages": []})),
            VersionTag::Unrecognized("object without version field".to_string())
        );
    }

    #[test]
    fn test_scalars_unrecognized() {
        assert_eq!(
            detect(json!(7)),
            VersionTag::Unrecognized("number 7".to_string())
        );
        assert!(matches!(detect(json!(null)), VersionTag::Unrecognized(_)));
        assert!(matches!(detect(json!("x")), VersionTag::Unrecognized(_)));
    }

    #[test]
    fn test_non_json_unrecognized() {
        match detect_version(b"\x00\x01binary") {
            VersionTag::Unrecognized(marker) => assert!(marker.starts_with("malformed JSON")),
            other => panic!("unexpected tag {:?}", other),
        }
    }

    #[test]
    fn test_detection_is_deterministic() {
        let buffer = serde_json::to_vec(&json!({"version": 2, "messages": []})).unwrap();
        assert_eq!(detect_version(&buffer), detect_version(&buffer));
    }
}
