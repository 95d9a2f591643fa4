//! Persisted potential record layout
//!
//! Records are nested JSON objects under `interatomic-potential`. A key that
//! repeats holds a list, a key that occurs once holds the bare value, so
//! readers accept both forms.

use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::error::{PotentialsError, Result};

pub const ROOT: &str = "interatomic-potential";
pub const KEY: &str = "key";
pub const ID: &str = "id";
pub const RECORD_VERSION: &str = "record-version";
pub const DESCRIPTION: &str = "description";
pub const CITATION: &str = "citation";
pub const DOI: &str = "DOI";
pub const NOTES: &str = "notes";
pub const TEXT: &str = "text";
pub const ELEMENT: &str = "element";
pub const FICTIONAL_ELEMENT: &str = "fictional-element";
pub const OTHER_ELEMENT: &str = "other-element";

/// A stored potential record in any of the accepted forms
#[derive(Debug, Clone)]
pub enum PotentialModel {
    /// JSON text
    Json(String),
    /// Path to a JSON file
    Path(PathBuf),
    /// Already-parsed JSON
    Value(Value),
}

impl PotentialModel {
    /// Treat `text` as a file path when such a file exists, else as JSON
    pub fn from_text_or_path(text: &str) -> Self {
        let path = PathBuf::from(text);
        if path.is_file() {
            PotentialModel::Path(path)
        } else {
            PotentialModel::Json(text.to_string())
        }
    }

    pub fn into_value(self) -> Result<Value> {
        match self {
            PotentialModel::Json(text) => Ok(serde_json::from_str(&text)?),
            PotentialModel::Path(path) => {
                let text = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&text)?)
            }
            PotentialModel::Value(value) => Ok(value),
        }
    }
}

impl From<Value> for PotentialModel {
    fn from(value: Value) -> Self {
        PotentialModel::Value(value)
    }
}

impl From<PathBuf> for PotentialModel {
    fn from(path: PathBuf) -> Self {
        PotentialModel::Path(path)
    }
}

impl From<&std::path::Path> for PotentialModel {
    fn from(path: &std::path::Path) -> Self {
        PotentialModel::Path(path.to_path_buf())
    }
}

/// Add `value` under `key`, turning an existing entry into a list
pub(crate) fn append(map: &mut Map<String, Value>, key: &str, value: Value) {
    match map.get_mut(key) {
        None => {
            map.insert(key.to_string(), value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// Object holding a single entry
pub(crate) fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Every value stored under `key`: none, the bare value, or the list items
pub(crate) fn as_list<'a>(map: &'a Map<String, Value>, key: &str) -> Vec<&'a Value> {
    match map.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(value) => vec![value],
    }
}

/// Object stored under `key`, failing with a missing-field error
pub(crate) fn object<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a Map<String, Value>> {
    map.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| PotentialsError::MissingField(key.to_string()))
}

/// Scalar stored under `key` rendered as a string
pub(crate) fn string(map: &Map<String, Value>, key: &str) -> Result<String> {
    map.get(key)
        .and_then(scalar_to_string)
        .ok_or_else(|| PotentialsError::MissingField(key.to_string()))
}

/// Strings and numbers as text; anything else is not a scalar
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// List of strings stored under `key`
pub(crate) fn strings(map: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    as_list(map, key)
        .into_iter()
        .map(|value| {
            scalar_to_string(value).ok_or_else(|| {
                PotentialsError::Validation(format!("{} entries must be strings", key))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_single_then_list() {
        let mut map = Map::new();
        append(&mut map, ELEMENT, json!("Ni"));
        assert_eq!(map[ELEMENT], json!("Ni"));

        append(&mut map, ELEMENT, json!("Al"));
        append(&mut map, ELEMENT, json!("Co"));
        assert_eq!(map[ELEMENT], json!(["Ni", "Al", "Co"]));
    }

    #[test]
    fn test_as_list_forms() {
        let map = json!({"a": "x", "b": ["y", "z"], "c": null})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(as_list(&map, "a"), vec![&json!("x")]);
        assert_eq!(as_list(&map, "b").len(), 2);
        assert!(as_list(&map, "c").is_empty());
        assert!(as_list(&map, "missing").is_empty());
    }

    #[test]
    fn test_strings_rejects_objects() {
        let map = json!({"element": [{"symbol": "Cu"}]})
            .as_object()
            .cloned()
            .unwrap();
        assert!(matches!(
            strings(&map, ELEMENT),
            Err(PotentialsError::Validation(_))
        ));
    }

    #[test]
    fn test_model_from_text_or_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        std::fs::write(&path, r#"{"interatomic-potential": {}}"#).unwrap();

        let from_path = PotentialModel::from_text_or_path(path.to_str().unwrap());
        assert!(matches!(from_path, PotentialModel::Path(_)));
        assert_eq!(
            from_path.into_value().unwrap(),
            json!({"interatomic-potential": {}})
        );

        let from_text = PotentialModel::from_text_or_path(r#"{"a": 1}"#);
        assert_eq!(from_text.into_value().unwrap(), json!({"a": 1}));

        let bad = PotentialModel::Json("{not json".to_string());
        assert!(matches!(bad.into_value(), Err(PotentialsError::Json(_))));
    }
}
