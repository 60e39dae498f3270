//! Core types for the campaign store.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// A single collection record: field name to JSON value.
pub type Entity = Map<String, Value>;

/// The singleton character sheet.
pub type Sheet = Map<String, Value>;

/// Raw caller input for collection operations, field name to unparsed value.
pub type RawFields = HashMap<String, String>;

/// Top-level key holding the character sheet.
pub const SHEET_KEY: &str = "sheet";

/// The kinds of record kept in collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    Location,
    Quest,
    Scene,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Character,
        EntityKind::Location,
        EntityKind::Quest,
        EntityKind::Scene,
    ];

    /// Top-level document key of this kind's collection.
    pub fn collection_key(self) -> &'static str {
        match self {
            EntityKind::Character => "characters",
            EntityKind::Location => "locations",
            EntityKind::Quest => "quests",
            EntityKind::Scene => "scenes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Location => "location",
            EntityKind::Quest => "quest",
            EntityKind::Scene => "scene",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The root document holding every collection and the sheet.
///
/// Unknown top-level keys are carried through untouched so that a save never
/// drops data this crate does not understand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// An empty document (`{}`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse persisted bytes.
    ///
    /// Empty or whitespace-only content is an empty document. Anything that
    /// is not a JSON object is corrupted.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(Document(map)),
            Ok(other) => Err(StoreError::CorruptedDocument(format!(
                "top-level value is {}, expected an object",
                value_kind(&other)
            ))),
            Err(e) => Err(StoreError::CorruptedDocument(e.to_string())),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Records of one collection. A missing or null collection is empty.
    pub fn collection(&self, kind: EntityKind) -> Result<&[Value]> {
        let key = kind.collection_key();
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(malformed(key, "an array", other)),
        }
    }

    /// Mutable records of one collection, created empty when missing.
    pub fn collection_mut(&mut self, kind: EntityKind) -> Result<&mut Vec<Value>> {
        let key = kind.collection_key();
        let slot = self.0.entry(key).or_insert(Value::Null);
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }

        match slot {
            Value::Array(items) => Ok(items),
            other => Err(malformed(key, "an array", other)),
        }
    }

    pub fn sheet(&self) -> Result<Option<&Sheet>> {
        match self.0.get(SHEET_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(sheet)) => Ok(Some(sheet)),
            Some(other) => Err(malformed(SHEET_KEY, "an object", other)),
        }
    }

    pub fn sheet_mut(&mut self) -> Result<Option<&mut Sheet>> {
        match self.0.get_mut(SHEET_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(sheet)) => Ok(Some(sheet)),
            Some(other) => Err(malformed(SHEET_KEY, "an object", other)),
        }
    }

    /// Install a sheet, replacing any existing one.
    pub fn set_sheet(&mut self, sheet: Sheet) {
        self.0.insert(SHEET_KEY.to_string(), Value::Object(sheet));
    }
}

fn malformed(key: &str, expected: &str, found: &Value) -> StoreError {
    StoreError::CorruptedDocument(format!(
        "`{}` is {}, expected {}",
        key,
        value_kind(found),
        expected
    ))
}

/// Short name of a JSON value's variant, for messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
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
    use serde_json::json;

    #[test]
    fn test_parse_empty_content() {
        assert_eq!(Document::parse(b"").unwrap(), Document::new());
        assert_eq!(Document::parse(b"  \n\t").unwrap(), Document::new());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let result = Document::parse(b"{\"characters\": [");
        assert!(matches!(result, Err(StoreError::CorruptedDocument(_))));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let result = Document::parse(b"[1, 2, 3]");
        assert!(matches!(result, Err(StoreError::CorruptedDocument(_))));
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let doc = Document::new();
        assert!(doc.collection(EntityKind::Quest).unwrap().is_empty());
    }

    #[test]
    fn test_collection_mut_creates_array() {
        let mut doc = Document::new();
        doc.collection_mut(EntityKind::Scene)
            .unwrap()
            .push(json!({"title": "Ambush"}));

        assert_eq!(doc.as_map()["scenes"], json!([{"title": "Ambush"}]));
    }

    #[test]
    fn test_non_array_collection_is_corrupted() {
        let doc = Document::parse(br#"{"locations": {"name": "Tavern"}}"#).unwrap();
        assert!(matches!(
            doc.collection(EntityKind::Location),
            Err(StoreError::CorruptedDocument(_))
        ));
    }

    #[test]
    fn test_unknown_keys_survive_roundtrip() {
        let doc = Document::parse(br#"{"factions": ["Guild"], "characters": []}"#).unwrap();
        let bytes = serde_json::to_vec(&doc).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["factions"], json!(["Guild"]));
    }

    #[test]
    fn test_sheet_absent_and_null() {
        assert!(Document::new().sheet().unwrap().is_none());

        let doc = Document::parse(br#"{"sheet": null}"#).unwrap();
        assert!(doc.sheet().unwrap().is_none());
    }
}
