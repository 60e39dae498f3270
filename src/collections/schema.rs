//! Per-kind field tables driving the generic repository.

use crate::error::{Result, StoreError};
use crate::types::EntityKind;
use serde_json::{Number, Value};

/// How a raw input string becomes a stored value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored verbatim as a string.
    Text,
    /// Parsed as a number.
    Number,
    /// Split on `,`, each element trimmed.
    List,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Default for an omitted optional text field. Lists default to `[]`.
    pub default: &'static str,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
        default: "",
    }
}

const fn optional(name: &'static str, kind: FieldKind, default: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
        default,
    }
}

impl FieldSpec {
    /// Value synthesized when an optional field is omitted on creation.
    pub fn default_value(&self) -> Value {
        match self.kind {
            FieldKind::List => Value::Array(Vec::new()),
            FieldKind::Number => Value::from(0),
            FieldKind::Text => Value::String(self.default.to_string()),
        }
    }

    /// Convert raw input into the stored representation.
    ///
    /// Blank input for a number field stores `0`.
    pub fn coerce(&self, raw: &str) -> Result<Value> {
        match self.kind {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            FieldKind::List => Ok(Value::Array(split_list(raw))),
            FieldKind::Number if raw.trim().is_empty() => Ok(Value::from(0)),
            FieldKind::Number => parse_number(raw).ok_or_else(|| {
                StoreError::InvalidInput(format!("`{}` must be a number, got {:?}", self.name, raw))
            }),
        }
    }
}

/// Field layout of one entity kind.
#[derive(Debug)]
pub struct EntitySchema {
    pub kind: EntityKind,
    /// Field used for lookup and uniqueness.
    pub identity: &'static str,
    /// All known fields in stored order. The identity field comes first.
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

static CHARACTER: EntitySchema = EntitySchema {
    kind: EntityKind::Character,
    identity: "name",
    fields: &[
        required("name", FieldKind::Text),
        optional("race", FieldKind::Text, ""),
        required("age", FieldKind::Number),
        required("personality", FieldKind::Text),
        required("goals", FieldKind::Text),
        required("visual_description", FieldKind::Text),
        optional("relationship", FieldKind::Text, ""),
    ],
};

static LOCATION: EntitySchema = EntitySchema {
    kind: EntityKind::Location,
    identity: "name",
    fields: &[
        required("name", FieldKind::Text),
        required("visual_description", FieldKind::Text),
        required("region", FieldKind::Text),
        required("type", FieldKind::Text),
        optional("notes", FieldKind::Text, ""),
        optional("factions", FieldKind::Text, ""),
        optional("characters", FieldKind::List, ""),
    ],
};

static QUEST: EntitySchema = EntitySchema {
    kind: EntityKind::Quest,
    identity: "title",
    fields: &[
        required("title", FieldKind::Text),
        required("description", FieldKind::Text),
        optional("status", FieldKind::Text, "available"),
        required("locations", FieldKind::List),
        optional("reward", FieldKind::Text, ""),
        optional("notes", FieldKind::Text, ""),
    ],
};

static SCENE: EntitySchema = EntitySchema {
    kind: EntityKind::Scene,
    identity: "title",
    fields: &[
        required("title", FieldKind::Text),
        required("description", FieldKind::Text),
        optional("location", FieldKind::Text, ""),
        optional("characters", FieldKind::List, ""),
        optional("notes", FieldKind::Text, ""),
    ],
};

impl EntityKind {
    pub fn schema(self) -> &'static EntitySchema {
        match self {
            EntityKind::Character => &CHARACTER,
            EntityKind::Location => &LOCATION,
            EntityKind::Quest => &QUEST,
            EntityKind::Scene => &SCENE,
        }
    }
}

/// Split comma-separated input, trimming each element.
///
/// Empty elements are dropped, so `"Bob,,Eve,"` gives `["Bob", "Eve"]`
/// rather than keeping blank names in the list.
pub fn split_list(raw: &str) -> Vec<Value> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| Value::String(item.to_string()))
        .collect()
}

fn parse_number(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Value::from(n));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_is_first_and_required() {
        for kind in EntityKind::ALL {
            let schema = kind.schema();
            assert_eq!(schema.kind, kind);
            assert_eq!(schema.fields[0].name, schema.identity);
            assert!(schema.fields[0].required);
        }
    }

    #[test]
    fn test_split_list_trims() {
        assert_eq!(split_list(" Bob ,Alice,  Eve"), vec![json!("Bob"), json!("Alice"), json!("Eve")]);
    }

    #[test]
    fn test_split_list_drops_empty_elements() {
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
        assert_eq!(split_list("Bob,,Eve,"), vec![json!("Bob"), json!("Eve")]);
    }

    #[test]
    fn test_number_coercion() {
        let age = CHARACTER.field("age").unwrap();
        assert_eq!(age.coerce("42").unwrap(), json!(42));
        assert_eq!(age.coerce(" 7 ").unwrap(), json!(7));
        assert_eq!(age.coerce("1.5").unwrap(), json!(1.5));
    }

    #[test]
    fn test_blank_number_is_zero() {
        let age = CHARACTER.field("age").unwrap();
        assert_eq!(age.coerce("").unwrap(), json!(0));
        assert_eq!(age.coerce("  ").unwrap(), json!(0));
    }

    #[test]
    fn test_number_coercion_rejects_garbage() {
        let age = CHARACTER.field("age").unwrap();
        assert!(matches!(age.coerce("old"), Err(StoreError::InvalidInput(_))));
        assert!(matches!(age.coerce("NaN"), Err(StoreError::InvalidInput(_))));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(QUEST.field("status").unwrap().default_value(), json!("available"));
        assert_eq!(LOCATION.field("characters").unwrap().default_value(), json!([]));
        assert_eq!(LOCATION.field("notes").unwrap().default_value(), json!(""));
    }
}
