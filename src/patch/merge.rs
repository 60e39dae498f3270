//! Recursive merge of partial updates into nested documents.

use serde_json::{Map, Value};

/// Merge `source` into `target` in place.
///
/// For every field of `source`: when both the source value and the existing
/// target value are objects the two are merged recursively. In every other
/// case (arrays, scalars, null, or no object on the target side) the source
/// value replaces the target field. Arrays are replaced whole, never merged
/// element by element.
pub fn merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, source_value) in source {
        match source_value {
            Value::Object(source_object) => match target.get_mut(&key) {
                Some(Value::Object(target_object)) => merge(target_object, source_object),
                _ => {
                    target.insert(key, Value::Object(source_object));
                }
            },
            other => {
                target.insert(key, other);
            }
        }
    }
}
