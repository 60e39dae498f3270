//! Dotted key-path addressing into nested documents.

use crate::error::{Result, StoreError};
use crate::types::value_kind;
use serde_json::{Map, Value};

/// A resolved slot: the object holding the last path segment, and that
/// segment's key.
///
/// The key may or may not be present on the parent. Resolution failing and
/// the key being absent are different outcomes.
#[derive(Debug)]
pub struct PathHandle<'a> {
    parent: &'a mut Map<String, Value>,
    key: String,
}

impl<'a> PathHandle<'a> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parent(&self) -> &Map<String, Value> {
        &*self.parent
    }

    pub fn exists(&self) -> bool {
        self.parent.contains_key(&self.key)
    }

    pub fn get(&self) -> Option<&Value> {
        self.parent.get(&self.key)
    }

    pub fn get_mut(&mut self) -> Option<&mut Value> {
        self.parent.get_mut(&self.key)
    }

    /// Delete the slot from its parent, keeping sibling order.
    pub fn remove(self) -> Option<Value> {
        self.parent.shift_remove(&self.key)
    }
}

/// Resolve `path` (segments separated by `.`) against `root`.
///
/// Every segment but the last must name an existing object. Nothing is
/// created along the way: a missing or non-object intermediate is
/// [`StoreError::InvalidPath`], as is an empty path or an empty segment.
pub fn resolve<'a>(root: &'a mut Map<String, Value>, path: &str) -> Result<PathHandle<'a>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(StoreError::InvalidPath(format!("`{}` has an empty segment", path)));
    }

    let (last, walk) = segments
        .split_last()
        .ok_or_else(|| StoreError::InvalidPath("empty path".into()))?;

    let mut parent = root;
    for (depth, segment) in walk.iter().enumerate() {
        parent = match parent.get_mut(*segment) {
            Some(Value::Object(child)) => child,
            Some(other) => {
                return Err(StoreError::InvalidPath(format!(
                    "`{}` is {}, not an object",
                    segments[..=depth].join("."),
                    value_kind(other)
                )))
            }
            None => {
                return Err(StoreError::InvalidPath(format!(
                    "`{}` does not exist",
                    segments[..=depth].join(".")
                )))
            }
        };
    }

    Ok(PathHandle {
        parent,
        key: (*last).to_string(),
    })
}
