//! Generic repository over one entity collection.

use super::schema::EntitySchema;
use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::types::{Entity, EntityKind, RawFields};
use serde_json::Value;

/// Add, fetch, update and list the records of one collection.
///
/// Every call is its own load-modify-save cycle against the store.
pub struct CollectionRepository<'a> {
    store: &'a Store,
    schema: &'static EntitySchema,
}

impl<'a> CollectionRepository<'a> {
    pub(crate) fn new(store: &'a Store, kind: EntityKind) -> Self {
        Self {
            store,
            schema: kind.schema(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.schema.kind
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Create a record from raw input.
    ///
    /// Required fields must be present and non-empty. Omitted optional fields
    /// get their defaults. Fails with [`StoreError::DuplicateIdentity`] when
    /// a record with the same identity (ignoring case) exists; the document
    /// is left untouched in that case.
    pub fn add(&self, fields: &RawFields) -> Result<Entity> {
        let entity = self.build(fields)?;
        let identity = entity_identity(&entity, self.schema.identity)
            .unwrap_or_default()
            .to_string();

        let kind = self.schema.kind;
        let field = self.schema.identity;
        self.store.transact(|doc| -> Result<Entity> {
            let records = doc.collection_mut(kind)?;
            if find_index(records, field, &identity).is_some() {
                return Err(StoreError::DuplicateIdentity {
                    kind,
                    field,
                    identity,
                });
            }

            records.push(Value::Object(entity.clone()));
            tracing::debug!(%kind, %identity, total = records.len(), "added record");
            Ok(entity)
        })
    }

    /// Fetch a record by identity, ignoring case. The first match wins.
    pub fn get(&self, identity: &str) -> Result<Entity> {
        let doc = self.store.snapshot()?;
        let records = doc.collection(self.schema.kind)?;

        find_index(records, self.schema.identity, identity)
            .and_then(|i| records[i].as_object().cloned())
            .ok_or_else(|| self.not_found(identity))
    }

    /// Overwrite the fields present in `fields` on an existing record.
    ///
    /// Present fields are written even when empty. Fields that are absent
    /// keep their stored values. The identity field is the lookup key and is
    /// never rewritten.
    pub fn update(&self, identity: &str, fields: &RawFields) -> Result<Entity> {
        let changes = self.coerce_changes(fields)?;

        let kind = self.schema.kind;
        let field = self.schema.identity;
        self.store.transact(|doc| -> Result<Entity> {
            let records = doc.collection_mut(kind)?;
            let record = match find_index(records, field, identity) {
                Some(i) => records[i].as_object_mut(),
                None => None,
            };
            let record = record.ok_or_else(|| self.not_found(identity))?;

            for (name, value) in changes {
                record.insert(name.to_string(), value);
            }

            tracing::debug!(%kind, %identity, "updated record");
            Ok(record.clone())
        })
    }

    /// Identity values of every record, in insertion order.
    pub fn list(&self) -> Result<Vec<String>> {
        let doc = self.store.snapshot()?;
        let records = doc.collection(self.schema.kind)?;

        let mut identities = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            match record_identity(record, self.schema.identity) {
                Some(identity) => identities.push(identity.to_string()),
                None => tracing::warn!(
                    kind = %self.schema.kind,
                    position,
                    "record has no {} field, skipping",
                    self.schema.identity
                ),
            }
        }
        Ok(identities)
    }

    /// Build a complete record from input, applying defaults.
    fn build(&self, fields: &RawFields) -> Result<Entity> {
        self.note_unknown(fields);

        let mut entity = Entity::new();
        for spec in self.schema.fields {
            let value = match fields.get(spec.name) {
                Some(raw) if !raw.is_empty() => spec.coerce(raw)?,
                _ if spec.required => {
                    return Err(StoreError::MissingRequiredField {
                        kind: self.schema.kind,
                        field: spec.name.to_string(),
                    })
                }
                _ => spec.default_value(),
            };
            entity.insert(spec.name.to_string(), value);
        }
        Ok(entity)
    }

    /// Coerce the supplied non-identity fields, in schema order.
    fn coerce_changes(&self, fields: &RawFields) -> Result<Vec<(&'static str, Value)>> {
        self.note_unknown(fields);

        self.schema
            .fields
            .iter()
            .filter(|spec| spec.name != self.schema.identity)
            .filter_map(|spec| fields.get(spec.name).map(|raw| (spec, raw)))
            .map(|(spec, raw)| spec.coerce(raw).map(|value| (spec.name, value)))
            .collect()
    }

    fn note_unknown(&self, fields: &RawFields) {
        for name in fields.keys() {
            if self.schema.field(name).is_none() {
                tracing::debug!(kind = %self.schema.kind, field = %name, "ignoring unknown field");
            }
        }
    }

    fn not_found(&self, identity: &str) -> StoreError {
        StoreError::not_found(self.schema.kind.label(), identity)
    }
}

/// Case-insensitive equality, as used for every identity comparison.
pub(crate) fn same_identity(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub(crate) fn record_identity<'v>(record: &'v Value, field: &str) -> Option<&'v str> {
    record.get(field).and_then(Value::as_str)
}

fn entity_identity<'v>(entity: &'v Entity, field: &str) -> Option<&'v str> {
    entity.get(field).and_then(Value::as_str)
}

/// Position of the first record whose identity matches, ignoring case.
pub(crate) fn find_index(records: &[Value], field: &str, identity: &str) -> Option<usize> {
    records.iter().position(|record| {
        record_identity(record, field).is_some_and(|existing| same_identity(existing, identity))
    })
}
