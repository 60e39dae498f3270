//! Character presence across locations.
//!
//! A location records who is there as plain names in its `characters` list.
//! Nothing ties those names to character records; keeping a character in at
//! most one place is the job of [`move_character`].

use super::repository::{find_index, same_identity};
use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::types::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ROSTER_FIELD: &str = "characters";

/// Where a character was found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub name: String,
    pub region: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl LocationSummary {
    fn from_record(record: &Value) -> Self {
        let text = |field: &str| {
            record
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            name: text("name"),
            region: text("region"),
            kind: text("type"),
        }
    }
}

/// Every location listing `name` among its characters, ignoring case.
///
/// Locations whose character list is not an array are skipped.
pub fn locate_character(store: &Store, name: &str) -> Result<Vec<LocationSummary>> {
    let doc = store.snapshot()?;
    let locations = doc.collection(EntityKind::Location)?;

    Ok(locations
        .iter()
        .filter(|location| lists_character(location, name))
        .map(LocationSummary::from_record)
        .collect())
}

/// Move a character into `destination`, returning the updated location.
///
/// Runs in two saved steps. First `name` is removed from every location's
/// list, then appended to the destination's. If the destination does not
/// exist the second step fails with [`StoreError::NotFound`] and the
/// character stays removed from everywhere.
pub fn move_character(store: &Store, name: &str, destination: &str) -> Result<Entity> {
    let removed = store.transact(|doc| -> Result<usize> {
        let mut removed = 0;
        for location in doc.collection_mut(EntityKind::Location)? {
            if let Some(Value::Array(characters)) = location.get_mut(ROSTER_FIELD) {
                let before = characters.len();
                characters.retain(|c| !c.as_str().is_some_and(|c| same_identity(c, name)));
                removed += before - characters.len();
            }
        }
        Ok(removed)
    })?;
    tracing::debug!(character = %name, removed, "cleared character from locations");

    store.transact(|doc| -> Result<Entity> {
        let locations = doc.collection_mut(EntityKind::Location)?;
        let location = match find_index(locations, "name", destination) {
            Some(i) => locations[i].as_object_mut(),
            None => None,
        };
        let location = location
            .ok_or_else(|| StoreError::not_found("destination location", destination))?;

        match location.get_mut(ROSTER_FIELD) {
            Some(Value::Array(characters)) => characters.push(Value::String(name.to_string())),
            _ => {
                location.insert(
                    ROSTER_FIELD.to_string(),
                    Value::Array(vec![Value::String(name.to_string())]),
                );
            }
        }

        tracing::debug!(character = %name, destination = %destination, "moved character");
        Ok(location.clone())
    })
}

fn lists_character(location: &Value, name: &str) -> bool {
    match location.get(ROSTER_FIELD) {
        Some(Value::Array(characters)) => characters
            .iter()
            .any(|c| c.as_str().is_some_and(|c| same_identity(c, name))),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawFields;
    use serde_json::json;

    fn location(name: &str, characters: &str) -> RawFields {
        [
            ("name", name),
            ("visual_description", "somewhere"),
            ("region", "Town"),
            ("type", "district"),
            ("characters", characters),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_locate_character() {
        let store = Store::in_memory();
        store.locations().add(&location("Tavern", "Bob, Alice")).unwrap();
        store.locations().add(&location("Market", "alice")).unwrap();
        store.locations().add(&location("Docks", "")).unwrap();

        let found = locate_character(&store, "ALICE").unwrap();
        let names: Vec<_> = found.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Tavern", "Market"]);
        assert_eq!(found[0].kind, "district");
    }

    #[test]
    fn test_locate_skips_malformed_lists() {
        let store = Store::in_memory();
        store
            .transact(|doc| -> Result<()> {
                doc.collection_mut(EntityKind::Location)?
                    .push(json!({"name": "Void", "characters": "Bob"}));
                Ok(())
            })
            .unwrap();

        assert!(locate_character(&store, "Bob").unwrap().is_empty());
    }

    #[test]
    fn test_move_between_locations() {
        let store = Store::in_memory();
        store.locations().add(&location("Tavern", "Bob, Alice")).unwrap();
        store.locations().add(&location("Market", "")).unwrap();

        let market = move_character(&store, "Bob", "market").unwrap();
        assert_eq!(market["characters"], json!(["Bob"]));

        let tavern = store.locations().get("Tavern").unwrap();
        assert_eq!(tavern["characters"], json!(["Alice"]));
    }

    #[test]
    fn test_move_removes_every_copy() {
        let store = Store::in_memory();
        store.locations().add(&location("Tavern", "Bob")).unwrap();
        store.locations().add(&location("Docks", "bob, Eve")).unwrap();
        store.locations().add(&location("Market", "")).unwrap();

        move_character(&store, "Bob", "Market").unwrap();

        let found = locate_character(&store, "bob").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Market");
    }

    #[test]
    fn test_move_to_missing_destination_keeps_removal() {
        let store = Store::in_memory();
        store.locations().add(&location("Tavern", "Bob")).unwrap();

        let result = move_character(&store, "Bob", "Market");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));

        assert!(locate_character(&store, "Bob").unwrap().is_empty());
        assert_eq!(
            store.locations().get("Tavern").unwrap()["characters"],
            json!([])
        );
    }

    #[test]
    fn test_move_into_location_without_list() {
        let store = Store::in_memory();
        store
            .transact(|doc| -> Result<()> {
                doc.collection_mut(EntityKind::Location)?
                    .push(json!({"name": "Ruins", "region": "Wilds", "type": "ruin"}));
                Ok(())
            })
            .unwrap();

        let ruins = move_character(&store, "Bob", "Ruins").unwrap();
        assert_eq!(ruins["characters"], json!(["Bob"]));
    }
}
