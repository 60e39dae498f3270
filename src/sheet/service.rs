//! Operations on the singleton character sheet.

use super::template::blank_sheet;
use crate::error::{Result, StoreError};
use crate::patch::{merge, resolve};
use crate::store::Store;
use crate::types::{value_kind, Sheet, SHEET_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a field removal did not happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalFailure {
    /// The path was empty.
    EmptyPath,
    /// No sheet has been created.
    NoSheet,
    /// The path does not lead through objects.
    InvalidPath,
    /// The path resolved but the field is not there.
    FieldNotFound,
    /// The document could not be read or written.
    Storage,
}

/// Outcome of [`SheetService::remove_field`].
///
/// Removal reports failure through this value instead of an `Err`; check
/// `success` before using `sheet`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemovalReport {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<RemovalFailure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<Sheet>,
}

impl RemovalReport {
    fn removed(message: String, sheet: Sheet) -> Self {
        Self {
            success: true,
            message,
            failure: None,
            sheet: Some(sheet),
        }
    }

    fn failed(failure: RemovalFailure, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            failure: Some(failure),
            sheet: None,
        }
    }
}

/// Internal error for a removal, folded into a report at the end.
enum RemovalError {
    Failed(RemovalFailure, String),
    Store(StoreError),
}

impl From<StoreError> for RemovalError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidPath(message) => {
                RemovalError::Failed(RemovalFailure::InvalidPath, message)
            }
            other => RemovalError::Store(other),
        }
    }
}

/// Create, read, patch and prune the character sheet.
pub struct SheetService<'a> {
    store: &'a Store,
}

impl<'a> SheetService<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Write a blank sheet, replacing any existing one.
    pub fn create(&self) -> Result<Sheet> {
        self.store.transact(|doc| -> Result<Sheet> {
            let replaced = doc.as_map().contains_key(SHEET_KEY);
            let sheet = blank_sheet();
            doc.set_sheet(sheet.clone());

            tracing::debug!(replaced, "created blank sheet");
            Ok(sheet)
        })
    }

    pub fn get(&self) -> Result<Sheet> {
        let doc = self.store.snapshot()?;
        doc.sheet()?.cloned().ok_or_else(no_sheet)
    }

    /// Deep-merge `updates` into the stored sheet.
    ///
    /// Nested objects merge field by field. Arrays and scalars in `updates`
    /// replace what was stored, so adding one item to a list means sending
    /// the whole list.
    pub fn patch(&self, updates: Value) -> Result<Sheet> {
        let updates = match updates {
            Value::Object(updates) => updates,
            other => {
                return Err(StoreError::InvalidInput(format!(
                    "sheet updates must be an object, got {}",
                    value_kind(&other)
                )))
            }
        };

        self.store.transact(|doc| -> Result<Sheet> {
            let sheet = doc.sheet_mut()?.ok_or_else(no_sheet)?;
            tracing::debug!(fields = updates.len(), "patching sheet");
            merge(sheet, updates);
            Ok(sheet.clone())
        })
    }

    /// Remove a field, or values from an array field, at a dotted path.
    ///
    /// When the field holds an array and `value` is given, every element
    /// equal to `value` is removed and the (possibly empty) array stays.
    /// Otherwise the field itself is deleted from its parent.
    pub fn remove_field(&self, path: &str, value: Option<Value>) -> RemovalReport {
        if path.is_empty() {
            return RemovalReport::failed(RemovalFailure::EmptyPath, "path must not be empty");
        }

        let outcome = self
            .store
            .transact(|doc| -> std::result::Result<(String, Sheet), RemovalError> {
                let sheet = doc.sheet_mut()?.ok_or_else(|| {
                    RemovalError::Failed(RemovalFailure::NoSheet, "no sheet exists".to_string())
                })?;

                let mut handle = resolve(sheet, path)?;
                let missing = || {
                    RemovalError::Failed(
                        RemovalFailure::FieldNotFound,
                        format!("`{}` does not exist", path),
                    )
                };
                let message = match value {
                    Some(value) => match handle.get_mut() {
                        None => return Err(missing()),
                        Some(Value::Array(items)) => {
                            let before = items.len();
                            items.retain(|item| *item != value);
                            format!("removed {} of {} from `{}`", before - items.len(), value, path)
                        }
                        Some(_) => {
                            handle.remove();
                            format!("removed `{}`", path)
                        }
                    },
                    None => match handle.remove() {
                        Some(_) => format!("removed `{}`", path),
                        None => return Err(missing()),
                    },
                };

                Ok((message, sheet.clone()))
            });

        match outcome {
            Ok((message, sheet)) => {
                tracing::debug!(%path, %message, "sheet field removal");
                RemovalReport::removed(message, sheet)
            }
            Err(RemovalError::Failed(failure, message)) => {
                tracing::debug!(%path, ?failure, %message, "sheet field removal refused");
                RemovalReport::failed(failure, message)
            }
            Err(RemovalError::Store(e)) => {
                RemovalReport::failed(RemovalFailure::Storage, e.to_string())
            }
        }
    }
}

fn no_sheet() -> StoreError {
    StoreError::not_found("sheet", "sheet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with_sheet() -> Store {
        let store = Store::in_memory();
        store.sheet().create().unwrap();
        store
    }

    #[test]
    fn test_get_without_sheet() {
        let store = Store::in_memory();
        assert!(matches!(store.sheet().get(), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_create_replaces_existing() {
        let store = store_with_sheet();
        store.sheet().patch(json!({"name": "Aria", "level": 4})).unwrap();

        let fresh = store.sheet().create().unwrap();
        assert_eq!(fresh["name"], "");
        assert_eq!(store.sheet().get().unwrap(), fresh);
    }

    #[test]
    fn test_patch_preserves_siblings() {
        let store = store_with_sheet();
        store
            .sheet()
            .patch(json!({"misc": {"wealth": {"gold": 50}}}))
            .unwrap();

        let sheet = store.sheet().get().unwrap();
        assert_eq!(sheet["misc"]["wealth"]["gold"], 50);
        assert_eq!(sheet["misc"]["titles"], json!([]));
        assert_eq!(sheet["misc"]["achievements"], json!([]));
    }

    #[test]
    fn test_patch_replaces_arrays() {
        let store = store_with_sheet();
        let sheet = store.sheet();
        sheet.patch(json!({"equipment": ["rope", "torch"]})).unwrap();
        let patched = sheet.patch(json!({"equipment": ["lantern"]})).unwrap();

        assert_eq!(patched["equipment"], json!(["lantern"]));
    }

    #[test]
    fn test_patch_rejects_non_object() {
        let store = store_with_sheet();
        for updates in [json!([1]), json!("gold"), json!(null), json!(3)] {
            assert!(matches!(
                store.sheet().patch(updates),
                Err(StoreError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_patch_checks_input_before_sheet() {
        let store = Store::in_memory();
        assert!(matches!(
            store.sheet().patch(json!([])),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            store.sheet().patch(json!({"name": "Aria"})),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_remove_value_from_array() {
        let store = store_with_sheet();
        store
            .sheet()
            .patch(json!({"misc": {"titles": ["Hero", "Sage", "Hero"]}}))
            .unwrap();

        let report = store.sheet().remove_field("misc.titles", Some(json!("Hero")));
        assert!(report.success);
        assert_eq!(report.sheet.unwrap()["misc"]["titles"], json!(["Sage"]));
    }

    #[test]
    fn test_remove_last_value_keeps_field() {
        let store = store_with_sheet();
        store.sheet().patch(json!({"equipment": ["rope"]})).unwrap();

        let report = store.sheet().remove_field("equipment", Some(json!("rope")));
        assert!(report.success);
        assert_eq!(store.sheet().get().unwrap()["equipment"], json!([]));
    }

    #[test]
    fn test_remove_whole_field() {
        let store = store_with_sheet();

        let report = store.sheet().remove_field("misc.wealth", None);
        assert!(report.success);

        let sheet = store.sheet().get().unwrap();
        assert!(sheet["misc"].get("wealth").is_none());
        assert_eq!(sheet["misc"]["titles"], json!([]));
    }

    #[test]
    fn test_remove_scalar_with_value_deletes_field() {
        let store = store_with_sheet();

        let report = store.sheet().remove_field("xp", Some(json!(5)));
        assert!(report.success);
        assert!(store.sheet().get().unwrap().get("xp").is_none());
    }

    #[test]
    fn test_remove_failures_are_reported() {
        let store = Store::in_memory();
        let report = store.sheet().remove_field("misc.titles", None);
        assert!(!report.success);
        assert_eq!(report.failure, Some(RemovalFailure::NoSheet));

        store.sheet().create().unwrap();

        let report = store.sheet().remove_field("", None);
        assert_eq!(report.failure, Some(RemovalFailure::EmptyPath));

        let report = store.sheet().remove_field("misc.bank.gold", None);
        assert_eq!(report.failure, Some(RemovalFailure::InvalidPath));

        let report = store.sheet().remove_field("misc.wealth.platinum", None);
        assert_eq!(report.failure, Some(RemovalFailure::FieldNotFound));
        assert!(report.sheet.is_none());
    }

    #[test]
    fn test_failed_removal_leaves_sheet() {
        let store = store_with_sheet();
        let before = store.sheet().get().unwrap();

        store.sheet().remove_field("abilities.LUCK", None);
        assert_eq!(store.sheet().get().unwrap(), before);
    }

    #[test]
    fn test_report_serialization() {
        let report = RemovalReport::failed(RemovalFailure::FieldNotFound, "`xp` does not exist");
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value,
            json!({"success": false, "message": "`xp` does not exist", "failure": "field_not_found"})
        );
    }
}
