//! # Campaign Store
//!
//! A single-file document store for tabletop campaign data: characters,
//! locations, quests, scenes and one character sheet.
//!
//! ## Core Concepts
//!
//! - **Document**: one JSON object holding every collection and the sheet,
//!   read and written whole on each operation
//! - **Collections**: records with a case-insensitive identity field, created
//!   with defaults and updated one field at a time
//! - **Sheet**: a free-form nested document edited by deep merge and by
//!   dotted-path removal
//!
//! ## Example
//!
//! ```ignore
//! use lorekeeper::{Store, StoreConfig};
//! use serde_json::json;
//!
//! let store = Store::open_or_create(StoreConfig {
//!     path: "./campaign.json".into(),
//!     ..Default::default()
//! })?;
//!
//! // Add a location
//! let fields = [("name", "Tavern"), ("visual_description", "Smoky"),
//!               ("region", "Town"), ("type", "inn")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//! store.locations().add(&fields)?;
//!
//! // Start a sheet and give it some gold
//! store.sheet().create()?;
//! store.sheet().patch(json!({"misc": {"wealth": {"gold": 50}}}))?;
//!
//! // Drop a title again
//! let report = store.sheet().remove_field("misc.titles", Some(json!("Hero")));
//! assert!(report.success);
//! ```

pub mod collections;
pub mod document;
pub mod error;
pub mod patch;
pub mod sheet;
pub mod store;
pub mod types;

// Re-exports
pub use collections::{CollectionRepository, EntitySchema, FieldKind, FieldSpec, LocationSummary};
pub use document::{DocumentStore, FileDocumentStore, MemoryDocumentStore};
pub use error::{Result, StoreError};
pub use patch::{merge, resolve, PathHandle};
pub use sheet::{blank_sheet, RemovalFailure, RemovalReport, SheetService};
pub use store::{Store, StoreConfig, StoreStats, DATA_PATH_ENV};
pub use types::*;
