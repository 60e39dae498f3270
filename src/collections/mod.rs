//! Entity collections: characters, locations, quests and scenes.
//!
//! One repository implementation serves every kind. The differences between
//! kinds (identity field, required fields, list fields, defaults) live in the
//! schema table.

mod repository;
mod roster;
mod schema;

pub use repository::CollectionRepository;
pub use roster::{locate_character, move_character, LocationSummary};
pub use schema::{split_list, EntitySchema, FieldKind, FieldSpec};
