//! Whole-document persistence.
//!
//! A backend only knows how to read the complete document and how to replace
//! it. Every mutation in the crate is a load, an in-memory edit and a save.

mod file;
mod memory;

pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;

use crate::error::Result;
use crate::types::Document;

/// Whole-document read and write.
///
/// Implementations must never expose a half-written document: after a failed
/// `save` a subsequent `load` returns either the previous document or the new
/// one, never a mix of the two.
pub trait DocumentStore: Send + Sync {
    /// Read the current document. Absent or empty storage is `{}`.
    fn load(&self) -> Result<Document>;

    /// Replace the stored document.
    fn save(&self, document: &Document) -> Result<()>;
}
