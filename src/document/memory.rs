//! In-memory document backend.

use super::DocumentStore;
use crate::error::Result;
use crate::types::Document;
use parking_lot::RwLock;

/// Keeps the document in process memory. Nothing survives a drop.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    document: RwLock<Document>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load(&self) -> Result<Document> {
        Ok(self.document.read().clone())
    }

    fn save(&self, document: &Document) -> Result<()> {
        *self.document.write() = document.clone();
        Ok(())
    }
}
