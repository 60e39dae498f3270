//! Error types for the campaign store.

use crate::types::EntityKind;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing required {kind} field: {field}")]
    MissingRequiredField { kind: EntityKind, field: String },

    #[error("A {kind} with {field} '{identity}' already exists")]
    DuplicateIdentity {
        kind: EntityKind,
        field: &'static str,
        identity: String,
    },

    #[error("{what} not found: {identity}")]
    NotFound { what: String, identity: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Corrupted document: {0}")]
    CorruptedDocument(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Document is locked by another process")]
    Locked,
}

impl StoreError {
    pub(crate) fn not_found(what: impl Into<String>, identity: impl Into<String>) -> Self {
        StoreError::NotFound {
            what: what.into(),
            identity: identity.into(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
