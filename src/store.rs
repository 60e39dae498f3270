//! Main Store struct tying all components together.

use crate::collections::{
    locate_character, move_character, CollectionRepository, LocationSummary,
};
use crate::document::{DocumentStore, FileDocumentStore, MemoryDocumentStore};
use crate::error::{Result, StoreError};
use crate::sheet::SheetService;
use crate::types::{Document, Entity, EntityKind};
use parking_lot::Mutex;
use std::io;
use std::path::PathBuf;

/// Environment variable overriding [`StoreConfig::path`].
pub const DATA_PATH_ENV: &str = "LOREKEEPER_DATA_PATH";

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Path of the JSON document.
    pub path: PathBuf,

    /// Whether to create the document if it doesn't exist.
    pub create_if_missing: bool,

    /// Write indented JSON.
    pub pretty: bool,

    /// Hold an exclusive lock file while the store is open.
    pub lock_file: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data.json"),
            create_if_missing: true,
            pretty: true,
            lock_file: true,
        }
    }
}

impl StoreConfig {
    /// Defaults, with the path taken from `LOREKEEPER_DATA_PATH` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(DATA_PATH_ENV).filter(|p| !p.is_empty()) {
            config.path = PathBuf::from(path);
        }
        config
    }
}

/// Record counts per collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub characters: usize,
    pub locations: usize,
    pub quests: usize,
    pub scenes: usize,
    pub has_sheet: bool,
}

/// The campaign store.
///
/// Provides a unified interface for:
/// - Collection repositories for characters, locations, quests and scenes
/// - Character movement between locations
/// - The character sheet
///
/// Every operation loads the whole document, changes it in memory and saves
/// it back. Operations through one `Store` are serialized; writers in other
/// processes are kept out by the lock file only when it is enabled.
pub struct Store {
    /// Whole-document persistence.
    backend: Box<dyn DocumentStore>,

    /// Lock for read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl Store {
    /// Open an existing document or create a new one.
    pub fn open_or_create(config: StoreConfig) -> Result<Self> {
        if config.path.exists() {
            Self::open(config)
        } else if config.create_if_missing {
            Self::create(config)
        } else {
            Err(missing_document(&config))
        }
    }

    /// Create a store backed by a new, empty document, replacing any file
    /// already at the path.
    pub fn create(config: StoreConfig) -> Result<Self> {
        let backend = Self::file_backend(&config)?;
        backend.save(&Document::new())?;

        tracing::info!(path = %config.path.display(), "created campaign store");
        Ok(Self::with_backend(backend))
    }

    /// Open an existing document. It is read once up front so a corrupted
    /// file is reported here rather than on first use.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if !config.path.exists() {
            return Err(missing_document(&config));
        }

        let backend = Self::file_backend(&config)?;
        let document = backend.load()?;

        tracing::info!(
            path = %config.path.display(),
            top_level_keys = document.as_map().len(),
            "opened campaign store"
        );
        Ok(Self::with_backend(backend))
    }

    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::with_backend(MemoryDocumentStore::new())
    }

    /// Use any document backend.
    pub fn with_backend(backend: impl DocumentStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            write_lock: Mutex::new(()),
        }
    }

    fn file_backend(config: &StoreConfig) -> Result<FileDocumentStore> {
        let backend = if config.lock_file {
            FileDocumentStore::locked(&config.path)?
        } else {
            FileDocumentStore::new(&config.path)
        };
        Ok(backend.with_pretty(config.pretty))
    }

    // --- Document Operations ---

    /// Read the current document.
    pub fn snapshot(&self) -> Result<Document> {
        self.backend.load()
    }

    /// Load the document, apply `mutate`, and save the result.
    ///
    /// Nothing is written when `mutate` fails.
    pub fn transact<T, E>(
        &self,
        mutate: impl FnOnce(&mut Document) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<StoreError>,
    {
        let _lock = self.write_lock.lock();

        let mut document = self.backend.load()?;
        let output = mutate(&mut document)?;
        self.backend.save(&document)?;

        Ok(output)
    }

    // --- Collection Operations ---

    pub fn collection(&self, kind: EntityKind) -> CollectionRepository<'_> {
        CollectionRepository::new(self, kind)
    }

    pub fn characters(&self) -> CollectionRepository<'_> {
        self.collection(EntityKind::Character)
    }

    pub fn locations(&self) -> CollectionRepository<'_> {
        self.collection(EntityKind::Location)
    }

    pub fn quests(&self) -> CollectionRepository<'_> {
        self.collection(EntityKind::Quest)
    }

    pub fn scenes(&self) -> CollectionRepository<'_> {
        self.collection(EntityKind::Scene)
    }

    /// Locations currently listing the character.
    pub fn locate_character(&self, name: &str) -> Result<Vec<LocationSummary>> {
        locate_character(self, name)
    }

    /// Move a character to `destination`. See [`move_character`].
    pub fn move_character(&self, name: &str, destination: &str) -> Result<Entity> {
        move_character(self, name, destination)
    }

    // --- Sheet Operations ---

    pub fn sheet(&self) -> SheetService<'_> {
        SheetService::new(self)
    }

    // --- Store Operations ---

    pub fn stats(&self) -> Result<StoreStats> {
        let doc = self.snapshot()?;
        Ok(StoreStats {
            characters: doc.collection(EntityKind::Character)?.len(),
            locations: doc.collection(EntityKind::Location)?.len(),
            quests: doc.collection(EntityKind::Quest)?.len(),
            scenes: doc.collection(EntityKind::Scene)?.len(),
            has_sheet: doc.sheet()?.is_some(),
        })
    }
}

fn missing_document(config: &StoreConfig) -> StoreError {
    StoreError::Persistence(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no document at {}", config.path.display()),
    ))
}
