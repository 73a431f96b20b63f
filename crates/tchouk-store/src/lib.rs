//! Generic document storage for the tracker's record types.
//!
//! [`Store`] is the single facade handlers talk to: CRUD generic over any
//! [`Entity`], dispatching to a pluggable [`Backend`] (durable SQLite, or an
//! in-memory map for tests). Records cross the backend boundary as JSON
//! documents; this layer owns the conversion.

pub mod backend;
mod error;
mod filter;
mod memory;
mod sqlite;

use std::path::Path;

use serde_json::Value;
use tchouk_types::{Entity, EntityId};

pub use backend::{Backend, Document, UpdateOutcome};
pub use error::StoreError;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

pub struct Store {
    backend: Box<dyn Backend>,
}

impl Store {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Store {
            backend: Box::new(backend),
        }
    }

    /// Durable store over a SQLite file. Opening happens once at startup
    /// and a failure here is fatal — there is no degraded mode.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Store::new(SqliteBackend::open(path)?))
    }

    /// Volatile store for tests.
    pub fn in_memory() -> Self {
        Store::new(MemoryBackend::new())
    }

    /// Persist a new record. The backend assigns the identifier; whatever
    /// id the caller set is discarded, and the returned record carries the
    /// assigned one.
    pub fn insert<E: Entity>(&self, mut entity: E) -> Result<E, StoreError> {
        let name = entity.name().to_string();
        let doc = to_document(&entity)?;
        let id = self.backend.insert(E::KIND, &name, doc)?;
        entity.set_id(id);
        Ok(entity)
    }

    /// Every record of the kind, in backend-defined order. Callers must not
    /// depend on the order. Empty when none exist.
    pub fn find_all<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        let docs = self.backend.find_all(E::KIND)?;
        docs.into_iter().map(from_document).collect()
    }

    pub fn find_by_id<E: Entity>(&self, id: EntityId) -> Result<E, StoreError> {
        from_document(self.backend.find_by_id(E::KIND, id)?)
    }

    /// First record of the kind whose name equals `name` exactly. A miss is
    /// always an explicit `NotFound`, never a nil success.
    pub fn find_by_name<E: Entity>(&self, name: &str) -> Result<E, StoreError> {
        from_document(self.backend.find_by_name(E::KIND, name)?)
    }

    /// Every record whose top-level fields are a superset of `filter`.
    pub fn find_by_filter<E: Entity>(&self, filter: &Document) -> Result<Vec<E>, StoreError> {
        let docs = self.backend.find_by_filter(E::KIND, filter)?;
        docs.into_iter().map(from_document).collect()
    }

    /// Whole-record replacement at the record's identifier. A matched count
    /// of zero means the identifier is unknown; callers decide whether that
    /// is an error.
    pub fn update<E: Entity>(&self, entity: &E) -> Result<UpdateOutcome, StoreError> {
        let doc = to_document(entity)?;
        self.backend
            .update(E::KIND, entity.id(), entity.name(), doc)
    }

    /// Remove the record at `id`, reporting the deleted count (0 or 1).
    pub fn delete<E: Entity>(&self, id: EntityId) -> Result<u64, StoreError> {
        self.backend.delete(E::KIND, id)
    }

    /// Best-effort shutdown; logged by the backend, never fatal.
    pub fn close(&self) {
        self.backend.close();
    }
}

fn to_document<E: Entity>(entity: &E) -> Result<Document, StoreError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Unavailable(format!(
            "record of kind {} serialized to non-object JSON: {other}",
            E::KIND
        ))),
    }
}

fn from_document<E: Entity>(doc: Document) -> Result<E, StoreError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}
