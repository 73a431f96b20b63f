use serde_json::Value;
use tchouk_types::EntityId;

use crate::error::StoreError;

/// A stored record as the backend sees it: a JSON object. The generic
/// [`Store`](crate::Store) layer converts entities to and from documents;
/// backends never know concrete record types. Stored documents carry their
/// identifier under the `"id"` key; the record's lookup name is threaded
/// through `insert`/`update` separately so name queries do not depend on
/// the serialized field name.
pub type Document = serde_json::Map<String, Value>;

/// Counts reported by [`Backend::update`]. A matched count of zero means
/// the identifier was unknown; that is the caller's problem, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Kind-partitioned document storage. Implementations must behave
/// identically through this contract apart from latency and persistence.
pub trait Backend: Send + Sync {
    /// Assign a fresh identifier, persist the document under `kind`, return
    /// the identifier. Identifiers are never client-supplied on create.
    fn insert(&self, kind: &str, name: &str, doc: Document) -> Result<EntityId, StoreError>;

    /// Every document of `kind`, in backend-defined order. Empty when none
    /// exist.
    fn find_all(&self, kind: &str) -> Result<Vec<Document>, StoreError>;

    /// The one document with this identifier, or `NotFound`.
    fn find_by_id(&self, kind: &str, id: EntityId) -> Result<Document, StoreError>;

    /// The first document whose name equals `name` exactly, or `NotFound`.
    fn find_by_name(&self, kind: &str, name: &str) -> Result<Document, StoreError>;

    /// Every document whose top-level fields are a superset of `filter`.
    fn find_by_filter(&self, kind: &str, filter: &Document) -> Result<Vec<Document>, StoreError>;

    /// Whole-document replacement at `id`; set-all-fields, last write wins.
    fn update(
        &self,
        kind: &str,
        id: EntityId,
        name: &str,
        doc: Document,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Remove the document at `id`, reporting how many were deleted (0 or 1).
    fn delete(&self, kind: &str, id: EntityId) -> Result<u64, StoreError>;

    /// Best-effort shutdown; logged, never an error.
    fn close(&self);
}
