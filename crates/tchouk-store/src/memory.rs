use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tchouk_types::EntityId;

use crate::backend::{Backend, Document, UpdateOutcome};
use crate::error::StoreError;
use crate::filter;

#[derive(Debug, Clone)]
struct Stored {
    name: String,
    doc: Document,
}

/// Volatile backend: kind → id → document maps behind a mutex. Used for
/// deterministic tests; contract-identical to the durable backend apart
/// from persistence.
#[derive(Default)]
pub struct MemoryBackend {
    data: Mutex<HashMap<String, HashMap<EntityId, Stored>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_data<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, HashMap<EntityId, Stored>>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        f(&mut data)
    }
}

impl Backend for MemoryBackend {
    fn insert(&self, kind: &str, name: &str, mut doc: Document) -> Result<EntityId, StoreError> {
        let id = EntityId::generate();
        doc.insert("id".into(), Value::String(id.to_hex()));
        self.with_data(|data| {
            data.entry(kind.to_string()).or_default().insert(
                id,
                Stored {
                    name: name.to_string(),
                    doc,
                },
            );
            Ok(id)
        })
    }

    fn find_all(&self, kind: &str) -> Result<Vec<Document>, StoreError> {
        self.with_data(|data| {
            Ok(data
                .get(kind)
                .map(|records| records.values().map(|s| s.doc.clone()).collect())
                .unwrap_or_default())
        })
    }

    fn find_by_id(&self, kind: &str, id: EntityId) -> Result<Document, StoreError> {
        self.with_data(|data| {
            data.get(kind)
                .and_then(|records| records.get(&id))
                .map(|s| s.doc.clone())
                .ok_or(StoreError::NotFound)
        })
    }

    fn find_by_name(&self, kind: &str, name: &str) -> Result<Document, StoreError> {
        self.with_data(|data| {
            data.get(kind)
                .and_then(|records| records.values().find(|s| s.name == name))
                .map(|s| s.doc.clone())
                .ok_or(StoreError::NotFound)
        })
    }

    fn find_by_filter(&self, kind: &str, filter: &Document) -> Result<Vec<Document>, StoreError> {
        self.with_data(|data| {
            Ok(data
                .get(kind)
                .map(|records| {
                    records
                        .values()
                        .filter(|s| filter::matches(&s.doc, filter))
                        .map(|s| s.doc.clone())
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn update(
        &self,
        kind: &str,
        id: EntityId,
        name: &str,
        mut doc: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        doc.insert("id".into(), Value::String(id.to_hex()));
        self.with_data(|data| {
            match data.get_mut(kind).and_then(|records| records.get_mut(&id)) {
                Some(stored) => {
                    *stored = Stored {
                        name: name.to_string(),
                        doc,
                    };
                    Ok(UpdateOutcome {
                        matched: 1,
                        modified: 1,
                    })
                }
                None => Ok(UpdateOutcome::default()),
            }
        })
    }

    fn delete(&self, kind: &str, id: EntityId) -> Result<u64, StoreError> {
        self.with_data(|data| {
            let removed = data
                .get_mut(kind)
                .and_then(|records| records.remove(&id))
                .is_some();
            Ok(removed as u64)
        })
    }

    fn close(&self) {}
}
