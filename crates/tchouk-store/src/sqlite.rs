use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use tchouk_types::EntityId;
use tracing::info;

use crate::backend::{Backend, Document, UpdateOutcome};
use crate::error::StoreError;
use crate::filter;

/// Durable document backend: one SQLite file, records as JSON bodies in a
/// single table partitioned by kind. One WAL-mode connection behind a
/// mutex, opened once at startup; an open failure is fatal to the caller.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let backend = Self::prepare(conn)?;
        info!("document store opened at {}", path.display());
        Ok(backend)
    }

    /// Private on-heap database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                kind TEXT NOT NULL,
                id   TEXT NOT NULL,
                name TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (kind, id)
            );
            CREATE INDEX IF NOT EXISTS records_name ON records (kind, name);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))?;
        f(&conn)
    }
}

fn encode_body(doc: Document) -> String {
    Value::Object(doc).to_string()
}

fn decode_body(body: &str) -> Result<Document, StoreError> {
    Ok(serde_json::from_str::<Document>(body)?)
}

impl Backend for SqliteBackend {
    fn insert(&self, kind: &str, name: &str, mut doc: Document) -> Result<EntityId, StoreError> {
        let id = EntityId::generate();
        doc.insert("id".into(), Value::String(id.to_hex()));
        let body = encode_body(doc);
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO records (kind, id, name, body) VALUES (?1, ?2, ?3, ?4)",
                params![kind, id.to_hex(), name, body],
            )?;
            Ok(())
        })?;
        Ok(id)
    }

    fn find_all(&self, kind: &str) -> Result<Vec<Document>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT body FROM records WHERE kind = ?1")?;
            let bodies = stmt
                .query_map([kind], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            bodies.iter().map(|body| decode_body(body)).collect()
        })
    }

    fn find_by_id(&self, kind: &str, id: EntityId) -> Result<Document, StoreError> {
        self.with_conn(|conn| {
            let body = conn
                .query_row(
                    "SELECT body FROM records WHERE kind = ?1 AND id = ?2",
                    params![kind, id.to_hex()],
                    |row| row.get::<_, String>(0),
                )
                .optional()?
                .ok_or(StoreError::NotFound)?;
            decode_body(&body)
        })
    }

    fn find_by_name(&self, kind: &str, name: &str) -> Result<Document, StoreError> {
        self.with_conn(|conn| {
            let body = conn
                .query_row(
                    "SELECT body FROM records WHERE kind = ?1 AND name = ?2 LIMIT 1",
                    params![kind, name],
                    |row| row.get::<_, String>(0),
                )
                .optional()?
                .ok_or(StoreError::NotFound)?;
            decode_body(&body)
        })
    }

    fn find_by_filter(&self, kind: &str, filter: &Document) -> Result<Vec<Document>, StoreError> {
        // Filters are structural over the JSON body, so matching happens
        // here rather than in SQL.
        let docs = self.find_all(kind)?;
        Ok(docs
            .into_iter()
            .filter(|doc| filter::matches(doc, filter))
            .collect())
    }

    fn update(
        &self,
        kind: &str,
        id: EntityId,
        name: &str,
        mut doc: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        doc.insert("id".into(), Value::String(id.to_hex()));
        let body = encode_body(doc);
        self.with_conn(|conn| {
            let matched = conn.execute(
                "UPDATE records SET name = ?3, body = ?4 WHERE kind = ?1 AND id = ?2",
                params![kind, id.to_hex(), name, body],
            )? as u64;
            Ok(UpdateOutcome {
                matched,
                modified: matched,
            })
        })
    }

    fn delete(&self, kind: &str, id: EntityId) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM records WHERE kind = ?1 AND id = ?2",
                params![kind, id.to_hex()],
            )? as u64;
            Ok(deleted)
        })
    }

    fn close(&self) {
        // The connection closes when the backend drops; nothing to flush
        // beyond what WAL already guarantees.
        info!("document store closed");
    }
}
