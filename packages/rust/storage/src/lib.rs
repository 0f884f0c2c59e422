//! libSQL-backed document store for site content.
//!
//! The [`Storage`] struct wraps a libSQL database holding JSON documents
//! grouped into named collections (`content`, `directors`, `leadership`).
//! Readers are written against the [`DocumentStore`] trait.
//!
//! **Access rules:**
//! - Page rendering: read-only via [`Storage::open_readonly`]
//! - Fixture loading and tests: read-write via [`Storage::open`]

mod migrations;
mod query;

use std::path::Path;

use chrono::Utc;
use libsql::{Connection, Database, Row, params};
use serde_json::Value;
use sitepages_shared::{Result, SiteError};
use tracing::{debug, instrument};
use uuid::Uuid;

pub use query::{DocumentStore, Filter, SortSpec};

/// Field under which the store-assigned id is surfaced on every document.
pub const ID_FIELD: &str = "_id";

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    readonly: bool,
}

impl Storage {
    /// Open or create a database at `path` in read-write mode.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(storage_err)?;

        let conn = db.connect().map_err(storage_err)?;

        let storage = Self {
            db,
            conn,
            readonly: false,
        };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Open an existing database at `path` in read-only mode. No migrations
    /// are run and a missing file is an error, never created.
    pub async fn open_readonly(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SiteError::Storage(format!(
                "database not found: {}",
                path.display()
            )));
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(storage_err)?;

        let conn = db.connect().map_err(storage_err)?;

        Ok(Self {
            db,
            conn,
            readonly: true,
        })
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn
                    .execute_batch(migration.sql)
                    .await
                    .map_err(|e| {
                        SiteError::Storage(format!("migration v{} failed: {e}", migration.version))
                    })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    /// Ensure we're in read-write mode before writing.
    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            return Err(SiteError::Storage(
                "database is opened in read-only mode".into(),
            ));
        }
        Ok(())
    }

    /// Insert a JSON object into `collection`. Returns the assigned id.
    ///
    /// Any `_id` already present on `doc` is replaced by the store's own.
    pub async fn insert_document(&self, collection: &str, doc: &Value) -> Result<String> {
        self.check_writable()?;

        let mut body = match doc {
            Value::Object(map) => map.clone(),
            other => {
                return Err(SiteError::validation(format!(
                    "documents must be JSON objects, got {other}"
                )));
            }
        };
        body.remove(ID_FIELD);

        let id = Uuid::now_v7().to_string();
        let now = Utc::now().to_rfc3339();
        let body = serde_json::to_string(&body)?;

        self.conn
            .execute(
                "INSERT INTO documents (id, collection, body, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![id.as_str(), collection, body.as_str(), now.as_str()],
            )
            .await
            .map_err(storage_err)?;
        Ok(id)
    }

    async fn query_documents(&self, sql: &str, params: Vec<libsql::Value>) -> Result<Vec<Value>> {
        let mut rows = self.conn.query(sql, params).await.map_err(storage_err)?;

        let mut docs = Vec::new();
        while let Some(row) = rows.next().await.map_err(storage_err)? {
            docs.push(row_to_document(&row)?);
        }
        Ok(docs)
    }
}

impl DocumentStore for Storage {
    #[instrument(skip_all, fields(collection = %collection))]
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        let (sql, params) = query::build_sql(collection, filter, None, Some(1))?;
        let doc = self.query_documents(&sql, params).await?.into_iter().next();
        debug!(found = doc.is_some(), "find_one");
        Ok(doc)
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&SortSpec>,
    ) -> Result<Vec<Value>> {
        let (sql, params) = query::build_sql(collection, filter, sort, None)?;
        let docs = self.query_documents(&sql, params).await?;
        debug!(count = docs.len(), "find");
        Ok(docs)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn storage_err(e: libsql::Error) -> SiteError {
    SiteError::Storage(e.to_string())
}

/// Decode a `(id, body)` row into a JSON object carrying `_id`.
fn row_to_document(row: &Row) -> Result<Value> {
    let id: String = row.get(0).map_err(storage_err)?;
    let body: String = row.get(1).map_err(storage_err)?;

    match serde_json::from_str::<Value>(&body)? {
        Value::Object(mut map) => {
            map.insert(ID_FIELD.to_string(), Value::String(id));
            Ok(Value::Object(map))
        }
        other => Err(SiteError::parse(format!(
            "document {id} is not a JSON object: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Create a temp file storage for testing.
    async fn test_storage() -> Storage {
        let tmp = std::env::temp_dir().join(format!("sp_test_{}.db", Uuid::now_v7()));
        Storage::open(&tmp).await.expect("open test db")
    }

    #[tokio::test]
    async fn open_and_migrate() {
        let storage = test_storage().await;
        let version = storage.get_schema_version().await;
        assert_eq!(version, 1);
    }

    #[tokio::test]
    async fn idempotent_migration() {
        let tmp = std::env::temp_dir().join(format!("sp_test_{}.db", Uuid::now_v7()));
        let _s1 = Storage::open(&tmp).await.expect("first open");
        drop(_s1);
        let s2 = Storage::open(&tmp).await.expect("second open");
        assert_eq!(s2.get_schema_version().await, 1);
    }

    #[tokio::test]
    async fn find_one_by_section() {
        let storage = test_storage().await;
        storage
            .insert_document("content", &json!({"section": "home", "title": "Welcome"}))
            .await
            .unwrap();
        let id = storage
            .insert_document(
                "content",
                &json!({"section": "about", "institute": "Institute text", "society": "Society text"}),
            )
            .await
            .expect("insert about");

        let doc = storage
            .find_one("content", &Filter::where_eq("section", "about"))
            .await
            .expect("find_one")
            .expect("about present");
        assert_eq!(doc["_id"], id.as_str());
        assert_eq!(doc["institute"], "Institute text");

        let missing = storage
            .find_one("content", &Filter::where_eq("section", "contact"))
            .await
            .expect("find_one");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn find_sorted_ascending_with_missing_first() {
        let storage = test_storage().await;
        for doc in [
            json!({"name": "C", "order": 3}),
            json!({"name": "A", "order": 1}),
            json!({"name": "Unordered"}),
            json!({"name": "B1", "order": 2}),
            json!({"name": "B2", "order": 2}),
        ] {
            storage.insert_document("directors", &doc).await.unwrap();
        }

        let sort = SortSpec::ascending("order");
        let docs = storage
            .find("directors", &Filter::all(), Some(&sort))
            .await
            .expect("find");
        let names: Vec<&str> = docs.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["Unordered", "A", "B1", "B2", "C"]);
    }

    #[tokio::test]
    async fn find_unsorted_keeps_insertion_order() {
        let storage = test_storage().await;
        for name in ["Zed", "Amy", "Kim"] {
            storage
                .insert_document("leadership", &json!({"name": name}))
                .await
                .unwrap();
        }
        storage
            .insert_document("directors", &json!({"name": "Other"}))
            .await
            .unwrap();

        let docs = storage
            .find("leadership", &Filter::all(), None)
            .await
            .expect("find");
        let names: Vec<&str> = docs.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["Zed", "Amy", "Kim"]);
    }

    #[tokio::test]
    async fn find_empty_collection() {
        let storage = test_storage().await;
        let docs = storage
            .find("directors", &Filter::all(), None)
            .await
            .expect("find");
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn filter_on_boolean_field() {
        let storage = test_storage().await;
        storage
            .insert_document("faculty", &json!({"name": "T", "isTeaching": true}))
            .await
            .unwrap();
        storage
            .insert_document("faculty", &json!({"name": "N", "isTeaching": false}))
            .await
            .unwrap();

        let docs = storage
            .find("faculty", &Filter::where_eq("isTeaching", false), None)
            .await
            .expect("find");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["name"], "N");
    }

    #[tokio::test]
    async fn insert_replaces_caller_id() {
        let storage = test_storage().await;
        let id = storage
            .insert_document("leadership", &json!({"_id": "forged", "name": "X"}))
            .await
            .unwrap();
        assert_ne!(id, "forged");

        let docs = storage
            .find("leadership", &Filter::all(), None)
            .await
            .unwrap();
        assert_eq!(docs[0]["_id"], id.as_str());
    }

    #[tokio::test]
    async fn insert_rejects_non_objects() {
        let storage = test_storage().await;
        let result = storage.insert_document("content", &json!([1, 2, 3])).await;
        assert!(matches!(result, Err(SiteError::Validation { .. })));
    }

    #[tokio::test]
    async fn readonly_rejects_writes() {
        let tmp = std::env::temp_dir().join(format!("sp_test_{}.db", Uuid::now_v7()));
        let rw = Storage::open(&tmp).await.unwrap();
        rw.insert_document("content", &json!({"section": "about"}))
            .await
            .unwrap();
        drop(rw);

        let ro = Storage::open_readonly(&tmp).await.unwrap();
        let result = ro
            .insert_document("content", &json!({"section": "other"}))
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("read-only"));

        let found = ro
            .find_one("content", &Filter::where_eq("section", "about"))
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn readonly_missing_file_is_not_created() {
        let tmp = std::env::temp_dir().join(format!("sp_test_{}.db", Uuid::now_v7()));
        let result = Storage::open_readonly(&tmp).await;
        assert!(matches!(result, Err(SiteError::Storage(_))));
        assert!(!tmp.exists());
    }

    #[tokio::test]
    async fn readonly_without_schema_fails_reads() {
        let tmp = std::env::temp_dir().join(format!("sp_test_{}.db", Uuid::now_v7()));
        std::fs::File::create(&tmp).unwrap();
        let ro = Storage::open_readonly(&tmp).await.unwrap();
        let result = ro.find("directors", &Filter::all(), None).await;
        assert!(matches!(result, Err(SiteError::Storage(_))));
    }
}
