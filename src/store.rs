// src/store.rs
//
// Path-keyed JSONB document store. Domain records (journals, reports,
// appointments, profile) live here; accounts and sessions stay relational.

use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Conflict(String),
    #[error("document decode error at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Document {
    pub path: String,
    pub data: JsonValue,
}

impl Document {
    /// Last path segment, used as the record id by all collections.
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.data.clone()).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Clone)]
pub struct DocumentStore {
    pool: PgPool,
}

impl DocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, path: &str) -> Result<Option<JsonValue>, StoreError> {
        let data: Option<JsonValue> =
            sqlx::query_scalar(r#"SELECT data FROM document WHERE path = $1"#)
                .bind(path)
                .fetch_optional(&self.pool)
                .await?;
        Ok(data)
    }

    /// Upsert with merge-on-conflict: only the named top-level fields are
    /// overwritten, everything else in an existing document is preserved.
    pub async fn set_merge(&self, path: &str, fields: &JsonValue) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO document (path, data)
            VALUES ($1, $2)
            ON CONFLICT (path)
            DO UPDATE SET data = document.data || EXCLUDED.data,
                          updated_at = now()
            "#,
        )
        .bind(path)
        .bind(fields)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Create-once document; an existing document at the path is an error.
    pub async fn create(&self, path: &str, doc: &JsonValue) -> Result<(), StoreError> {
        let res = sqlx::query(
            r#"
            INSERT INTO document (path, data)
            VALUES ($1, $2)
            ON CONFLICT (path) DO NOTHING
            "#,
        )
        .bind(path)
        .bind(doc)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(StoreError::Conflict(path.to_string()));
        }
        Ok(())
    }

    /// Full-document replace upsert.
    pub async fn put(&self, path: &str, doc: &JsonValue) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO document (path, data)
            VALUES ($1, $2)
            ON CONFLICT (path)
            DO UPDATE SET data = EXCLUDED.data,
                          updated_at = now()
            "#,
        )
        .bind(path)
        .bind(doc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Partial-field overwrite of an existing document.
    /// Returns false when no document exists at the path.
    pub async fn update_fields(&self, path: &str, fields: &JsonValue) -> Result<bool, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE document
            SET data = data || $2,
                updated_at = now()
            WHERE path = $1
            "#,
        )
        .bind(path)
        .bind(fields)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    /// All documents under a collection prefix, ordered by path ascending.
    pub async fn list(&self, prefix: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT path, data
            FROM document
            WHERE path LIKE $1 || '%'
            ORDER BY path ASC
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        let mut docs = Vec::with_capacity(rows.len());
        for r in rows {
            docs.push(Document {
                path: r.try_get("path")?,
                data: r.try_get("data")?,
            });
        }
        Ok(docs)
    }
}

/// Document path scheme, shared by every route that touches the store.
pub mod paths {
    use chrono::NaiveDate;
    use uuid::Uuid;

    pub fn journal(uid: Uuid, date: NaiveDate) -> String {
        format!("user/{uid}/journals/{date}")
    }

    pub fn journals_prefix(uid: Uuid) -> String {
        format!("user/{uid}/journals/")
    }

    pub fn report(uid: Uuid, key: &str) -> String {
        format!("user/{uid}/reports/{key}")
    }

    pub fn reports_prefix(uid: Uuid) -> String {
        format!("user/{uid}/reports/")
    }

    pub fn appointment(uid: Uuid, appointment_id: Uuid) -> String {
        format!("user/{uid}/appointments/{appointment_id}")
    }

    pub fn appointments_prefix(uid: Uuid) -> String {
        format!("user/{uid}/appointments/")
    }

    pub fn profile(uid: Uuid) -> String {
        format!("user/{uid}/profile/details")
    }

    pub fn sos_alert(uid: Uuid, alert_id: Uuid) -> String {
        format!("user/{uid}/sos/{alert_id}")
    }
}
