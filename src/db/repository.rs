use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sqlite::{open_database, open_memory_database};
use super::DatabaseError;
use crate::models::{ResultSource, Row, StructuredResult};

/// A persisted processing result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredResult {
    pub id: Uuid,
    pub document_id: Uuid,
    pub result: StructuredResult,
    pub processing_time_ms: u64,
    pub source: ResultSource,
    pub created_at: NaiveDateTime,
}

/// Persistence collaborator for assembled results (allows mocking).
pub trait ResultStore: Send + Sync {
    /// Store one result; returns the stored-result identifier.
    fn save_result(
        &self,
        document_id: &Uuid,
        result: &StructuredResult,
        processing_time_ms: u64,
        source: ResultSource,
    ) -> Result<Uuid, DatabaseError>;

    fn get_result(&self, id: &Uuid) -> Result<Option<StoredResult>, DatabaseError>;

    /// All results for a document, oldest first.
    fn results_for_document(&self, document_id: &Uuid) -> Result<Vec<StoredResult>, DatabaseError>;
}

// ═══════════════════════════════════════════
// Row mapping
// ═══════════════════════════════════════════

/// `extracted_data` column payload. Accuracy lives in its own column.
#[derive(Serialize, Deserialize)]
struct TablePayload {
    columns: Vec<String>,
    data: Vec<Row>,
}

// Internal row type for StoredResult mapping
struct ResultRow {
    id: String,
    document_id: String,
    extracted_data: String,
    processing_time_ms: i64,
    accuracy: f64,
    source: String,
    created_at: NaiveDateTime,
}

fn result_from_row(row: ResultRow) -> Result<StoredResult, DatabaseError> {
    let table: TablePayload = serde_json::from_str(&row.extracted_data)
        .map_err(|e| DatabaseError::CorruptData(format!("extracted_data of {}: {e}", row.id)))?;

    Ok(StoredResult {
        id: parse_uuid(&row.id)?,
        document_id: parse_uuid(&row.document_id)?,
        result: StructuredResult::new(table.columns, table.data, row.accuracy),
        processing_time_ms: u64::try_from(row.processing_time_ms).unwrap_or_default(),
        source: ResultSource::from_str(&row.source)?,
        created_at: row.created_at,
    })
}

fn parse_uuid(value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|e| DatabaseError::CorruptData(format!("bad id '{value}': {e}")))
}

fn map_result_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ResultRow> {
    Ok(ResultRow {
        id: row.get(0)?,
        document_id: row.get(1)?,
        extracted_data: row.get(2)?,
        processing_time_ms: row.get(3)?,
        accuracy: row.get(4)?,
        source: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const SELECT_RESULT: &str = "SELECT id, document_id, extracted_data, processing_time_ms, accuracy, source, created_at
     FROM processing_results";

// ═══════════════════════════════════════════
// Processing Result Repository
// ═══════════════════════════════════════════

pub fn insert_result(
    conn: &Connection,
    document_id: &Uuid,
    result: &StructuredResult,
    processing_time_ms: u64,
    source: ResultSource,
) -> Result<Uuid, DatabaseError> {
    let id = Uuid::new_v4();
    let payload = serde_json::to_string(&TablePayload {
        columns: result.columns.clone(),
        data: result.rows.clone(),
    })
    .map_err(|e| DatabaseError::CorruptData(e.to_string()))?;

    conn.execute(
        "INSERT INTO processing_results (id, document_id, extracted_data, processing_time_ms,
         accuracy, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id.to_string(),
            document_id.to_string(),
            payload,
            i64::try_from(processing_time_ms).unwrap_or(i64::MAX),
            result.accuracy,
            source.as_str(),
            Utc::now().naive_utc(),
        ],
    )?;
    Ok(id)
}

pub fn get_result(conn: &Connection, id: &Uuid) -> Result<Option<StoredResult>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_RESULT} WHERE id = ?1"))?;
    let result = stmt.query_row(params![id.to_string()], map_result_row);

    match result {
        Ok(row) => Ok(Some(result_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_results_by_document(
    conn: &Connection,
    document_id: &Uuid,
) -> Result<Vec<StoredResult>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_RESULT} WHERE document_id = ?1 ORDER BY created_at, rowid"
    ))?;
    let rows = stmt.query_map(params![document_id.to_string()], map_result_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(result_from_row(row?)?);
    }
    Ok(results)
}

// ═══════════════════════════════════════════
// SQLite store
// ═══════════════════════════════════════════

/// `ResultStore` over one SQLite connection.
pub struct SqliteResultStore {
    conn: Mutex<Connection>,
}

impl SqliteResultStore {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_database(path)?))
    }

    pub fn in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_memory_database()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn)
    }
}

impl ResultStore for SqliteResultStore {
    fn save_result(
        &self,
        document_id: &Uuid,
        result: &StructuredResult,
        processing_time_ms: u64,
        source: ResultSource,
    ) -> Result<Uuid, DatabaseError> {
        let id = self.with_conn(|conn| {
            insert_result(conn, document_id, result, processing_time_ms, source)
        })?;
        tracing::debug!(result_id = %id, document_id = %document_id, "Result stored");
        Ok(id)
    }

    fn get_result(&self, id: &Uuid) -> Result<Option<StoredResult>, DatabaseError> {
        self.with_conn(|conn| get_result(conn, id))
    }

    fn results_for_document(&self, document_id: &Uuid) -> Result<Vec<StoredResult>, DatabaseError> {
        self.with_conn(|conn| get_results_by_document(conn, document_id))
    }
}
