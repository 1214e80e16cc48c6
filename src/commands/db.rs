use crate::commands::settings::{brandlens_dir, ensure_brandlens_dir};
use crate::models::history::AnalysisRecord;
use log::debug;
use rusqlite::{params, Connection, Result};

const DB_SCHEMA_VERSION: i64 = 2;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version < 2 {
        apply_migration_2(conn)?;
        version = 2;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        // Written by a newer build; keep going for forward-compatible changes.
        conn.pragma_update(None, "user_version", version)?;
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS analysis_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL,
            visual_score REAL,
            summary TEXT,
            timestamp TEXT,
            cognitive_score REAL
        );
        ",
    )
}

fn apply_migration_2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_analysis_results_timestamp ON analysis_results(timestamp);
        CREATE INDEX IF NOT EXISTS idx_analysis_results_url ON analysis_results(url);
        ",
    )
}

pub fn get_db_connection(workspace_path: &str) -> crate::error::Result<Connection> {
    ensure_brandlens_dir(workspace_path)?;
    let db_path = brandlens_dir(workspace_path).join("history.db");
    let conn = Connection::open(db_path)?;
    initialize_schema(&conn)?;
    Ok(conn)
}

pub fn save_result(
    conn: &Connection,
    url: &str,
    visual_score: f64,
    summary: &str,
    cognitive_score: f64,
) -> Result<AnalysisRecord> {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true);

    conn.execute(
        "INSERT INTO analysis_results (url, visual_score, summary, timestamp, cognitive_score) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![url, visual_score, summary, timestamp, cognitive_score],
    )?;
    let id = conn.last_insert_rowid();
    debug!("stored analysis #{id} for {url}");

    Ok(AnalysisRecord {
        id,
        url: url.to_string(),
        visual_score,
        summary: summary.to_string(),
        cognitive_score,
        timestamp,
    })
}

/// Most recent first.
pub fn get_recent_results(conn: &Connection, limit: usize) -> Result<Vec<AnalysisRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, url, visual_score, summary, cognitive_score, timestamp FROM analysis_results ORDER BY timestamp DESC, id DESC LIMIT ?1",
    )?;

    let records = stmt
        .query_map(params![limit as i64], |row| {
            Ok(AnalysisRecord {
                id: row.get(0)?,
                url: row.get(1)?,
                visual_score: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                summary: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                cognitive_score: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
                timestamp: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(records)
}

pub fn clear_results(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM analysis_results", [])
}
