use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{from_json_column, parse_datetime, to_i64, to_json_column, to_score, to_u64},
    models::LogRecord,
};

const LOG_COLUMNS: &str = "id, candidate_name, start_time, end_time, focus_lost_count, \
     multiple_faces_count, object_alert_types, alerts, integrity_score";

fn row_to_log(row: &Row) -> Result<LogRecord> {
    let start_time: String = row.get("start_time")?;
    let end_time: String = row.get("end_time")?;
    let focus_lost_count: i64 = row.get("focus_lost_count")?;
    let multiple_faces_count: i64 = row.get("multiple_faces_count")?;
    let object_alert_types: String = row.get("object_alert_types")?;
    let alerts: String = row.get("alerts")?;
    let integrity_score: i64 = row.get("integrity_score")?;

    Ok(LogRecord {
        id: Some(row.get("id")?),
        candidate_name: row.get("candidate_name")?,
        start_time: parse_datetime(&start_time, "start_time")?,
        end_time: parse_datetime(&end_time, "end_time")?,
        focus_lost_count: to_u64(focus_lost_count, "focus_lost_count")?,
        multiple_faces_count: to_u64(multiple_faces_count, "multiple_faces_count")?,
        object_alert_types: from_json_column(&object_alert_types, "object_alert_types")?,
        alerts: from_json_column(&alerts, "alerts")?,
        integrity_score: to_score(integrity_score)?,
    })
}

impl Database {
    /// Insert a session log and return it with its assigned id.
    pub async fn insert_log(&self, record: &LogRecord) -> Result<LogRecord> {
        record.validate()?;
        let mut record = record.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO session_logs (candidate_name, start_time, end_time, focus_lost_count,
                     multiple_faces_count, object_alert_types, alerts, integrity_score, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.candidate_name,
                    record.start_time.to_rfc3339(),
                    record.end_time.to_rfc3339(),
                    to_i64(record.focus_lost_count)?,
                    to_i64(record.multiple_faces_count)?,
                    to_json_column(&record.object_alert_types, "object_alert_types")?,
                    to_json_column(&record.alerts, "alerts")?,
                    i64::from(record.integrity_score),
                    Utc::now().to_rfc3339(),
                ],
            )
            .context("failed to insert session log")?;
            record.id = Some(conn.last_insert_rowid());
            Ok(record)
        })
        .await
    }

    /// All logs, highest integrity score first; ties keep insertion order.
    pub async fn list_logs_by_score(&self) -> Result<Vec<LogRecord>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LOG_COLUMNS} FROM session_logs ORDER BY integrity_score DESC, id ASC"
            ))?;

            let mut rows = stmt.query([])?;
            let mut logs = Vec::new();
            while let Some(row) = rows.next()? {
                logs.push(row_to_log(row)?);
            }
            Ok(logs)
        })
        .await
    }

    pub async fn get_log(&self, id: i64) -> Result<Option<LogRecord>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LOG_COLUMNS} FROM session_logs WHERE id = ?1"
            ))?;

            let mut rows = stmt.query(params![id])?;
            let log = match rows.next()? {
                Some(row) => Some(row_to_log(row)?),
                None => None,
            };
            Ok(log)
        })
        .await
    }
}
