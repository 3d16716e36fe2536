//! `/logs` endpoint handlers, transport-agnostic.
//!
//! Each handler returns the HTTP status and the JSON envelope the route
//! serves; wiring them to an HTTP server is left to the host.

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::db::{LogRecord, LogStore};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_SERVER_ERROR: u16 = 500;

const SAVE_FAILED: &str = "Could not save log";
const FETCH_FAILED: &str = "Could not fetch logs";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveLogResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListLogsResponse {
    pub success: bool,
    #[serde(default)]
    pub logs: Vec<LogRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply<T> {
    pub status: u16,
    pub body: T,
}

impl<T: Serialize> ApiReply<T> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }
}

/// `POST /logs`. Malformed or invalid bodies are reported like store
/// failures: 500 with a generic message, details only in the log.
pub async fn post_log(store: &dyn LogStore, body: &str) -> ApiReply<SaveLogResponse> {
    match save_record(store, body).await {
        Ok(log) => {
            info!(
                "Stored log for {} (score {})",
                log.candidate_name, log.integrity_score
            );
            ApiReply {
                status: STATUS_CREATED,
                body: SaveLogResponse {
                    success: true,
                    log: Some(log),
                    error: None,
                },
            }
        }
        Err(err) => {
            error!("Error saving log: {err:#}");
            ApiReply {
                status: STATUS_SERVER_ERROR,
                body: SaveLogResponse {
                    success: false,
                    log: None,
                    error: Some(SAVE_FAILED.to_string()),
                },
            }
        }
    }
}

async fn save_record(store: &dyn LogStore, body: &str) -> anyhow::Result<LogRecord> {
    let record: LogRecord = serde_json::from_str(body)?;
    record.validate()?;
    store.save_log(record).await
}

/// `GET /logs`, highest integrity score first.
pub async fn get_logs(store: &dyn LogStore) -> ApiReply<ListLogsResponse> {
    match store.list_logs().await {
        Ok(logs) => ApiReply {
            status: STATUS_OK,
            body: ListLogsResponse {
                success: true,
                logs,
                error: None,
            },
        },
        Err(err) => {
            error!("Error fetching logs: {err:#}");
            ApiReply {
                status: STATUS_SERVER_ERROR,
                body: ListLogsResponse {
                    success: false,
                    logs: Vec::new(),
                    error: Some(FETCH_FAILED.to_string()),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use crate::db::Database;

    struct BrokenStore;

    #[async_trait]
    impl LogStore for BrokenStore {
        async fn save_log(&self, _record: LogRecord) -> Result<LogRecord> {
            Err(anyhow!("connection refused"))
        }

        async fn list_logs(&self) -> Result<Vec<LogRecord>> {
            Err(anyhow!("connection refused"))
        }
    }

    fn body(name: &str, score: u8) -> String {
        format!(
            r#"{{"candidateName":"{name}","startTime":"2024-05-01T09:00:00Z","endTime":"2024-05-01T09:45:10Z","focusLostCount":0,"multipleFacesCount":0,"objectAlertTypes":[],"alerts":[],"integrityScore":{score}}}"#
        )
    }

    #[tokio::test]
    async fn post_then_get_sorted_by_score() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("api.sqlite3")).unwrap();

        let created = post_log(&db, &body("Grace", 40)).await;
        assert_eq!(created.status, STATUS_CREATED);
        assert!(created.body.success);
        assert!(created.body.log.as_ref().and_then(|log| log.id).is_some());
        post_log(&db, &body("Ada", 90)).await;

        let listed = get_logs(&db).await;
        assert_eq!(listed.status, STATUS_OK);
        let names: Vec<_> = listed
            .body
            .logs
            .iter()
            .map(|log| log.candidate_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
        assert!(listed.to_json().unwrap().contains(r#""success":true"#));
    }

    #[tokio::test]
    async fn malformed_body_is_a_save_failure() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("api.sqlite3")).unwrap();

        let reply = post_log(&db, r#"{"candidateName":"Ada"}"#).await;
        assert_eq!(reply.status, STATUS_SERVER_ERROR);
        assert_eq!(reply.body.error.as_deref(), Some("Could not save log"));
        assert!(get_logs(&db).await.body.logs.is_empty());
    }

    #[tokio::test]
    async fn store_failures_map_to_500() {
        let saved = post_log(&BrokenStore, &body("Ada", 90)).await;
        assert_eq!(saved.status, STATUS_SERVER_ERROR);
        assert!(!saved.body.success);

        let listed = get_logs(&BrokenStore).await;
        assert_eq!(listed.status, STATUS_SERVER_ERROR);
        assert_eq!(listed.body.error.as_deref(), Some("Could not fetch logs"));
        assert_eq!(
            listed.to_json().unwrap(),
            r#"{"success":false,"logs":[],"error":"Could not fetch logs"}"#
        );
    }
}
