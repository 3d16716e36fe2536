use anyhow::Result;
use async_trait::async_trait;

use super::{connection::Database, models::LogRecord};

/// Save/query boundary for finished session logs.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn save_log(&self, record: LogRecord) -> Result<LogRecord>;

    /// Highest integrity score first.
    async fn list_logs(&self) -> Result<Vec<LogRecord>>;
}

#[async_trait]
impl LogStore for Database {
    async fn save_log(&self, record: LogRecord) -> Result<LogRecord> {
        self.insert_log(&record).await
    }

    async fn list_logs(&self) -> Result<Vec<LogRecord>> {
        self.list_logs_by_score().await
    }
}
