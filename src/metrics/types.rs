use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timings for one committed tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickMetrics {
    pub timestamp: DateTime<Utc>,
    pub capture_ms: u64,
    pub face_ms: u64,
    pub object_ms: u64,
    pub total_ms: u64,
    pub face_count: usize,
    pub object_count: usize,
    pub alerts_emitted: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub recent_ticks: Vec<TickMetrics>,
    pub tick_count: u64,
    pub fault_count: u64,
    pub discarded_count: u64,
    pub alert_count: u64,
}
