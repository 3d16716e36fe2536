mod types;

pub use types::{MetricsSnapshot, TickMetrics};

use std::sync::Arc;
use tokio::sync::Mutex;

const MAX_RECENT_TICKS: usize = 20;

/// Per-session sampling loop counters. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

#[derive(Default)]
struct MetricsState {
    recent_ticks: Vec<TickMetrics>,
    tick_count: u64,
    fault_count: u64,
    discarded_count: u64,
    alert_count: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_tick(&self, metrics: TickMetrics) {
        let mut state = self.inner.lock().await;

        state.tick_count += 1;
        state.alert_count += metrics.alerts_emitted as u64;
        state.recent_ticks.push(metrics);

        if state.recent_ticks.len() > MAX_RECENT_TICKS {
            state.recent_ticks.remove(0);
        }
    }

    /// A capture or detector call failed.
    pub async fn record_fault(&self) {
        self.inner.lock().await.fault_count += 1;
    }

    /// A tick finished after the session stopped and its results were dropped.
    pub async fn record_discarded(&self) {
        self.inner.lock().await.discarded_count += 1;
    }

    pub async fn get_snapshot(&self) -> MetricsSnapshot {
        let state = self.inner.lock().await;
        MetricsSnapshot {
            recent_ticks: state.recent_ticks.clone(),
            tick_count: state.tick_count,
            fault_count: state.fault_count,
            discarded_count: state.discarded_count,
            alert_count: state.alert_count,
        }
    }

    pub async fn reset(&self) {
        *self.inner.lock().await = MetricsState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tick(alerts: usize) -> TickMetrics {
        TickMetrics {
            timestamp: Utc::now(),
            capture_ms: 1,
            face_ms: 2,
            object_ms: 3,
            total_ms: 6,
            face_count: 1,
            object_count: 0,
            alerts_emitted: alerts,
        }
    }

    #[tokio::test]
    async fn keeps_only_recent_ticks() {
        let metrics = MetricsCollector::new();
        for _ in 0..25 {
            metrics.record_tick(tick(1)).await;
        }
        metrics.record_fault().await;

        let snapshot = metrics.get_snapshot().await;
        assert_eq!(snapshot.recent_ticks.len(), MAX_RECENT_TICKS);
        assert_eq!(snapshot.tick_count, 25);
        assert_eq!(snapshot.alert_count, 25);
        assert_eq!(snapshot.fault_count, 1);

        metrics.reset().await;
        assert_eq!(metrics.get_snapshot().await, MetricsSnapshot::default());
    }
}
