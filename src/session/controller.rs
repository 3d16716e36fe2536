use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};
use serde::Serialize;
use tokio::sync::{broadcast, watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::{
    config::{self, EngineConfig},
    db::{LogRecord, LogStore},
    error::{SessionError, SessionResult},
    metrics::{MetricsCollector, MetricsSnapshot},
    models::{Alert, AlertKind, Session, SessionState, SessionStats},
    report::{compile_report, integrity_score, SessionReport},
    sensing::{DetectionPipeline, LoopContext, SamplingController},
    tracking::ObservationEngine,
};

use super::state::format_clock;

const ALERT_FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session: Session,
    pub elapsed_secs: i64,
    /// `HH:MM:SS`
    pub clock: String,
    pub stats: SessionStats,
}

impl SessionSnapshot {
    pub fn recent_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.stats.recent_alerts()
    }
}

/// What `stop()` hands back: the final stats and the report built from them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub session: Session,
    pub stats: SessionStats,
    pub integrity_score: u8,
    pub report: SessionReport,
}

#[derive(Clone)]
pub struct SessionController {
    session: Arc<Mutex<Session>>,
    sampler: Arc<Mutex<SamplingController>>,
    pipeline: DetectionPipeline,
    config: EngineConfig,
    store: Option<Arc<dyn LogStore>>,
    alerts_tx: broadcast::Sender<Alert>,
    stats_tx: Arc<watch::Sender<SessionStats>>,
    metrics: MetricsCollector,
    debug_mode: bool,
}

impl SessionController {
    pub fn new(pipeline: DetectionPipeline, config: EngineConfig) -> Self {
        let (alerts_tx, _) = broadcast::channel(ALERT_FEED_CAPACITY);
        let (stats_tx, _) = watch::channel(SessionStats::new());

        Self {
            session: Arc::new(Mutex::new(Session::new())),
            sampler: Arc::new(Mutex::new(SamplingController::new())),
            pipeline,
            config,
            store: None,
            alerts_tx,
            stats_tx: Arc::new(stats_tx),
            metrics: MetricsCollector::new(),
            debug_mode: config::debug_mode(),
        }
    }

    /// Persist a log for every stopped session.
    pub fn with_store(mut self, store: Arc<dyn LogStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Live feed of accepted alerts, in emission order.
    pub fn subscribe(&self) -> broadcast::Receiver<Alert> {
        self.alerts_tx.subscribe()
    }

    /// Latest published stats; updated whenever a tick emits alerts.
    pub fn watch_stats(&self) -> watch::Receiver<SessionStats> {
        self.stats_tx.subscribe()
    }

    pub async fn session(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await.clone();
        let elapsed_secs = session.elapsed_secs(Utc::now());
        SessionSnapshot {
            clock: format_clock(elapsed_secs),
            elapsed_secs,
            stats: self.stats_tx.borrow().clone(),
            session,
        }
    }

    /// False once the sampling loop has exited, including after an
    /// `AbortSession` fault while the session is still Running.
    pub async fn is_sampling(&self) -> bool {
        self.sampler.lock().await.is_active()
    }

    pub async fn metrics(&self) -> MetricsSnapshot {
        self.metrics.get_snapshot().await
    }

    /// Idle to Running. Media is acquired before the transition; if that
    /// fails the session stays Idle and a single failure alert is published.
    pub async fn start(&self, candidate_name: &str) -> SessionResult<Session> {
        let candidate_name = candidate_name.trim();
        if candidate_name.is_empty() {
            return Err(SessionError::Validation(
                "candidate name is required".to_string(),
            ));
        }

        let mut session = self.session.lock().await;
        if session.state != SessionState::Idle {
            return Err(SessionError::InvalidTransition {
                from: session.state,
                to: SessionState::Running,
            });
        }

        if let Err(err) = self.pipeline.acquire().await {
            warn!("Media acquisition failed for {candidate_name}: {err:#}");
            self.publish_media_failure();
            return Err(SessionError::MediaUnavailable(format!("{err:#}")));
        }

        let started_at = Utc::now();
        session.begin(candidate_name, started_at)?;
        self.metrics.reset().await;
        self.stats_tx.send_replace(SessionStats::new());

        let ctx = LoopContext {
            session_id: session.id.clone(),
            pipeline: self.pipeline.clone(),
            config: self.config.clone(),
            cancel_token: CancellationToken::new(),
            alerts_tx: self.alerts_tx.clone(),
            stats_tx: self.stats_tx.clone(),
            metrics: self.metrics.clone(),
            debug: self.debug_mode,
        };
        let engine = ObservationEngine::new(&self.config, started_at);
        self.sampler.lock().await.start(ctx, engine)?;

        info!("Session {} started for {}", session.id, session.candidate_name);
        Ok(session.clone())
    }

    /// Running to Stopped. Returns `None` when nothing is running.
    ///
    /// The sampling loop is cancelled and joined before the end time is
    /// recorded, so the returned stats are final.
    pub async fn stop(&self) -> SessionResult<Option<SessionOutcome>> {
        let mut session = self.session.lock().await;
        if !session.is_running() {
            return Ok(None);
        }

        let engine = match self.sampler.lock().await.stop().await {
            Ok(engine) => engine,
            Err(err) => {
                error!("Sampling loop for session {} ended abnormally: {err:#}", session.id);
                None
            }
        };
        self.pipeline.release().await;

        session.finish(Utc::now())?;

        let stats = match engine {
            Some(engine) => engine.into_stats(),
            None => self.stats_tx.borrow().clone(),
        };
        let score = integrity_score(&stats);
        let report = compile_report(
            &session.candidate_name,
            session.start_time,
            session.end_time,
            &stats,
            score,
        );
        self.stats_tx.send_replace(stats.clone());

        info!(
            "Session {} stopped: {} alerts, integrity score {}",
            session.id,
            stats.alerts.len(),
            score
        );

        self.persist(&session, &stats, score);

        Ok(Some(SessionOutcome {
            session: session.clone(),
            stats,
            integrity_score: score,
            report,
        }))
    }

    /// Swap a stopped session for a fresh idle one so `start` can run again.
    pub async fn new_session(&self) -> SessionResult<Session> {
        let mut session = self.session.lock().await;
        if session.is_running() {
            return Err(SessionError::InvalidTransition {
                from: session.state,
                to: SessionState::Idle,
            });
        }

        *session = Session::new();
        self.stats_tx.send_replace(SessionStats::new());
        Ok(session.clone())
    }

    fn publish_media_failure(&self) {
        let alert = Alert::new(AlertKind::MediaFailure, Utc::now());
        let mut stats = SessionStats::new();
        stats.push_alert(alert.clone());
        self.stats_tx.send_replace(stats);
        let _ = self.alerts_tx.send(alert);
    }

    /// Fire-and-forget: the outcome is already computed and never waits on
    /// the store.
    fn persist(&self, session: &Session, stats: &SessionStats, score: u8) {
        let Some(store) = self.store.clone() else {
            return;
        };

        if session.candidate_name.trim().is_empty() {
            warn!("Skipping log for session {}: no candidate name", session.id);
            return;
        }

        let record = match LogRecord::from_session(session, stats, score) {
            Ok(record) => record,
            Err(err) => {
                error!("Failed to build log for session {}: {err:#}", session.id);
                return;
            }
        };

        let session_id = session.id.clone();
        tokio::spawn(async move {
            match store.save_log(record).await {
                Ok(saved) => info!(
                    "Saved log {} for session {}",
                    saved.id.unwrap_or_default(),
                    session_id
                ),
                Err(err) => error!("Failed to save log for session {session_id}: {err:#}"),
            }
        });
    }
}
