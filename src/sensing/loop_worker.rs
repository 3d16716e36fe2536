use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::{EngineConfig, TickFaultPolicy};
use crate::metrics::{MetricsCollector, TickMetrics};
use crate::models::{Alert, FrameObservation, SessionStats};
use crate::tracking::ObservationEngine;

use super::detector::DetectionPipeline;
use super::frame::WorkingFrame;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Everything a sampling loop borrows from its session.
pub struct LoopContext {
    pub session_id: String,
    pub pipeline: DetectionPipeline,
    pub config: EngineConfig,
    pub cancel_token: CancellationToken,
    pub alerts_tx: broadcast::Sender<Alert>,
    /// Latest stats, republished after every tick that emitted alerts.
    pub stats_tx: Arc<watch::Sender<SessionStats>>,
    pub metrics: MetricsCollector,
    pub debug: bool,
}

/// Runs ticks until cancelled and hands the engine back to the caller.
///
/// One tick at a time: the next capture starts only after both detector calls
/// for the current frame resolved. Cancellation is observed before a tick,
/// while any detector call is pending, and again before the tick's results
/// are committed, so nothing reaches the engine after `cancel()`.
pub async fn sampling_loop(ctx: LoopContext, mut engine: ObservationEngine) -> ObservationEngine {
    let mut ticker = tokio::time::interval(Duration::from_millis(ctx.config.frame_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log_info!("sampling loop started for session {}", ctx.session_id);

    loop {
        tokio::select! {
            biased;
            _ = ctx.cancel_token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = ctx.cancel_token.cancelled() => break,
            outcome = run_tick(&ctx) => outcome,
        };

        match outcome {
            Ok((observation, mut timings)) => {
                if ctx.cancel_token.is_cancelled() {
                    ctx.metrics.record_discarded().await;
                    log_debug!("discarding late tick for session {}", ctx.session_id);
                    break;
                }

                let alerts = engine.observe(&observation);
                timings.alerts_emitted = alerts.len();
                if ctx.debug {
                    log_info!(
                        "tick {}ms (capture {}ms, faces {}ms, objects {}ms): {} faces, {} objects, {} alerts",
                        timings.total_ms,
                        timings.capture_ms,
                        timings.face_ms,
                        timings.object_ms,
                        timings.face_count,
                        timings.object_count,
                        alerts.len()
                    );
                }
                ctx.metrics.record_tick(timings).await;

                if alerts.is_empty() {
                    continue;
                }
                ctx.stats_tx.send_replace(engine.stats().clone());
                for alert in alerts {
                    // no subscribers is fine; the alert is already in the log
                    let _ = ctx.alerts_tx.send(alert);
                }
            }
            Err(err) => {
                ctx.metrics.record_fault().await;
                match ctx.config.fault_policy {
                    TickFaultPolicy::SkipTick => {
                        log_warn!("tick skipped for session {}: {err:#}", ctx.session_id);
                    }
                    TickFaultPolicy::AbortSession => {
                        log_error!(
                            "sampling aborted for session {} after tick fault: {err:#}",
                            ctx.session_id
                        );
                        break;
                    }
                }
            }
        }
    }

    log_info!("sampling loop shutting down for session {}", ctx.session_id);
    engine
}

async fn run_tick(ctx: &LoopContext) -> Result<(FrameObservation, TickMetrics)> {
    let tick_start = Instant::now();
    let pipeline = &ctx.pipeline;

    let raw = pipeline.source.capture().await.context("frame capture failed")?;
    let captured_at = Utc::now();
    let (width, height) = (ctx.config.frame_width, ctx.config.frame_height);
    let frame = tokio::task::spawn_blocking(move || {
        WorkingFrame::from_capture(raw, width, height, captured_at)
    })
    .await
    .context("frame resize worker join failed")?;
    let capture_ms = tick_start.elapsed().as_millis() as u64;

    let face_start = Instant::now();
    let faces = pipeline
        .faces
        .detect(&frame)
        .await
        .context("face detection failed")?;
    let face_ms = face_start.elapsed().as_millis() as u64;

    let object_start = Instant::now();
    let objects = pipeline
        .objects
        .detect(&frame)
        .await
        .context("object detection failed")?;
    let object_ms = object_start.elapsed().as_millis() as u64;

    let timings = TickMetrics {
        timestamp: captured_at,
        capture_ms,
        face_ms,
        object_ms,
        total_ms: tick_start.elapsed().as_millis() as u64,
        face_count: faces.len(),
        object_count: objects.len(),
        alerts_emitted: 0,
    };

    let observation = FrameObservation {
        timestamp: captured_at,
        faces,
        objects,
        audio_level: pipeline.source.audio_level(),
    };

    Ok((observation, timings))
}
