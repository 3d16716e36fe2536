use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::tracking::ObservationEngine;

use super::loop_worker::{sampling_loop, LoopContext};

/// Owns the running sampling task and its cancellation token.
#[derive(Default)]
pub struct SamplingController {
    handle: Option<JoinHandle<ObservationEngine>>,
    cancel_token: Option<CancellationToken>,
}

impl SamplingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the loop. `ctx.cancel_token` becomes the token `cancel()` fires.
    pub fn start(&mut self, ctx: LoopContext, engine: ObservationEngine) -> Result<()> {
        if self.handle.is_some() {
            bail!("sampling already active");
        }

        let cancel_token = ctx.cancel_token.clone();
        let handle = tokio::spawn(sampling_loop(ctx, engine));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Signal the loop to stop without waiting for it.
    pub fn cancel(&self) {
        if let Some(token) = &self.cancel_token {
            token.cancel();
        }
    }

    /// Cancel, wait for the loop to exit, and take its engine back.
    /// Returns `None` if no loop was started.
    pub async fn stop(&mut self) -> Result<Option<ObservationEngine>> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        match self.handle.take() {
            Some(handle) => {
                let engine = handle
                    .await
                    .context("sampling loop task failed to join")?;
                info!("sampling loop joined");
                Ok(Some(engine))
            }
            None => Ok(None),
        }
    }
}

impl Drop for SamplingController {
    fn drop(&mut self) {
        self.cancel();
    }
}
