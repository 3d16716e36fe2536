//! Boundary to media acquisition and neural inference.
//!
//! The engine treats both detectors as opaque async calls and trusts their
//! output at face value.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;

use crate::models::{FaceBox, ObjectDetection};

use super::frame::WorkingFrame;

/// Camera (and optionally microphone) feed.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Acquire the device. Called once before the session enters Running.
    async fn open(&self) -> Result<()> {
        Ok(())
    }

    async fn capture(&self) -> Result<DynamicImage>;

    /// Current normalized microphone level, if audio is being monitored.
    fn audio_level(&self) -> Option<f32> {
        None
    }

    async fn close(&self) {}
}

#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Load model weights. Called once per session start.
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    async fn detect(&self, frame: &WorkingFrame) -> Result<Vec<FaceBox>>;
}

#[async_trait]
pub trait ObjectDetector: Send + Sync {
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    async fn detect(&self, frame: &WorkingFrame) -> Result<Vec<ObjectDetection>>;
}

/// The three collaborators a sampling loop needs, shareable across tasks.
#[derive(Clone)]
pub struct DetectionPipeline {
    pub source: Arc<dyn FrameSource>,
    pub faces: Arc<dyn FaceDetector>,
    pub objects: Arc<dyn ObjectDetector>,
}

impl DetectionPipeline {
    pub fn new(
        source: Arc<dyn FrameSource>,
        faces: Arc<dyn FaceDetector>,
        objects: Arc<dyn ObjectDetector>,
    ) -> Self {
        Self {
            source,
            faces,
            objects,
        }
    }

    /// Open the media source and warm both models.
    pub async fn acquire(&self) -> Result<()> {
        self.source.open().await.context("failed to open media source")?;
        if let Err(err) = self.load_models().await {
            self.source.close().await;
            return Err(err);
        }
        Ok(())
    }

    async fn load_models(&self) -> Result<()> {
        self.faces.load().await.context("failed to load face model")?;
        self.objects
            .load()
            .await
            .context("failed to load object detection model")
    }

    pub async fn release(&self) {
        self.source.close().await;
    }
}
