//! Per-frame detector output.
//!
//! A `FrameObservation` is produced once per sampling tick and consumed
//! immediately by the trackers. It is never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in working-frame pixel coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A detected face. Landmarks are carried through for consumers that draw
/// overlays; the trackers only count faces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaceBox {
    pub bbox: BoundingBox,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<(f32, f32)>,
}

impl FaceBox {
    pub fn new(bbox: BoundingBox, score: f32) -> Self {
        Self {
            bbox,
            score,
            landmarks: Vec::new(),
        }
    }
}

/// A single object-detector hit, as reported by the detector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectDetection {
    pub class: String,
    pub score: f32,
    pub bbox: BoundingBox,
}

impl ObjectDetection {
    pub fn new(class: impl Into<String>, score: f32) -> Self {
        Self {
            class: class.into(),
            score,
            bbox: BoundingBox::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameObservation {
    pub timestamp: DateTime<Utc>,
    pub faces: Vec<FaceBox>,
    pub objects: Vec<ObjectDetection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_level: Option<f32>,
}

impl FrameObservation {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            faces: Vec::new(),
            objects: Vec::new(),
            audio_level: None,
        }
    }

    pub fn with_faces(mut self, count: usize) -> Self {
        self.faces = vec![FaceBox::default(); count];
        self
    }

    pub fn with_object(mut self, class: impl Into<String>, score: f32) -> Self {
        self.objects.push(ObjectDetection::new(class, score));
        self
    }

    pub fn with_audio_level(mut self, level: f32) -> Self {
        self.audio_level = Some(level);
        self
    }
}
