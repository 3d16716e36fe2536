//! Real-time proctoring engine: turns per-frame face and object detections
//! into throttled alerts, session statistics, an integrity score, and a
//! final report.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod models;
pub mod report;
pub mod sensing;
pub mod session;
pub mod settings;
pub mod tracking;
pub mod utils;

pub use config::{EngineConfig, TickFaultPolicy, VoiceConfig};
pub use db::{Database, LogRecord, LogStore};
pub use error::{SessionError, SessionResult};
pub use models::{Alert, AlertKind, AlertTag, FrameObservation, Session, SessionState, SessionStats};
pub use report::{compile_report, integrity_score, SessionReport};
pub use sensing::{DetectionPipeline, FaceDetector, FrameSource, ObjectDetector, WorkingFrame};
pub use session::{SessionController, SessionOutcome, SessionSnapshot};
pub use settings::SettingsStore;
pub use tracking::ObservationEngine;
