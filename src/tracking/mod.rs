pub mod face;
pub mod objects;
pub mod throttle;
pub mod voice;

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::models::{Alert, FrameObservation, SessionStats};

pub use face::FacePresenceTracker;
pub use objects::ObjectAlertClassifier;
pub use throttle::{ThrottleKey, ThrottleTable};
pub use voice::VoiceActivityTracker;

/// Owns all per-session tracking state: the throttle table, the trackers,
/// and the statistics they feed. A fresh engine is built on every session
/// start, which is what resets throttles and stats.
#[derive(Debug, Clone)]
pub struct ObservationEngine {
    throttle: ThrottleTable,
    faces: FacePresenceTracker,
    objects: ObjectAlertClassifier,
    voice: VoiceActivityTracker,
    stats: SessionStats,
}

impl ObservationEngine {
    pub fn new(config: &EngineConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            throttle: ThrottleTable::new(),
            faces: FacePresenceTracker::new(
                started_at,
                config.absence_threshold_ms,
                config.throttle_cooldown_ms,
            ),
            objects: ObjectAlertClassifier::new(
                config.min_detection_score,
                config.throttle_cooldown_ms,
            ),
            voice: VoiceActivityTracker::new(config.voice.clone()),
            stats: SessionStats::new(),
        }
    }

    /// Applies one tick's observation. Face alerts come first, then objects,
    /// then audio; accepted alerts are appended to the log and returned.
    pub fn observe(&mut self, observation: &FrameObservation) -> Vec<Alert> {
        let now = observation.timestamp;

        let mut accepted = self.faces.observe(
            observation.faces.len(),
            now,
            &mut self.throttle,
            &mut self.stats,
        );
        accepted.extend(self.objects.observe(
            &observation.objects,
            now,
            &mut self.throttle,
            &mut self.stats,
        ));
        accepted.extend(self.voice.observe(
            observation.audio_level,
            now,
            &mut self.throttle,
            &mut self.stats,
        ));

        for alert in &accepted {
            self.stats.push_alert(alert.clone());
        }
        accepted
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn into_stats(self) -> SessionStats {
        self.stats
    }
}
