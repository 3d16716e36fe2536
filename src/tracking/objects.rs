use chrono::{DateTime, Utc};
use log::debug;

use crate::models::{
    Alert, AlertKind, AlertTag, ObjectCategory, ObjectClass, ObjectDetection, SessionStats,
};

use super::throttle::{ThrottleKey, ThrottleTable};

/// Turns confident object detections into device and reading-material alerts.
///
/// Every qualifying detection is checked against its own class's throttle key,
/// so a phone and a book in the same frame both alert.
#[derive(Debug, Clone)]
pub struct ObjectAlertClassifier {
    min_score: f32,
    cooldown_ms: i64,
}

impl ObjectAlertClassifier {
    pub fn new(min_score: f32, cooldown_ms: i64) -> Self {
        Self {
            min_score,
            cooldown_ms,
        }
    }

    pub fn observe(
        &self,
        detections: &[ObjectDetection],
        now: DateTime<Utc>,
        throttle: &mut ThrottleTable,
        stats: &mut SessionStats,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for detection in detections {
            if detection.score.is_nan() || detection.score < self.min_score {
                continue;
            }
            let Some(class) = ObjectClass::parse(&detection.class) else {
                continue;
            };

            if !throttle.try_fire(ThrottleKey::Object(class), now, self.cooldown_ms) {
                debug!("suppressed {} alert inside cooldown", class.as_str());
                continue;
            }

            let kind = match class.category() {
                ObjectCategory::ElectronicDevice => AlertKind::ElectronicDevice { class },
                ObjectCategory::ReadingMaterial => AlertKind::ReadingMaterial,
            };
            stats.add_tag(AlertTag::for_object(class));
            alerts.push(Alert::new(kind, now));
        }

        alerts
    }
}
