use chrono::{DateTime, Utc};

use crate::models::{Alert, AlertKind, AlertTag, SessionStats};

use super::throttle::{ThrottleKey, ThrottleTable};

/// Derives absence and multiple-face alerts from per-frame face counts.
///
/// Absence is edge-triggered: one alert per qualifying stretch of
/// `absence_threshold_ms` without a face, after which the timer restarts.
#[derive(Debug, Clone)]
pub struct FacePresenceTracker {
    last_face_seen_at: DateTime<Utc>,
    absence_threshold_ms: i64,
    cooldown_ms: i64,
}

impl FacePresenceTracker {
    pub fn new(created_at: DateTime<Utc>, absence_threshold_ms: i64, cooldown_ms: i64) -> Self {
        Self {
            last_face_seen_at: created_at,
            absence_threshold_ms,
            cooldown_ms,
        }
    }

    pub fn last_face_seen_at(&self) -> DateTime<Utc> {
        self.last_face_seen_at
    }

    pub fn observe(
        &mut self,
        face_count: usize,
        now: DateTime<Utc>,
        throttle: &mut ThrottleTable,
        stats: &mut SessionStats,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if face_count == 0 {
            if (now - self.last_face_seen_at).num_milliseconds() >= self.absence_threshold_ms {
                self.last_face_seen_at = now;
                stats.increment_focus_lost();
                stats.add_tag(AlertTag::Absence);
                alerts.push(Alert::new(AlertKind::Absence, now));
            }
            return alerts;
        }

        self.last_face_seen_at = now;

        if face_count > 1 && throttle.try_fire(ThrottleKey::MultipleFaces, now, self.cooldown_ms) {
            stats.increment_multiple_faces();
            stats.add_tag(AlertTag::MultipleFaces);
            alerts.push(Alert::new(AlertKind::MultipleFaces { count: face_count }, now));
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn ms(n: i64) -> DateTime<Utc> {
        t0() + Duration::milliseconds(n)
    }

    #[test]
    fn absence_fires_once_per_window() {
        let mut tracker = FacePresenceTracker::new(t0(), 10_000, 500);
        let mut throttle = ThrottleTable::new();
        let mut stats = SessionStats::new();

        let mut fired = 0;
        // 0 faces every 100ms for 25s
        for step in 0..=250 {
            fired += tracker
                .observe(0, ms(step * 100), &mut throttle, &mut stats)
                .len();
        }
        // fires at 10s and 20s
        assert_eq!(fired, 2);
        assert_eq!(stats.focus_lost_count, 2);
        assert!(stats.has_tag(AlertTag::Absence));
    }

    #[test]
    fn face_reappearing_resets_absence_timer() {
        let mut tracker = FacePresenceTracker::new(t0(), 10_000, 500);
        let mut throttle = ThrottleTable::new();
        let mut stats = SessionStats::new();

        assert!(tracker.observe(0, ms(9_000), &mut throttle, &mut stats).is_empty());
        assert!(tracker.observe(1, ms(9_500), &mut throttle, &mut stats).is_empty());
        assert_eq!(tracker.last_face_seen_at(), ms(9_500));
        // 10s after start, but only 9s after the face was last seen
        assert!(tracker.observe(0, ms(18_500), &mut throttle, &mut stats).is_empty());
        let alerts = tracker.observe(0, ms(19_500), &mut throttle, &mut stats);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "No face detected for >10 seconds");
    }

    #[test]
    fn multiple_faces_throttled_to_cooldown() {
        let mut tracker = FacePresenceTracker::new(t0(), 10_000, 500);
        let mut throttle = ThrottleTable::new();
        let mut stats = SessionStats::new();

        let first = tracker.observe(2, ms(0), &mut throttle, &mut stats);
        let second = tracker.observe(2, ms(100), &mut throttle, &mut stats);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].message, "Multiple faces (2) detected");
        assert!(second.is_empty());
        assert_eq!(stats.multiple_faces_count, 1);

        let third = tracker.observe(3, ms(600), &mut throttle, &mut stats);
        assert_eq!(third[0].message, "Multiple faces (3) detected");
        assert_eq!(stats.multiple_faces_count, 2);
        assert!(stats.has_tag(AlertTag::MultipleFaces));
    }

    #[test]
    fn single_face_emits_nothing() {
        let mut tracker = FacePresenceTracker::new(t0(), 10_000, 500);
        let mut throttle = ThrottleTable::new();
        let mut stats = SessionStats::new();

        assert!(tracker.observe(1, ms(20_000), &mut throttle, &mut stats).is_empty());
        assert_eq!(stats, SessionStats::new());
        assert!(throttle.is_empty());
    }
}
