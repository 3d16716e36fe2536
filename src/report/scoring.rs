use crate::models::{AlertTag, SessionStats};

const BASE_SCORE: i64 = 100;
const ABSENCE_PENALTY: i64 = 15;
const MULTIPLE_FACES_PENALTY: i64 = 20;
const EXTRA_VOICE_PENALTY: i64 = 15;
const FOCUS_LOST_PENALTY: i64 = 5;
const KEYWORD_PENALTY: i64 = 10;

/// Compute the integrity score for a finished session, clamped to 0..=100.
///
/// Two independent passes: counter/tag penalties first, then a keyword scan
/// over every alert message. The passes are kept separate even where they
/// could overlap.
pub fn integrity_score(stats: &SessionStats) -> u8 {
    let score = BASE_SCORE
        .saturating_sub(counter_penalty(stats))
        .saturating_sub(keyword_penalty(stats));
    score.clamp(0, 100) as u8
}

fn counter_penalty(stats: &SessionStats) -> i64 {
    let mut penalty: i64 = 0;
    if stats.has_tag(AlertTag::Absence) {
        penalty = penalty.saturating_add(ABSENCE_PENALTY);
    }
    penalty = penalty.saturating_add(scaled(stats.multiple_faces_count, MULTIPLE_FACES_PENALTY));
    if stats.has_tag(AlertTag::ExtraVoice) {
        penalty = penalty.saturating_add(EXTRA_VOICE_PENALTY);
    }
    penalty.saturating_add(scaled(stats.focus_lost_count, FOCUS_LOST_PENALTY))
}

/// Each alert is scanned on its own: "cell phone", "laptop", "monitor", and
/// "book"/"notes" each cost `KEYWORD_PENALTY` per matching alert.
fn keyword_penalty(stats: &SessionStats) -> i64 {
    stats
        .alerts
        .iter()
        .map(|alert| message_penalty(&alert.message))
        .fold(0i64, i64::saturating_add)
}

fn message_penalty(message: &str) -> i64 {
    let text = message.to_lowercase();
    let mut penalty = 0;
    if text.contains("cell phone") {
        penalty += KEYWORD_PENALTY;
    }
    if text.contains("laptop") {
        penalty += KEYWORD_PENALTY;
    }
    if text.contains("monitor") {
        penalty += KEYWORD_PENALTY;
    }
    if text.contains("book") || text.contains("notes") {
        penalty += KEYWORD_PENALTY;
    }
    penalty
}

fn scaled(count: u64, per_event: i64) -> i64 {
    i64::try_from(count)
        .unwrap_or(i64::MAX)
        .saturating_mul(per_event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, AlertKind, ObjectClass};
    use chrono::Utc;

    fn alert(kind: AlertKind) -> Alert {
        Alert::new(kind, Utc::now())
    }

    #[test]
    fn clean_session_scores_full() {
        assert_eq!(integrity_score(&SessionStats::new()), 100);
    }

    #[test]
    fn counter_penalties_without_keyword_alerts() {
        let mut stats = SessionStats::new();
        stats.add_tag(AlertTag::Absence);
        stats.multiple_faces_count = 1;
        stats.focus_lost_count = 2;
        assert_eq!(integrity_score(&stats), 55);
    }

    #[test]
    fn keyword_scan_counts_each_alert() {
        let mut stats = SessionStats::new();
        for _ in 0..3 {
            stats.push_alert(alert(AlertKind::ElectronicDevice {
                class: ObjectClass::Laptop,
            }));
        }
        stats.add_tag(AlertTag::Laptop);
        assert_eq!(integrity_score(&stats), 70);
    }

    #[test]
    fn computer_and_face_alerts_are_not_keywords() {
        let mut stats = SessionStats::new();
        stats.push_alert(alert(AlertKind::ElectronicDevice {
            class: ObjectClass::Computer,
        }));
        stats.push_alert(alert(AlertKind::MultipleFaces { count: 2 }));
        stats.push_alert(alert(AlertKind::Absence));
        assert_eq!(integrity_score(&stats), 100);
    }

    #[test]
    fn book_and_notes_share_one_penalty_per_alert() {
        let mut stats = SessionStats::new();
        stats.push_alert(alert(AlertKind::ReadingMaterial));
        stats.push_alert(Alert {
            message: "Notes and BOOK on desk".into(),
            ..alert(AlertKind::ReadingMaterial)
        });
        stats.push_alert(Alert {
            message: "Extra MONITOR detected".into(),
            ..alert(AlertKind::ElectronicDevice {
                class: ObjectClass::Computer,
            })
        });
        assert_eq!(integrity_score(&stats), 70);
    }

    #[test]
    fn extra_voice_slot_penalized_once() {
        let mut stats = SessionStats::new();
        stats.add_tag(AlertTag::ExtraVoice);
        stats.push_alert(alert(AlertKind::ExtraVoice));
        stats.push_alert(alert(AlertKind::ExtraVoice));
        assert_eq!(integrity_score(&stats), 85);
    }

    #[test]
    fn pathological_counters_clamp_to_zero() {
        let mut stats = SessionStats::new();
        stats.multiple_faces_count = u64::MAX;
        stats.focus_lost_count = u64::MAX;
        stats.add_tag(AlertTag::Absence);
        assert_eq!(integrity_score(&stats), 0);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let mut stats = SessionStats::new();
        stats.focus_lost_count = 1;
        stats.push_alert(alert(AlertKind::ElectronicDevice {
            class: ObjectClass::CellPhone,
        }));
        let first = integrity_score(&stats);
        assert_eq!(first, integrity_score(&stats));
        assert_eq!(first, 85);
    }
}
