//! Structured end-of-session report. Layout and pagination belong to
//! whatever renders it; this only assembles the data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AlertTag, SessionStats};

/// Tag-to-label mapping, in report order. The notes entry covers both
/// `notes` and `book`.
const SUSPICIOUS_EVENT_LABELS: &[(&[AlertTag], &str)] = &[
    (&[AlertTag::MultipleFaces], "Multiple faces detected"),
    (&[AlertTag::Absence], "Candidate absent"),
    (&[AlertTag::CellPhone], "Mobile phone detected"),
    (&[AlertTag::Laptop], "Laptop detected"),
    (&[AlertTag::Computer], "Extra computer detected"),
    (&[AlertTag::Monitor], "Extra monitor detected"),
    (&[AlertTag::Book, AlertTag::Notes], "Notes/book detected"),
    (&[AlertTag::ExtraVoice], "Extra voice detected"),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportAlert {
    pub timestamp: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub candidate_name: String,
    pub duration: String,
    pub focus_lost_count: u64,
    pub multiple_faces_count: u64,
    pub suspicious_events: Vec<String>,
    /// Newest first.
    pub alerts: Vec<ReportAlert>,
    pub integrity_score: u8,
    pub feedback: String,
}

pub fn compile_report(
    candidate_name: &str,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    stats: &SessionStats,
    integrity_score: u8,
) -> SessionReport {
    SessionReport {
        candidate_name: candidate_name.to_string(),
        duration: format_duration(start_time, end_time),
        focus_lost_count: stats.focus_lost_count,
        multiple_faces_count: stats.multiple_faces_count,
        suspicious_events: suspicious_events(stats),
        alerts: stats
            .recent_alerts()
            .map(|alert| ReportAlert {
                timestamp: alert.timestamp.clone(),
                message: alert.message.clone(),
            })
            .collect(),
        integrity_score,
        feedback: feedback_for(integrity_score).to_string(),
    }
}

pub fn suspicious_events(stats: &SessionStats) -> Vec<String> {
    SUSPICIOUS_EVENT_LABELS
        .iter()
        .filter(|(tags, _)| tags.iter().any(|tag| stats.has_tag(*tag)))
        .map(|(_, label)| label.to_string())
        .collect()
}

pub fn feedback_for(score: u8) -> &'static str {
    match score {
        91..=u8::MAX => "Excellent integrity maintained.",
        71..=90 => "Good, minor issues noticed.",
        51..=70 => "Fair, several concerns present.",
        _ => "Poor, high risk detected.",
    }
}

/// `Hh Mm Ss` between start and end; `0h 0m 0s` until both are known.
pub fn format_duration(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return "0h 0m 0s".to_string();
    };
    let total_secs = (end - start).num_seconds().max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    format!("{hours}h {minutes}m {seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, AlertKind, ObjectClass};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn duration_formats_hours_minutes_seconds() {
        let end = t0() + Duration::seconds(3_725) + Duration::milliseconds(900);
        assert_eq!(format_duration(Some(t0()), Some(end)), "1h 2m 5s");
        assert_eq!(format_duration(Some(t0()), None), "0h 0m 0s");
        assert_eq!(format_duration(None, None), "0h 0m 0s");
    }

    #[test]
    fn feedback_bands() {
        assert_eq!(feedback_for(100), "Excellent integrity maintained.");
        assert_eq!(feedback_for(91), "Excellent integrity maintained.");
        assert_eq!(feedback_for(90), "Good, minor issues noticed.");
        assert_eq!(feedback_for(71), "Good, minor issues noticed.");
        assert_eq!(feedback_for(70), "Fair, several concerns present.");
        assert_eq!(feedback_for(51), "Fair, several concerns present.");
        assert_eq!(feedback_for(50), "Poor, high risk detected.");
        assert_eq!(feedback_for(0), "Poor, high risk detected.");
    }

    #[test]
    fn suspicious_events_are_deduplicated_and_ordered() {
        let mut stats = SessionStats::new();
        stats.add_tag(AlertTag::Notes);
        stats.add_tag(AlertTag::Book);
        stats.add_tag(AlertTag::Absence);
        stats.add_tag(AlertTag::CellPhone);
        stats.add_tag(AlertTag::MultipleFaces);
        assert_eq!(
            suspicious_events(&stats),
            vec![
                "Multiple faces detected",
                "Candidate absent",
                "Mobile phone detected",
                "Notes/book detected",
            ]
        );
    }

    #[test]
    fn report_lists_alerts_newest_first() {
        let mut stats = SessionStats::new();
        stats.push_alert(Alert::new(AlertKind::Absence, t0()));
        stats.push_alert(Alert::new(
            AlertKind::ElectronicDevice {
                class: ObjectClass::Laptop,
            },
            t0() + Duration::seconds(5),
        ));
        let report = compile_report(
            "Ada",
            Some(t0()),
            Some(t0() + Duration::seconds(61)),
            &stats,
            75,
        );
        assert_eq!(report.duration, "0h 1m 1s");
        assert_eq!(report.alerts[0].message, "Electronic device (laptop) detected");
        assert_eq!(report.alerts[1].message, "No face detected for >10 seconds");
        assert_eq!(report.feedback, "Good, minor issues noticed.");
        assert!(report.suspicious_events.is_empty());
    }
}
