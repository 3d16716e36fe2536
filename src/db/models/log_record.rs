//! Persisted session log: the final stats plus who, when, and the score.

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Alert, AlertTag, Session, SessionStats};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogAlert {
    pub message: String,
    pub timestamp: String,
}

impl From<&Alert> for LogAlert {
    fn from(alert: &Alert) -> Self {
        Self {
            message: alert.message.clone(),
            timestamp: alert.timestamp.clone(),
        }
    }
}

/// Every field except `id` is required on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub candidate_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub focus_lost_count: u64,
    pub multiple_faces_count: u64,
    pub object_alert_types: BTreeSet<AlertTag>,
    pub alerts: Vec<LogAlert>,
    pub integrity_score: u8,
}

impl LogRecord {
    /// Build from a stopped session. Alerts are stored newest first, the order
    /// the live panel shows them.
    pub fn from_session(session: &Session, stats: &SessionStats, integrity_score: u8) -> Result<Self> {
        let (Some(start_time), Some(end_time)) = (session.start_time, session.end_time) else {
            bail!("session {} has not finished", session.id);
        };
        let record = Self {
            id: None,
            candidate_name: session.candidate_name.clone(),
            start_time,
            end_time,
            focus_lost_count: stats.focus_lost_count,
            multiple_faces_count: stats.multiple_faces_count,
            object_alert_types: stats.object_alert_types.clone(),
            alerts: stats.recent_alerts().map(LogAlert::from).collect(),
            integrity_score,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<()> {
        if self.candidate_name.trim().is_empty() {
            bail!("candidateName is required");
        }
        if self.end_time < self.start_time {
            bail!("endTime precedes startTime");
        }
        if self.integrity_score > 100 {
            bail!("integrityScore {} out of range", self.integrity_score);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "candidateName": "Ada",
        "startTime": "2024-05-01T09:00:00Z",
        "endTime": "2024-05-01T09:30:00Z",
        "focusLostCount": 1,
        "multipleFacesCount": 0,
        "objectAlertTypes": ["absence", "notes"],
        "alerts": [{"message": "Book/paper detected", "timestamp": "09:10:00"}],
        "integrityScore": 70
    }"#;

    #[test]
    fn parses_wire_format() {
        let record: LogRecord = serde_json::from_str(BODY).unwrap();
        assert_eq!(record.candidate_name, "Ada");
        assert!(record.object_alert_types.contains(&AlertTag::Notes));
        assert_eq!(record.alerts[0].message, "Book/paper detected");
        record.validate().unwrap();
    }

    #[test]
    fn stored_alerts_are_newest_first() {
        use crate::models::AlertKind;
        use chrono::{Duration, TimeZone};

        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut session = Session::new();
        session.begin("Ada", start).unwrap();
        session.finish(start + Duration::minutes(5)).unwrap();

        let mut stats = SessionStats::new();
        stats.push_alert(Alert::new(AlertKind::ReadingMaterial, start + Duration::seconds(10)));
        stats.push_alert(Alert::new(
            AlertKind::MultipleFaces { count: 2 },
            start + Duration::seconds(20),
        ));

        let record = LogRecord::from_session(&session, &stats, 70).unwrap();
        let messages: Vec<_> = record.alerts.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["Multiple faces (2) detected", "Book/paper detected"]);
    }

    #[test]
    fn missing_field_is_rejected() {
        let body = BODY.replace(r#""integrityScore": 70"#, r#""unused": 1"#);
        assert!(serde_json::from_str::<LogRecord>(&body).is_err());
    }

    #[test]
    fn unknown_alert_type_is_rejected() {
        let body = BODY.replace(r#""notes""#, r#""note""#);
        assert!(serde_json::from_str::<LogRecord>(&body).is_err());
    }

    #[test]
    fn validation_catches_inverted_times_and_range() {
        let mut record: LogRecord = serde_json::from_str(BODY).unwrap();
        record.integrity_score = 101;
        assert!(record.validate().is_err());
        record.integrity_score = 50;
        std::mem::swap(&mut record.start_time, &mut record.end_time);
        assert!(record.validate().is_err());
    }
}
