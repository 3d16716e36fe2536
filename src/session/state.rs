use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};
use crate::models::{Session, SessionState};

impl Default for Session {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            candidate_name: String::new(),
            state: SessionState::Idle,
            start_time: None,
            end_time: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Idle to Running. The name must already be validated.
    pub fn begin(&mut self, candidate_name: &str, start_at: DateTime<Utc>) -> SessionResult<()> {
        self.transition(SessionState::Running)?;
        self.candidate_name = candidate_name.to_string();
        self.start_time = Some(start_at);
        Ok(())
    }

    /// Running to Stopped. `end_at` never precedes the start time.
    pub fn finish(&mut self, end_at: DateTime<Utc>) -> SessionResult<()> {
        self.transition(SessionState::Stopped)?;
        let end_at = match self.start_time {
            Some(start) if end_at < start => start,
            _ => end_at,
        };
        self.end_time = Some(end_at);
        Ok(())
    }

    fn transition(&mut self, to: SessionState) -> SessionResult<()> {
        let allowed = matches!(
            (self.state, to),
            (SessionState::Idle, SessionState::Running)
                | (SessionState::Running, SessionState::Stopped)
        );
        if !allowed {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// Whole seconds since start; frozen at the end time once stopped.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        let Some(start) = self.start_time else {
            return 0;
        };
        let until = self.end_time.unwrap_or(now);
        (until - start).num_seconds().max(0)
    }
}

/// `HH:MM:SS` clock for the running-session display.
pub fn format_clock(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        let mut session = Session::new();
        assert!(matches!(
            session.finish(t0()),
            Err(SessionError::InvalidTransition { .. })
        ));

        session.begin("Ada", t0()).unwrap();
        assert!(session.is_running());
        assert!(session.begin("Ada", t0()).is_err());

        session.finish(t0() + Duration::seconds(90)).unwrap();
        assert_eq!(session.state, SessionState::Stopped);
        assert!(session.begin("Ada", t0()).is_err());
        assert!(session.finish(t0()).is_err());
    }

    #[test]
    fn end_time_never_precedes_start() {
        let mut session = Session::new();
        session.begin("Ada", t0()).unwrap();
        session.finish(t0() - Duration::seconds(5)).unwrap();
        assert_eq!(session.end_time, Some(t0()));
    }

    #[test]
    fn elapsed_freezes_after_stop() {
        let mut session = Session::new();
        assert_eq!(session.elapsed_secs(t0()), 0);
        session.begin("Ada", t0()).unwrap();
        assert_eq!(session.elapsed_secs(t0() + Duration::seconds(42)), 42);
        session.finish(t0() + Duration::seconds(50)).unwrap();
        assert_eq!(session.elapsed_secs(t0() + Duration::seconds(500)), 50);
    }

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(3_725), "01:02:05");
    }
}
