use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::alert::{Alert, AlertTag};

/// Counters and the alert log accumulated over one session.
///
/// Mutated only through the trackers while the session is running; the
/// Session Controller hands out clones once the session has stopped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub focus_lost_count: u64,
    pub multiple_faces_count: u64,
    pub object_alert_types: BTreeSet<AlertTag>,
    /// Emission order, oldest first.
    pub alerts: Vec<Alert>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_tag(&self, tag: AlertTag) -> bool {
        self.object_alert_types.contains(&tag)
    }

    /// Newest first, the order the live alert panel shows.
    pub fn recent_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().rev()
    }

    pub(crate) fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    pub(crate) fn add_tag(&mut self, tag: AlertTag) {
        self.object_alert_types.insert(tag);
    }

    pub(crate) fn increment_focus_lost(&mut self) {
        self.focus_lost_count = self.focus_lost_count.saturating_add(1);
    }

    pub(crate) fn increment_multiple_faces(&mut self) {
        self.multiple_faces_count = self.multiple_faces_count.saturating_add(1);
    }
}
