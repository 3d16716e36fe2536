use chrono::{DateTime, Utc};

use crate::config::VoiceConfig;
use crate::models::{Alert, AlertKind, AlertTag, SessionStats};

use super::throttle::{ThrottleKey, ThrottleTable};

/// Flags sustained audio above the speech threshold as an extra voice.
#[derive(Debug, Clone)]
pub struct VoiceActivityTracker {
    config: VoiceConfig,
    loud_since: Option<DateTime<Utc>>,
}

impl VoiceActivityTracker {
    pub fn new(config: VoiceConfig) -> Self {
        Self {
            config,
            loud_since: None,
        }
    }

    pub fn observe(
        &mut self,
        audio_level: Option<f32>,
        now: DateTime<Utc>,
        throttle: &mut ThrottleTable,
        stats: &mut SessionStats,
    ) -> Option<Alert> {
        if !self.config.enabled {
            return None;
        }
        // frames without an audio reading leave the sustain timer alone
        let level = audio_level?;

        if level < self.config.level_threshold {
            self.loud_since = None;
            return None;
        }

        let since = *self.loud_since.get_or_insert(now);
        if (now - since).num_milliseconds() < self.config.sustain_ms {
            return None;
        }

        if !throttle.try_fire(ThrottleKey::ExtraVoice, now, self.config.cooldown_ms) {
            return None;
        }

        self.loud_since = None;
        stats.add_tag(AlertTag::ExtraVoice);
        Some(Alert::new(AlertKind::ExtraVoice, now))
    }
}
