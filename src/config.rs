use serde::{Deserialize, Serialize};

/// What a tick does when capture or a detector call fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TickFaultPolicy {
    /// Drop the tick's results and schedule the next one.
    #[default]
    SkipTick,
    /// End the sampling loop; stats collected so far are kept until `stop()`.
    AbortSession,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VoiceConfig {
    pub enabled: bool,
    /// Normalized audio level (0..1) treated as speech.
    pub level_threshold: f32,
    /// How long the level must stay above threshold before alerting.
    pub sustain_ms: i64,
    pub cooldown_ms: i64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level_threshold: 0.6,
            sustain_ms: 3_000,
            cooldown_ms: 10_000,
        }
    }
}

/// Tunable thresholds for the observation-to-alert engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Continuous zero-face time before an absence alert
    pub absence_threshold_ms: i64,

    /// Minimum gap between two alerts sharing a throttle key
    pub throttle_cooldown_ms: i64,

    /// Object detections scoring below this are ignored
    pub min_detection_score: f32,

    /// Working buffer handed to the detectors
    pub frame_width: u32,
    pub frame_height: u32,

    /// Nominal tick cadence; slow detectors stretch it
    pub frame_interval_ms: u64,

    pub fault_policy: TickFaultPolicy,

    pub voice: VoiceConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            absence_threshold_ms: 10_000,
            throttle_cooldown_ms: 500,
            min_detection_score: 0.5,
            frame_width: 320,
            frame_height: 240,
            frame_interval_ms: 16,
            fault_policy: TickFaultPolicy::SkipTick,
            voice: VoiceConfig::default(),
        }
    }
}

/// `PROCTORWATCH_DEBUG=1` (or `true`) turns on per-tick logging.
pub fn debug_mode() -> bool {
    std::env::var("PROCTORWATCH_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"throttleCooldownMs": 750, "voice": {"enabled": true}}"#)
                .unwrap();
        assert_eq!(config.throttle_cooldown_ms, 750);
        assert_eq!(config.absence_threshold_ms, 10_000);
        assert!(config.voice.enabled);
        assert_eq!(config.voice.sustain_ms, 3_000);
        assert_eq!(config.fault_policy, TickFaultPolicy::SkipTick);
    }
}
