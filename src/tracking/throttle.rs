use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::ObjectClass;

/// Alert categories that share a cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrottleKey {
    MultipleFaces,
    Object(ObjectClass),
    ExtraVoice,
}

impl ThrottleKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThrottleKey::MultipleFaces => "multiple_faces",
            ThrottleKey::Object(class) => class.as_str(),
            ThrottleKey::ExtraVoice => "extra_voice",
        }
    }
}

/// Last-emission store. Lives for one session; key cardinality is bounded by
/// `ThrottleKey`, so nothing is ever evicted.
#[derive(Debug, Default, Clone)]
pub struct ThrottleTable {
    last_emitted: HashMap<ThrottleKey, DateTime<Utc>>,
}

impl ThrottleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and records `now` iff `key` never fired or its last
    /// emission is at least `cooldown_ms` old.
    pub fn try_fire(&mut self, key: ThrottleKey, now: DateTime<Utc>, cooldown_ms: i64) -> bool {
        if let Some(last) = self.last_emitted.get(&key) {
            if (now - *last).num_milliseconds() < cooldown_ms {
                return false;
            }
        }
        self.last_emitted.insert(key, now);
        true
    }

    pub fn last_emitted(&self, key: ThrottleKey) -> Option<DateTime<Utc>> {
        self.last_emitted.get(&key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.last_emitted.is_empty()
    }
}
