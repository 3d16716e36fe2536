use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Object classes the classifier reacts to. Labels outside this set are
/// ignored, so a misspelled class never silently becomes a new throttle key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    CellPhone,
    Laptop,
    Computer,
    Book,
    Paper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectCategory {
    ElectronicDevice,
    ReadingMaterial,
}

impl ObjectClass {
    /// Parses a detector label. Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "cell phone" => Some(ObjectClass::CellPhone),
            "laptop" => Some(ObjectClass::Laptop),
            "computer" => Some(ObjectClass::Computer),
            "book" => Some(ObjectClass::Book),
            "paper" => Some(ObjectClass::Paper),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClass::CellPhone => "cell phone",
            ObjectClass::Laptop => "laptop",
            ObjectClass::Computer => "computer",
            ObjectClass::Book => "book",
            ObjectClass::Paper => "paper",
        }
    }

    pub fn category(&self) -> ObjectCategory {
        match self {
            ObjectClass::CellPhone | ObjectClass::Laptop | ObjectClass::Computer => {
                ObjectCategory::ElectronicDevice
            }
            ObjectClass::Book | ObjectClass::Paper => ObjectCategory::ReadingMaterial,
        }
    }
}

/// Normalized entries of `SessionStats::object_alert_types`.
///
/// `Monitor` and `Book` are never produced by the trackers but are accepted
/// from stored records so reports built from them stay complete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertTag {
    #[serde(rename = "absence")]
    Absence,
    #[serde(rename = "multiple faces")]
    MultipleFaces,
    #[serde(rename = "cell phone")]
    CellPhone,
    #[serde(rename = "laptop")]
    Laptop,
    #[serde(rename = "computer")]
    Computer,
    #[serde(rename = "monitor")]
    Monitor,
    #[serde(rename = "book")]
    Book,
    #[serde(rename = "notes")]
    Notes,
    #[serde(rename = "extra voice")]
    ExtraVoice,
}

impl AlertTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertTag::Absence => "absence",
            AlertTag::MultipleFaces => "multiple faces",
            AlertTag::CellPhone => "cell phone",
            AlertTag::Laptop => "laptop",
            AlertTag::Computer => "computer",
            AlertTag::Monitor => "monitor",
            AlertTag::Book => "book",
            AlertTag::Notes => "notes",
            AlertTag::ExtraVoice => "extra voice",
        }
    }

    /// Tag recorded when an alert for `class` is accepted.
    pub fn for_object(class: ObjectClass) -> Self {
        match class {
            ObjectClass::CellPhone => AlertTag::CellPhone,
            ObjectClass::Laptop => AlertTag::Laptop,
            ObjectClass::Computer => AlertTag::Computer,
            ObjectClass::Book | ObjectClass::Paper => AlertTag::Notes,
        }
    }
}

/// What an alert is about. Drives the message text and lets the
/// presentation layer pick an icon without re-parsing messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum AlertKind {
    Absence,
    MultipleFaces { count: usize },
    ElectronicDevice { class: ObjectClass },
    ReadingMaterial,
    ExtraVoice,
    MediaFailure,
}

impl AlertKind {
    pub fn message(&self) -> String {
        match self {
            AlertKind::Absence => "No face detected for >10 seconds".to_string(),
            AlertKind::MultipleFaces { count } => format!("Multiple faces ({count}) detected"),
            AlertKind::ElectronicDevice { class } => {
                format!("Electronic device ({}) detected", class.as_str())
            }
            AlertKind::ReadingMaterial => "Book/paper detected".to_string(),
            AlertKind::ExtraVoice => "Extra voice detected".to_string(),
            AlertKind::MediaFailure => "Webcam or microphone access denied or error.".to_string(),
        }
    }
}

/// An accepted alert. Immutable once created; the alert log only grows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    /// Wall-clock display time (local `HH:MM:SS`).
    pub timestamp: String,
    pub emitted_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(kind: AlertKind, emitted_at: DateTime<Utc>) -> Self {
        Self {
            message: kind.message(),
            timestamp: display_time(emitted_at),
            kind,
            emitted_at,
        }
    }
}

pub fn display_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}
