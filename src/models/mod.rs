pub mod alert;
pub mod observation;
pub mod session;
pub mod stats;

pub use alert::{display_time, Alert, AlertKind, AlertTag, ObjectCategory, ObjectClass};
pub use observation::{BoundingBox, FaceBox, FrameObservation, ObjectDetection};
pub use session::{Session, SessionState};
pub use stats::SessionStats;
