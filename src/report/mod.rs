pub mod compiler;
pub mod scoring;

pub use compiler::{compile_report, feedback_for, format_duration, ReportAlert, SessionReport};
pub use scoring::integrity_score;
