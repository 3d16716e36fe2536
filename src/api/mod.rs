pub mod logs;

pub use logs::{get_logs, post_log, ApiReply, ListLogsResponse, SaveLogResponse};
