pub mod connection;
pub mod helpers;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod store;

pub use connection::Database;
pub use models::{LogAlert, LogRecord};
pub use store::LogStore;
