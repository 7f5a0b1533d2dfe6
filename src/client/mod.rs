//! HTTP access to the mail-log backend.

pub mod logs;

pub use logs::{fetch_logs, LogsClient};
