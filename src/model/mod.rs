//! Data model for the records served by the mail-log backend.

pub mod address;
pub mod log;
