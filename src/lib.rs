//! `maillog` — client for the mail-log backend.
//!
//! This crate fetches the backend's `Log` records (processed inbound
//! e-mails with their attachments and generated summaries) and provides
//! read-only views over them: filtering, statistics, digests and exports.

pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod export;
pub mod filter;
pub mod i18n;
pub mod model;
pub mod stats;
