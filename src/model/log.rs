//! The `Log` record and its attachment/summary sub-records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::EmailAddress;

/// A processed inbound message as stored by the backend.
///
/// Field names match the backend's JSON exactly. `received_at` is kept as the
/// backend sent it; use [`Log::received_at_utc`] for a parsed timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    /// Backend-assigned identifier.
    pub id: i64,

    /// Decoded subject line.
    pub subject: String,

    /// Raw `From` header value.
    pub sender: String,

    /// Plain-text body.
    pub body: String,

    /// Saved attachments. `None` when the message had none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,

    /// Per-attachment summaries produced by the backend's summarizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<SummaryEntry>>,

    /// Whether backend processing has completed.
    pub processed: bool,

    /// Arrival time, verbatim.
    pub received_at: String,
}

/// An attachment saved by the backend's mail monitor.
///
/// The monitor writes `{"file": name}`; later schema revisions use
/// `{"filename": name, "content": text}`. Both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Sanitized filename on the backend host.
    #[serde(alias = "file")]
    pub filename: String,

    /// Extracted content, empty if the backend did not include it.
    #[serde(default)]
    pub content: String,
}

/// Summary text generated for one attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// Attachment filename the summary refers to.
    pub file: String,
    /// Generated summary.
    pub text: String,
}

impl Log {
    /// Parsed sender mailbox.
    pub fn sender_address(&self) -> EmailAddress {
        EmailAddress::parse(&self.sender)
    }

    /// `received_at` as a UTC timestamp, if it is in a recognizable ISO-8601 form.
    pub fn received_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.received_at)
    }

    pub fn has_attachments(&self) -> bool {
        self.attachment_count() > 0
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.as_ref().map_or(0, Vec::len)
    }

    /// Attachments as a slice; empty when absent.
    pub fn attachment_list(&self) -> &[Attachment] {
        self.attachments.as_deref().unwrap_or(&[])
    }

    /// Summary entries as a slice; empty when absent.
    pub fn summary_entries(&self) -> &[SummaryEntry] {
        self.summary.as_deref().unwrap_or(&[])
    }

    /// Summary generated for the given attachment, if any.
    pub fn summary_for(&self, filename: &str) -> Option<&SummaryEntry> {
        self.summary_entries().iter().find(|s| s.file == filename)
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Offset-aware RFC 3339 values are converted to UTC; naive values
/// (`T` or space separated, optional fractional seconds) are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
