//! Client-side selection over fetched logs.
//!
//! Filtering never reorders: the output keeps the backend's order.

use crate::model::log::Log;

/// Criteria ANDed together. `None` fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Keep only processed (`true`) or unprocessed (`false`) logs.
    pub processed: Option<bool>,
    /// Case-insensitive substring of the raw sender.
    pub sender: Option<String>,
    /// Case-insensitive substring of the subject.
    pub subject: Option<String>,
    /// Keep only logs with (`true`) or without (`false`) attachments.
    pub has_attachments: Option<bool>,
    /// Case-insensitive substring of subject, body or any summary text.
    pub text: Option<String>,
}

impl LogFilter {
    /// Filter selecting logs the backend has not processed yet.
    pub fn unprocessed() -> Self {
        Self {
            processed: Some(false),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Return references to matching logs, in input order.
    pub fn apply<'a>(&self, logs: &'a [Log]) -> Vec<&'a Log> {
        logs.iter().filter(|log| self.matches(log)).collect()
    }

    pub fn matches(&self, log: &Log) -> bool {
        if let Some(want) = self.processed {
            if log.processed != want {
                return false;
            }
        }

        if let Some(want) = self.has_attachments {
            if log.has_attachments() != want {
                return false;
            }
        }

        if let Some(ref needle) = self.sender {
            if !contains_ci(&log.sender, needle) {
                return false;
            }
        }

        if let Some(ref needle) = self.subject {
            if !contains_ci(&log.subject, needle) {
                return false;
            }
        }

        if let Some(ref needle) = self.text {
            let hit = contains_ci(&log.subject, needle)
                || contains_ci(&log.body, needle)
                || log
                    .summary_entries()
                    .iter()
                    .any(|s| contains_ci(&s.text, needle));
            if !hit {
                return false;
            }
        }

        true
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
