//! Aggregates over a fetched log list.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::log::Log;

/// Summary statistics for a set of logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogStats {
    pub total: usize,
    pub processed: usize,
    pub with_attachments: usize,
    pub attachments: usize,
    pub summarized: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
    pub top_senders: Vec<(String, usize)>,
}

impl LogStats {
    /// Compute all aggregates for `logs`.
    pub fn compute(logs: &[Log], top_n: usize) -> Self {
        let range = received_range(logs);
        Self {
            total: logs.len(),
            processed: count_processed(logs),
            with_attachments: count_with_attachments(logs),
            attachments: count_attachments(logs),
            summarized: count_summarized(logs),
            oldest: range.map(|(min, _)| min),
            newest: range.map(|(_, max)| max),
            top_senders: top_senders(logs, top_n),
        }
    }

    /// Processed share in percent (0.0 for an empty set).
    pub fn processed_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 / self.total as f64 * 100.0
        }
    }
}

pub fn count_processed(logs: &[Log]) -> usize {
    logs.iter().filter(|l| l.processed).count()
}

pub fn count_with_attachments(logs: &[Log]) -> usize {
    logs.iter().filter(|l| l.has_attachments()).count()
}

/// Total number of attachment files across all logs.
pub fn count_attachments(logs: &[Log]) -> usize {
    logs.iter().map(Log::attachment_count).sum()
}

/// Logs with at least one summary entry.
pub fn count_summarized(logs: &[Log]) -> usize {
    logs.iter()
        .filter(|l| !l.summary_entries().is_empty())
        .count()
}

/// Oldest and newest `received_at`, ignoring values that do not parse.
pub fn received_range(logs: &[Log]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    logs.iter()
        .filter_map(Log::received_at_utc)
        .fold(None, |acc, ts| match acc {
            None => Some((ts, ts)),
            Some((min, max)) => Some((min.min(ts), max.max(ts))),
        })
}

/// Top N senders by message count; ties are broken alphabetically.
///
/// Senders are grouped by lowercased address, so `"Name <a@b>"` and `a@b`
/// count as one. The first spelling seen is the one reported.
pub fn top_senders(logs: &[Log], n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();
    for log in logs {
        let addr = log.sender_address();
        counts
            .entry(addr.key())
            .or_insert_with(|| (addr.display(), 0))
            .1 += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts.into_values().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::log::{Attachment, SummaryEntry};
    use chrono::TimeZone;

    fn log(id: i64, sender: &str, received_at: &str, processed: bool, files: usize) -> Log {
        let attachments: Vec<Attachment> = (0..files)
            .map(|i| Attachment {
                filename: format!("{id}_{i}.pdf"),
                content: String::new(),
            })
            .collect();
        let summary: Vec<SummaryEntry> = attachments
            .iter()
            .map(|a| SummaryEntry {
                file: a.filename.clone(),
                text: "riassunto".to_string(),
            })
            .collect();
        Log {
            id,
            subject: format!("subject {id}"),
            sender: sender.to_string(),
            body: String::new(),
            attachments: (files > 0).then_some(attachments),
            summary: (files > 0).then_some(summary),
            processed,
            received_at: received_at.to_string(),
        }
    }

    fn sample() -> Vec<Log> {
        vec![
            log(1, "Segreteria <segreteria@scuola.it>", "2024-10-02T10:00:00+02:00", true, 2),
            log(2, "segreteria@scuola.it", "2024-09-30T12:00:00Z", true, 1),
            log(3, "preside@scuola.it", "not a date", false, 0),
        ]
    }

    #[test]
    fn test_counts() {
        let logs = sample();
        assert_eq!(count_processed(&logs), 2);
        assert_eq!(count_with_attachments(&logs), 2);
        assert_eq!(count_attachments(&logs), 3);
        assert_eq!(count_summarized(&logs), 2);
    }

    #[test]
    fn test_received_range_skips_unparseable() {
        let (min, max) = received_range(&sample()).unwrap();
        assert_eq!(min, Utc.with_ymd_and_hms(2024, 9, 30, 12, 0, 0).unwrap());
        assert_eq!(max, Utc.with_ymd_and_hms(2024, 10, 2, 8, 0, 0).unwrap());
        assert!(received_range(&[]).is_none());
    }

    #[test]
    fn test_top_senders_groups_by_address() {
        let top = top_senders(&sample(), 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], ("Segreteria <segreteria@scuola.it>".to_string(), 2));
        assert_eq!(top[1], ("preside@scuola.it".to_string(), 1));
        assert_eq!(top_senders(&sample(), 1).len(), 1);
    }

    #[test]
    fn test_compute_empty() {
        let stats = LogStats::compute(&[], 5);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.processed_pct(), 0.0);
        assert!(stats.oldest.is_none());
        assert!(stats.top_senders.is_empty());
    }

    #[test]
    fn test_compute_sample() {
        let stats = LogStats::compute(&sample(), 5);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.processed, 2);
        assert!((stats.processed_pct() - 66.666).abs() < 0.01);
    }
}
