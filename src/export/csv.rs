//! Export log summaries to CSV.
//!
//! Output is UTF-8 with BOM for Excel compatibility.

use std::io::Write;
use std::path::Path;

use crate::error::{MaillogError, Result};
use crate::model::log::Log;

const HEADER: [&str; 7] = [
    "Id",
    "Received_At",
    "Sender",
    "Subject",
    "Processed",
    "Attachments",
    "Summarized",
];

/// Export a list of logs to a CSV file.
///
/// Columns: Id, Received_At, Sender, Subject, Processed, Attachments, Summarized.
/// `Attachments` lists filenames joined with `"; "`.
pub fn export_csv(logs: &[&Log], output_path: &Path, separator: char) -> Result<()> {
    let mut out = Vec::new();
    out.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
    write_csv(&mut out, logs, separator).map_err(|e| MaillogError::io(output_path, e))?;
    std::fs::write(output_path, out).map_err(|e| MaillogError::io(output_path, e))?;
    tracing::info!(path = %output_path.display(), rows = logs.len(), "Wrote CSV export");
    Ok(())
}

/// Write header and rows (no BOM) to any writer.
pub fn write_csv<W: Write>(w: &mut W, logs: &[&Log], separator: char) -> std::io::Result<()> {
    let sep = separator.to_string();
    writeln!(w, "{}", HEADER.join(&sep))?;

    for log in logs {
        let files = log
            .attachment_list()
            .iter()
            .map(|a| a.filename.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let fields = [
            log.id.to_string(),
            csv_escape(&log.received_at, separator),
            csv_escape(&log.sender, separator),
            csv_escape(&log.subject, separator),
            log.processed.to_string(),
            csv_escape(&files, separator),
            (!log.summary_entries().is_empty()).to_string(),
        ];
        writeln!(w, "{}", fields.join(&sep))?;
    }

    Ok(())
}

/// Escape a value for CSV (RFC 4180).
///
/// Wraps in double quotes if the value contains the separator, quotes, or newlines.
fn csv_escape(value: &str, separator: char) -> String {
    if value.contains(separator) || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
