//! Export logs as plain text files.

use std::path::{Path, PathBuf};

use crate::error::{MaillogError, Result};
use crate::i18n;
use crate::model::log::Log;

use super::sanitize_filename_part;

/// Render a single log as a plain-text document: headers, body, attachments, summaries.
pub fn render_text(log: &Log) -> String {
    let mut content = String::new();

    content.push_str(&format!("Id:       {}\n", log.id));
    content.push_str(&format!("Date:     {}\n", log.received_at));
    content.push_str(&format!("From:     {}\n", log.sender_address().display()));
    content.push_str(&format!("Subject:  {}\n", log.subject));
    content.push_str(&format!("Processed: {}\n", log.processed));
    content.push_str(&format!("\n{}\n", "-".repeat(72)));

    if !log.body.is_empty() {
        content.push('\n');
        content.push_str(&log.body);
        content.push('\n');
    }

    let attachments = log.attachment_list();
    if !attachments.is_empty() {
        content.push_str(&format!(
            "\n[{}: {}]\n",
            i18n::label_attachments(),
            attachments.len()
        ));
        for att in attachments {
            let size = humansize::format_size(att.content.len(), humansize::BINARY);
            content.push_str(&format!("  - {} ({size})\n", att.filename));
        }
    }

    let summary = log.summary_entries();
    if !summary.is_empty() {
        content.push_str(&format!("\n[{}]\n", i18n::label_summary()));
        for entry in summary {
            content.push_str(&format!("  {}: {}\n", entry.file, entry.text));
        }
    }

    content
}

/// Export a single log as `{id}_{subject}.txt` inside `output_dir`.
pub fn export_text(log: &Log, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(text_filename(log));
    std::fs::write(&path, render_text(log)).map_err(|e| MaillogError::io(&path, e))?;
    Ok(path)
}

/// Export several logs; the callback receives `(current, total)`.
pub fn export_multiple_text(
    logs: &[&Log],
    output_dir: &Path,
    progress: &dyn Fn(usize, usize),
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|e| MaillogError::io(output_dir, e))?;
    let total = logs.len();
    let mut paths = Vec::with_capacity(total);

    for (i, log) in logs.iter().enumerate() {
        progress(i, total);
        paths.push(export_text(log, output_dir)?);
    }
    progress(total, total);

    Ok(paths)
}

fn text_filename(log: &Log) -> String {
    format!("{}_{}.txt", log.id, sanitize_filename_part(&log.subject, 80))
}
