//! Export logs as a JSON array of `Log` records.
//!
//! Attachments are written in the normalized `{filename, content}` form, so a
//! monitor-style `{"file": name}` entry comes out as `{"filename": name, "content": ""}`.

use std::path::Path;

use crate::error::{MaillogError, Result};
use crate::model::log::Log;

/// Write `logs` as a pretty-printed JSON array.
///
/// The file parses back into the same `Vec<Log>`, though not byte-for-byte
/// into the backend's original response.
pub fn export_json(logs: &[&Log], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(logs)
        .map_err(|e| MaillogError::ExportError(format!("serializing logs: {e}")))?;
    std::fs::write(output_path, json).map_err(|e| MaillogError::io(output_path, e))?;
    tracing::info!(path = %output_path.display(), count = logs.len(), "Wrote JSON export");
    Ok(())
}
