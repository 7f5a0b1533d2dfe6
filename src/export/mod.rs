//! Export functionality: CSV, JSON and plain text.

pub mod csv;
pub mod json;
pub mod text;

use std::str::FromStr;

use crate::error::MaillogError;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One CSV file with a row per log.
    Csv,
    /// One JSON file, same shape as the backend response.
    Json,
    /// One `.txt` file per log inside a directory.
    Text,
}

impl FromStr for ExportFormat {
    type Err = MaillogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Text),
            _ => Err(MaillogError::UnknownFormat(s.to_string())),
        }
    }
}

/// Reduce a string to characters safe in a filename, capped at `max_len` chars.
pub fn sanitize_filename_part(s: &str, max_len: usize) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(max_len)
        .collect();

    if sanitized.is_empty() {
        "untitled".to_string()
    } else {
        sanitized
    }
}
