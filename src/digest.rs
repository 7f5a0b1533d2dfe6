//! Digest rendering: the summary e-mail sent out for a processed log.
//!
//! ```text
//! Subject: Riassunto Circolare: <original subject>
//!
//! <original body>
//!
//! Allegato 1: <summary of first attachment>
//! Allegato 2: ...
//! ```

use serde::Serialize;

use crate::i18n::{self, Lang};
use crate::model::log::Log;

/// Rendered digest ready to be shown or mailed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

/// Render the digest for `log` in the given language.
///
/// Summary lines are numbered from 1 in the order the backend returned them.
/// A log without summary entries keeps its body unchanged; the backend's
/// sender still appends a blank line (`body + "\n\n"`) in that case.
pub fn render(log: &Log, lang: Lang) -> Digest {
    let subject = format!("{}: {}", i18n::digest_subject_prefix(lang), log.subject);

    let label = i18n::digest_attachment_label(lang);
    let lines: Vec<String> = log
        .summary_entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{label} {}: {}", i + 1, entry.text))
        .collect();

    let body = if lines.is_empty() {
        log.body.clone()
    } else {
        format!("{}\n\n{}", log.body, lines.join("\n"))
    };

    Digest { subject, body }
}
