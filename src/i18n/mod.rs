//! Internationalization (i18n) module.
//!
//! Provides localized strings for CLI output and rendered digests.
//! English is the default; Italian matches the language of the digests the
//! backend mails out.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Italian
    It,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "it", "en_US", "it_IT.UTF-8").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-', '.']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "it" => Some(Self::It),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::It => "it",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from `MAILLOG_LANG`, then `LC_MESSAGES` / `LANG`.
pub fn detect_system_lang() -> Lang {
    ["MAILLOG_LANG", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|var| std::env::var(var).ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Defines a function returning the string for the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $it:expr) => {
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::It => $it,
            }
        }
    };
}

/// Same as `msg!` but for an explicit language, used where output must not
/// depend on process-global state.
macro_rules! msg_for {
    ($name:ident, $en:expr, $it:expr) => {
        pub fn $name(lang: Lang) -> &'static str {
            match lang {
                Lang::En => $en,
                Lang::It => $it,
            }
        }
    };
}

// ── CLI ──────────────────────────────────────────────────────────

msg!(
    app_about,
    "maillog \u{2014} client for the mail-log backend. Fetch processed e-mails, inspect attachment summaries and export them.",
    "maillog \u{2014} client per il backend dei log di posta. Scarica le e-mail elaborate, consulta i riassunti degli allegati ed esportali."
);
msg!(msg_fetching, "Fetching logs...", "Scaricamento dei log...");
msg!(msg_results, "log(s)", "log");
msg!(msg_no_logs, "No logs found", "Nessun log trovato");
msg!(msg_total, "Logs", "Log");
msg!(msg_processed, "Processed", "Elaborati");
msg!(msg_with_attachments, "With attachments", "Con allegati");
msg!(msg_attachment_files, "Attachment files", "File allegati");
msg!(msg_summarized, "Summarized", "Riassunti");
msg!(msg_date_range, "Received", "Ricevuti");
msg!(msg_top_senders, "Top senders", "Mittenti principali");
msg!(msg_exported, "Exported", "Esportati");

// ── Table / record headers ───────────────────────────────────────

msg!(col_received, "Received", "Ricevuto");
msg!(col_sender, "From", "Da");
msg!(col_subject, "Subject", "Oggetto");
msg!(col_attachments, "Att", "All");
msg!(col_processed, "Done", "Fatto");
msg!(label_attachments, "Attachments", "Allegati");
msg!(label_summary, "Summary", "Riassunto");

// ── Digest ───────────────────────────────────────────────────────

msg_for!(digest_subject_prefix, "Circular summary", "Riassunto Circolare");
msg_for!(digest_attachment_label, "Attachment", "Allegato");
