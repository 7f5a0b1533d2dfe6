//! Sender address parsing (RFC 5322 §3.4 mailbox form).
//!
//! The backend stores the raw `From` header verbatim, so the same sender can
//! show up as `"Segreteria <segreteria@scuola.it>"` or `segreteria@scuola.it`.

/// A parsed mailbox.
///
/// # Examples
/// - `"Segreteria Didattica <segreteria@scuola.it>"` → `display_name = "Segreteria Didattica"`
/// - `"segreteria@scuola.it"` → `display_name = ""`, `address = "segreteria@scuola.it"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EmailAddress {
    /// Human-readable display name (may be empty).
    pub display_name: String,
    /// The bare address (`user@domain`), or the raw input if no address was found.
    pub address: String,
}

impl EmailAddress {
    /// Parse a single mailbox from a header value.
    ///
    /// If no angle-bracketed address is present the trimmed input becomes the address.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let (Some(open), Some(close)) = (trimmed.rfind('<'), trimmed.rfind('>')) {
            if close > open {
                return Self {
                    display_name: strip_quotes(&trimmed[..open]),
                    address: trimmed[open + 1..close].trim().to_string(),
                };
            }
        }

        Self {
            display_name: String::new(),
            address: trimmed.to_string(),
        }
    }

    /// Lowercased address, used to group the same sender across spellings.
    pub fn key(&self) -> String {
        self.address.to_lowercase()
    }

    /// `"Display Name <address>"` or just `"address"`.
    pub fn display(&self) -> String {
        if self.display_name.is_empty() {
            self.address.clone()
        } else {
            format!("{} <{}>", self.display_name, self.address)
        }
    }

    /// Display name if present, otherwise the address. Used in narrow table columns.
    pub fn short(&self) -> &str {
        if self.display_name.is_empty() {
            &self.address
        } else {
            &self.display_name
        }
    }
}

fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}
