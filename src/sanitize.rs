//! Label sanitizing
//!
//! Transforms applied to label text right before it enters an encoder: quoting
//! rules of each output format, restoration of the empty-value placeholder, and
//! the buffer-wide quote escaping expected by the consumer of DOT/JSON streams.
use crate::constants::{PLACEHOLDER_LABEL, RESTORED_LABEL};
use crate::errors::ExportError;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Token used upstream to stand in for an empty CSV field.
pub const PLACEHOLDER_TOKEN: &str = "_";

/// Back-quote the characters that would break a double quoted DOT string.
pub fn escape_dot(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '%' => out.push_str("\\%"),
            '\u{1E}' => out.push_str("\\u001E"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for the inside of a JSON string literal.
pub fn escape_json(text: &str) -> String {
    let quoted = Value::String(text.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Rewrite the placeholder edge label `= _` back to a blank value.
///
/// Only an exact match is rewritten.
pub fn restore_placeholder(text: &str) -> Cow<'_, str> {
    if text == PLACEHOLDER_LABEL {
        Cow::Borrowed(RESTORED_LABEL)
    } else {
        Cow::Borrowed(text)
    }
}

/// Replace every empty field of a CSV row with [`PLACEHOLDER_TOKEN`].
///
/// Whitespace around separators is removed first. A row that already contains
/// the placeholder as a value is rejected.
///
/// * `line` - The raw CSV row.
/// * `line_number` - 1-based line number, used for error reporting.
pub fn mark_empty_fields(line: &str, line_number: usize) -> Result<String, ExportError> {
    let fields: Vec<&str> = line.trim().split(',').map(|f| f.trim()).collect();
    if fields.iter().any(|f| *f == PLACEHOLDER_TOKEN) {
        return Err(ExportError::PlaceholderConflict { line: line_number });
    }
    if fields.len() == 1 {
        return Ok(fields[0].to_string());
    }
    Ok(fields
        .iter()
        .map(|f| if f.is_empty() { PLACEHOLDER_TOKEN } else { *f })
        .collect::<Vec<_>>()
        .join(","))
}

/// Apply [`mark_empty_fields`] to every line of a CSV document.
pub fn mark_empty_rows(text: &str) -> Result<String, ExportError> {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        out += mark_empty_fields(line, i + 1)?.as_str();
        out.push('\n');
    }
    Ok(out)
}

/// Quote escaping applied once to a whole DOT or JSON buffer before it is written.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PlatformEscaping {
    /// Leave the buffer untouched.
    #[default]
    None,
    /// Double every quote (`""`), as cmd.exe style consumers expect.
    Windows,
    /// Backslash every quote (`\"`).
    Posix,
}

impl PlatformEscaping {
    /// Parse an escaping convention, falling back to [`PlatformEscaping::Posix`].
    pub fn parse_or_fallback(s: &str) -> Self {
        match s.parse::<PlatformEscaping>() {
            Ok(escaping) => escaping,
            Err(e) => {
                warn!("{} Falling back to backslash escaping.", e);
                PlatformEscaping::Posix
            }
        }
    }

    pub fn apply(&self, buffer: String) -> String {
        match self {
            PlatformEscaping::None => buffer,
            PlatformEscaping::Windows => buffer.replace('"', "\"\""),
            PlatformEscaping::Posix => buffer.replace('"', "\\\""),
        }
    }
}

impl FromStr for PlatformEscaping {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(PlatformEscaping::None),
            "windows" => Ok(PlatformEscaping::Windows),
            "posix" => Ok(PlatformEscaping::Posix),
            _ => Err(ExportError::UnsupportedPlatformEscaping(s.to_string())),
        }
    }
}

impl fmt::Display for PlatformEscaping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            PlatformEscaping::None => "none",
            PlatformEscaping::Windows => "windows",
            PlatformEscaping::Posix => "posix",
        };
        write!(f, "{}", s)
    }
}
