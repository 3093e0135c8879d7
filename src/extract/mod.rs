//! Filename metadata extraction.
//!
//! Guesses a document's type, number and display name from the filename it
//! was uploaded with. The guess only pre-fills the upload form; users can
//! edit every field before the document is stored.
//!
//! Extraction runs as a fixed pipeline of pure steps:
//! 1. [`strip_extension`] - drop the final `.ext`
//! 2. [`detect_prefix`] - map a leading type code (`KH`, `QĐ`, ...) to a label
//! 3. [`detect_number`] - pull out the first `123` or `45/2024` token
//! 4. [`clean_name`] - normalise whitespace and capitalise what remains

mod type_codes;

pub use type_codes::{label_for, type_labels, TYPE_CODES};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Name used when nothing is left of the filename after extraction.
pub const UNSPECIFIED_NAME: &str = "Không xác định";

static EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[^.]+$").unwrap());

static TYPE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-zĐđ]{1,4})\s+").unwrap());

static DOCUMENT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{1,6}(?:/[0-9]{2,4})?").unwrap());

/// Separator left behind once the number is cut out, e.g. the ` - ` in `CV 45 - Title`.
static LEADING_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-:–]+\s*").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Best-effort metadata guessed from a filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Category label, the raw uppercased code if unknown, or empty.
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Document number such as `123` or `45/2024`, or empty.
    pub number: String,
    /// Display name. Never empty.
    pub name: String,
}

/// Extract `{type, number, name}` from a bare filename (no directory part).
///
/// Never fails: unrecognisable input yields empty `doc_type`/`number` and
/// [`UNSPECIFIED_NAME`] as the name.
pub fn extract(file_name: &str) -> ExtractionResult {
    let base = strip_extension(file_name);
    let (doc_type, working) = detect_prefix(base);
    let (number, working) = detect_number(working);
    let name = clean_name(&working);

    ExtractionResult {
        doc_type,
        number,
        name,
    }
}

/// Remove the final extension (if any) and surrounding whitespace.
pub fn strip_extension(file_name: &str) -> &str {
    match EXTENSION.find(file_name) {
        Some(m) => file_name[..m.start()].trim(),
        None => file_name.trim(),
    }
}

/// Split a leading type code off `base`.
///
/// Returns the resolved type (label, raw uppercased code, or empty) and the
/// remaining text.
pub fn detect_prefix(base: &str) -> (String, &str) {
    let Some(caps) = TYPE_PREFIX.captures(base) else {
        return (String::new(), base);
    };

    let code = caps[1].to_uppercase();
    let doc_type = match label_for(&code) {
        Some(label) => label.to_string(),
        None => code,
    };
    let rest = base[caps[0].len()..].trim();

    (doc_type, rest)
}

/// Find the first document number in `working` and cut it out.
///
/// Returns the number (or empty) and the remaining text with any separator
/// that directly followed the number removed.
pub fn detect_number(working: &str) -> (String, String) {
    let Some(m) = DOCUMENT_NUMBER.find(working) else {
        return (String::new(), working.to_string());
    };

    let head = &working[..m.start()];
    let tail = LEADING_SEPARATOR.replace(&working[m.end()..], "$1");
    let rest = format!("{}{}", head, tail).trim().to_string();

    (m.as_str().to_string(), rest)
}

/// Collapse whitespace and uppercase the first character.
pub fn clean_name(working: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(working, " ");
    let name = collapsed.trim();

    if name.is_empty() {
        UNSPECIFIED_NAME.to_string()
    } else {
        capitalize_first(name)
    }
}

/// Uppercase only the first character, leaving the rest untouched.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
