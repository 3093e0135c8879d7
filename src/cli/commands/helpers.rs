//! Shared helper functions for CLI commands.

use console::{pad_str, Alignment};

use crate::models::Document;

/// Pad or truncate to a display width, counting wide characters correctly.
pub fn cell(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Left, Some("…")).into_owned()
}

/// One table line for a document.
pub fn document_line(doc: &Document) -> String {
    let issued = doc
        .issued_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:>5}  {}  {}  {}  {}",
        doc.id,
        cell(&doc.number, 10),
        cell(&doc.doc_type, 12),
        cell(&doc.name, 40),
        issued
    )
}
