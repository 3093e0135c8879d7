//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Askama provides compile-time verification that templates are valid.

use askama::Template;

use crate::models::Document;

/// Helper struct for document rows in the table.
pub struct DocumentRow {
    pub id: i64,
    pub number: String,
    pub doc_type: String,
    pub name: String,
    pub file_path: String,
    pub issued_str: String,
    pub created_str: String,
    pub size_str: String,
}

impl DocumentRow {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id,
            number: doc.number.clone(),
            doc_type: doc.doc_type.clone(),
            name: doc.name.clone(),
            file_path: doc.file_path.clone(),
            issued_str: doc
                .issued_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "-".to_string()),
            created_str: doc.created_at.format("%d/%m/%Y").to_string(),
            size_str: format_size(doc.file_size),
        }
    }
}

/// Sidebar entry for one issue year (or the undated bucket).
pub struct YearLink {
    pub label: String,
    pub href: String,
    pub count: usize,
    pub active: bool,
}

/// Option of the type filter dropdown.
pub struct TypeOption {
    pub doc_type: String,
    pub count: usize,
    pub selected: bool,
}

/// Sortable column header.
pub struct SortHeader {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
    pub ascending: bool,
}

/// Main browse page with filters.
#[derive(Template)]
#[template(path = "browse.html")]
pub struct BrowseTemplate<'a> {
    pub title: &'a str,
    pub heading: String,
    pub total_all: usize,
    pub all_href: String,
    pub all_active: bool,
    pub years: Vec<YearLink>,
    pub type_options: Vec<TypeOption>,
    pub type_total: usize,
    pub q: String,
    pub year_val: String,
    pub date_from: String,
    pub date_to: String,
    pub sort_val: String,
    pub order_val: String,
    pub headers: Vec<SortHeader>,
    pub documents: Vec<DocumentRow>,
    pub page: usize,
    pub total_pages: usize,
    pub has_pagination: bool,
    pub has_prev: bool,
    pub prev_href: String,
    pub has_next: bool,
    pub next_href: String,
    pub type_labels: Vec<&'static str>,
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

/// Human-readable byte count.
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes.max(0) as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes.max(0), UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_document_row_dates() {
        let doc = Document {
            id: 3,
            number: "45/2024".to_string(),
            doc_type: "Công văn".to_string(),
            name: "Hướng dẫn".to_string(),
            file_path: "/uploads/x.pdf".to_string(),
            issued_date: NaiveDate::from_ymd_opt(2024, 3, 9),
            created_at: Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap(),
            file_size: 2048,
            file_name_original: "CV 45.pdf".to_string(),
        };

        let row = DocumentRow::from_document(&doc);
        assert_eq!(row.issued_str, "09/03/2024");
        assert_eq!(row.created_str, "01/04/2024");
        assert_eq!(row.size_str, "2.0 KB");

        let undated = Document {
            issued_date: None,
            ..doc
        };
        assert_eq!(DocumentRow::from_document(&undated).issued_str, "-");
    }

    #[test]
    fn test_error_template_escapes() {
        let html = ErrorTemplate {
            title: "Lỗi",
            message: "<script>",
        }
        .render()
        .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
