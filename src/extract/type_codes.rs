//! Canonical table of document type codes.
//!
//! Official documents are conventionally named with a short code in front
//! (`KH 12 ...`, `QĐ 7/24 ...`). The code identifies the document category.

/// Code → label pairs. `QD` and `QĐ` are both accepted for decisions.
pub const TYPE_CODES: &[(&str, &str)] = &[
    ("KH", "Kế hoạch"),
    ("QD", "Quyết định"),
    ("QĐ", "Quyết định"),
    ("CV", "Công văn"),
    ("TT", "Thông tư"),
    ("VB", "Văn bản"),
    ("BC", "Báo cáo"),
    ("HD", "Hướng dẫn"),
    ("TB", "Thông báo"),
    ("ND", "Nghị định"),
];

/// Look up the label for an already-uppercased code.
pub fn label_for(code: &str) -> Option<&'static str> {
    TYPE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Distinct labels in table order, for form suggestions.
pub fn type_labels() -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = Vec::with_capacity(TYPE_CODES.len());
    for (_, label) in TYPE_CODES {
        if !labels.contains(label) {
            labels.push(label);
        }
    }
    labels
}
