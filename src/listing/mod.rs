//! Filtering, sorting and pagination of the document table.
//!
//! The register is small enough to filter in memory: the repository returns
//! every row and these functions narrow it down for display.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::extract::UNSPECIFIED_NAME;
use crate::models::Document;

/// Rows per page in the browse table.
pub const PER_PAGE: usize = 10;

/// Column the table is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Number,
    Type,
    Name,
    IssuedDate,
    #[default]
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Number,
        SortField::Type,
        SortField::Name,
        SortField::IssuedDate,
        SortField::CreatedAt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Type => "type",
            Self::Name => "name",
            Self::IssuedDate => "issued_date",
            Self::CreatedAt => "created_at",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    /// Lowercased text the column compares by. Missing values compare as "".
    fn key(&self, doc: &Document) -> String {
        match self {
            Self::Number => doc.number.to_lowercase(),
            Self::Type => doc.doc_type.to_lowercase(),
            Self::Name => doc.name.to_lowercase(),
            Self::IssuedDate => doc
                .issued_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            Self::CreatedAt => doc
                .created_at
                .to_rfc3339_opts(SecondsFormat::Micros, true)
                .to_lowercase(),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Column and direction. Defaults to newest upload first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Sort that results from clicking the `field` column header.
    ///
    /// Clicking the column currently sorted ascending flips it to descending;
    /// any other click sorts ascending.
    pub fn toggle(self, field: SortField) -> Sort {
        let order = if self.field == field && self.order == SortOrder::Asc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        Sort { field, order }
    }
}

/// Issue-year bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    Year(i32),
    /// Documents without an issue date.
    Unknown,
}

impl YearFilter {
    /// Parse `unknown` (or the legacy `0`) or a year number.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "unknown" | "0" => Some(Self::Unknown),
            other => other.parse().ok().map(Self::Year),
        }
    }

    /// Value used in query strings.
    pub fn as_param(&self) -> String {
        match self {
            Self::Year(y) => y.to_string(),
            Self::Unknown => "unknown".to_string(),
        }
    }

    /// Sidebar label.
    pub fn label(&self) -> String {
        match self {
            Self::Year(y) => format!("Năm {}", y),
            Self::Unknown => UNSPECIFIED_NAME.to_string(),
        }
    }

    fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Year(y) => doc.issued_year() == Some(*y),
            Self::Unknown => doc.issued_date.is_none(),
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_param())
    }
}

/// Filters and ordering for the document table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Case-insensitive search over number, type and name.
    pub q: Option<String>,
    /// Exact type label.
    pub doc_type: Option<String>,
    pub year: Option<YearFilter>,
    /// Inclusive lower bound on the issue date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the issue date.
    pub date_to: Option<NaiveDate>,
    pub sort: Sort,
}

impl ListQuery {
    /// Whether a document passes every filter.
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(year) = &self.year {
            if !year.matches(doc) {
                return false;
            }
        }

        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            let q = q.to_lowercase();
            let hit = doc.number.to_lowercase().contains(&q)
                || doc.doc_type.to_lowercase().contains(&q)
                || doc.name.to_lowercase().contains(&q);
            if !hit {
                return false;
            }
        }

        if let Some(doc_type) = self.doc_type.as_deref().filter(|t| !t.is_empty()) {
            if doc.doc_type != doc_type {
                return false;
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(issued) = doc.issued_date else {
                return false;
            };
            if self.date_from.is_some_and(|from| issued < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| issued > to) {
                return false;
            }
        }

        true
    }

    /// Filter and sort `docs`.
    pub fn apply(&self, docs: &[Document]) -> Vec<Document> {
        let mut result: Vec<Document> = docs.iter().filter(|d| self.matches(d)).cloned().collect();
        sort_documents(&mut result, self.sort);
        result
    }
}

/// Stable sort by the lowercased text of the sort column.
pub fn sort_documents(docs: &mut [Document], sort: Sort) {
    match sort.order {
        SortOrder::Asc => docs.sort_by_cached_key(|d| sort.field.key(d)),
        SortOrder::Desc => docs.sort_by_cached_key(|d| Reverse(sort.field.key(d))),
    }
}

/// Distinct issue years, newest first, then `Unknown` if any document lacks a date.
pub fn years(docs: &[Document]) -> Vec<YearFilter> {
    let mut years: Vec<i32> = docs.iter().filter_map(|d| d.issued_year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();

    let mut result: Vec<YearFilter> = years.into_iter().map(YearFilter::Year).collect();
    if docs.iter().any(|d| d.issued_date.is_none()) {
        result.push(YearFilter::Unknown);
    }
    result
}

/// Number of documents per type label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub count: usize,
}

/// Count documents per type, sorted by type (code point order). Blank types
/// count as unspecified.
pub fn type_counts(docs: &[Document]) -> Vec<TypeCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for doc in docs {
        let key = if doc.doc_type.is_empty() {
            UNSPECIFIED_NAME.to_string()
        } else {
            doc.doc_type.clone()
        };
        *counts.entry(key).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(doc_type, count)| TypeCount { doc_type, count })
        .collect()
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page number, clamped to the available pages.
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice out page `page` (1-indexed) of `items`.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * per_page;

    let items = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn doc(id: i64, number: &str, doc_type: &str, name: &str, issued: Option<&str>) -> Document {
        Document {
            id,
            number: number.to_string(),
            doc_type: doc_type.to_string(),
            name: name.to_string(),
            file_path: format!("/uploads/{}.pdf", id),
            issued_date: issued.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, id as u32).unwrap(),
            file_size: 0,
            file_name_original: String::new(),
        }
    }

    fn sample() -> Vec<Document> {
        vec![
            doc(1, "12", "Kế hoạch", "Kế hoạch công tác", Some("2024-03-01")),
            doc(2, "45/2024", "Công văn", "Hướng dẫn tuyển sinh", Some("2023-11-20")),
            doc(3, "7", "Quyết định", "Nghỉ lễ", None),
            doc(4, "3", "Công văn", "báo cáo quý", Some("2024-07-15")),
        ]
    }

    fn ids(docs: &[Document]) -> Vec<i64> {
        docs.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_default_sort_newest_first() {
        let result = ListQuery::default().apply(&sample());
        assert_eq!(ids(&result), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_fields() {
        let query = ListQuery {
            q: Some("CÔNG".to_string()),
            ..Default::default()
        };
        // Matches type "Công văn" (2, 4) and name "Kế hoạch công tác" (1).
        let mut found = ids(&query.apply(&sample()));
        found.sort();
        assert_eq!(found, vec![1, 2, 4]);

        let query = ListQuery {
            q: Some("45/20".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec![2]);
    }

    #[test]
    fn test_type_filter_exact() {
        let query = ListQuery {
            doc_type: Some("Công văn".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec![4, 2]);
    }

    #[test]
    fn test_year_filter() {
        let query = ListQuery {
            year: Some(YearFilter::Year(2024)),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec![4, 1]);

        let query = ListQuery {
            year: Some(YearFilter::Unknown),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec![3]);
    }

    #[test]
    fn test_date_range_excludes_undated() {
        let query = ListQuery {
            date_to: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec![2, 1]);

        let query = ListQuery {
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 12, 31),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec![4, 1]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let query = ListQuery {
            sort: Sort::new(SortField::Name, SortOrder::Asc),
            ..Default::default()
        };
        let names: Vec<String> = query.apply(&sample()).into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["báo cáo quý", "Hướng dẫn tuyển sinh", "Kế hoạch công tác", "Nghỉ lễ"]
        );
    }

    #[test]
    fn test_sort_by_issued_date_missing_first_when_ascending() {
        let query = ListQuery {
            sort: Sort::new(SortField::IssuedDate, SortOrder::Asc),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec![3, 2, 1, 4]);

        let query = ListQuery {
            sort: Sort::new(SortField::IssuedDate, SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_sort_desc_keeps_ties_in_input_order() {
        let docs = vec![
            doc(1, "1", "Công văn", "a", None),
            doc(2, "2", "Công văn", "b", None),
        ];
        let mut sorted = docs.clone();
        sort_documents(&mut sorted, Sort::new(SortField::Type, SortOrder::Desc));
        assert_eq!(ids(&sorted), vec![1, 2]);
    }

    #[test]
    fn test_sort_toggle() {
        let sort = Sort::default();
        let sort = sort.toggle(SortField::Name);
        assert_eq!(sort, Sort::new(SortField::Name, SortOrder::Asc));
        let sort = sort.toggle(SortField::Name);
        assert_eq!(sort, Sort::new(SortField::Name, SortOrder::Desc));
        let sort = sort.toggle(SortField::Name);
        assert_eq!(sort, Sort::new(SortField::Name, SortOrder::Asc));
        let sort = sort.toggle(SortField::Number);
        assert_eq!(sort, Sort::new(SortField::Number, SortOrder::Asc));
    }

    #[test]
    fn test_years_with_unknown_last() {
        assert_eq!(
            years(&sample()),
            vec![
                YearFilter::Year(2024),
                YearFilter::Year(2023),
                YearFilter::Unknown
            ]
        );
        assert!(years(&[]).is_empty());
    }

    #[test]
    fn test_year_filter_parse() {
        assert_eq!(YearFilter::parse("2024"), Some(YearFilter::Year(2024)));
        assert_eq!(YearFilter::parse("unknown"), Some(YearFilter::Unknown));
        assert_eq!(YearFilter::parse("0"), Some(YearFilter::Unknown));
        assert_eq!(YearFilter::parse("abc"), None);
        assert_eq!(YearFilter::Year(2024).label(), "Năm 2024");
    }

    #[test]
    fn test_type_counts() {
        let mut docs = sample();
        docs.push(doc(5, "1", "", "x", None));
        let counts = type_counts(&docs);
        let pairs: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.doc_type.as_str(), c.count))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Công văn", 2),
                ("Không xác định", 1),
                ("Kế hoạch", 1),
                ("Quyết định", 1),
            ]
        );
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=23).collect();

        let page = paginate(items.clone(), 1, PER_PAGE);
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_prev());
        assert!(page.has_next());

        let page = paginate(items.clone(), 3, PER_PAGE);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert!(!page.has_next());

        let page = paginate(items, 99, PER_PAGE);
        assert_eq!(page.page, 3);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::<u32>::new(), 5, PER_PAGE);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
    }
}
