//! Helper types and utility functions for handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::listing::{ListQuery, Sort, SortField, SortOrder, YearFilter};

/// Query params shared by the browse page and the documents API.
///
/// Everything arrives as text so that a malformed value drops that one
/// filter instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    /// Year number, or `unknown` for undated documents.
    pub year: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    pub fn to_query(&self) -> ListQuery {
        let field = self
            .sort
            .as_deref()
            .and_then(SortField::parse)
            .unwrap_or_default();
        let order = self
            .order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default();

        ListQuery {
            q: non_empty(self.q.as_deref()),
            doc_type: non_empty(self.doc_type.as_deref()),
            year: self.year.as_deref().and_then(YearFilter::parse),
            date_from: self.date_from.as_deref().and_then(parse_date),
            date_to: self.date_to.as_deref().and_then(parse_date),
            sort: Sort::new(field, order),
        }
    }

    /// Requested page, 1 if absent or malformed.
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Build a `/?...` link to the browse page reproducing `query` at `page`.
pub fn browse_href(query: &ListQuery, page: usize) -> String {
    let mut parts: Vec<(&str, String)> = Vec::new();

    if let Some(ref q) = query.q {
        parts.push(("q", q.clone()));
    }
    if let Some(ref doc_type) = query.doc_type {
        parts.push(("type", doc_type.clone()));
    }
    if let Some(year) = query.year {
        parts.push(("year", year.as_param()));
    }
    if let Some(from) = query.date_from {
        parts.push(("date_from", from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = query.date_to {
        parts.push(("date_to", to.format("%Y-%m-%d").to_string()));
    }
    if query.sort != Sort::default() {
        parts.push(("sort", query.sort.field.as_str().to_string()));
        parts.push(("order", query.sort.order.as_str().to_string()));
    }
    if page > 1 {
        parts.push(("page", page.to_string()));
    }

    if parts.is_empty() {
        return "/".to_string();
    }

    let qs: Vec<String> = parts
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();
    format!("/?{}", qs.join("&"))
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// 500 with a generic message and the underlying cause in `details`.
pub fn json_server_error(message: &str, details: impl std::fmt::Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message, "details": details.to_string() })),
    )
        .into_response()
}
