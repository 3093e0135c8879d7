//! Browse page handler.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::super::template_structs::{
    BrowseTemplate, DocumentRow, ErrorTemplate, SortHeader, TypeOption, YearLink,
};
use super::super::AppState;
use super::helpers::{browse_href, ListParams};
use crate::extract::type_labels;
use crate::listing::{self, ListQuery, SortField, SortOrder, PER_PAGE};
use crate::models::Document;

fn column_label(field: SortField) -> &'static str {
    match field {
        SortField::Number => "Số hiệu",
        SortField::Type => "Loại",
        SortField::Name => "Trích yếu",
        SortField::IssuedDate => "Ngày ban hành",
        SortField::CreatedAt => "Tải lên",
    }
}

/// Sidebar: every year present in the register with its count over all
/// documents. Picking a year keeps the other filters and returns to page 1.
fn year_links(docs: &[Document], query: &ListQuery) -> Vec<YearLink> {
    listing::years(docs)
        .into_iter()
        .map(|year| {
            let only_year = ListQuery {
                year: Some(year),
                ..Default::default()
            };
            YearLink {
                label: year.label(),
                href: browse_href(
                    &ListQuery {
                        year: Some(year),
                        ..query.clone()
                    },
                    1,
                ),
                count: docs.iter().filter(|d| only_year.matches(d)).count(),
                active: query.year == Some(year),
            }
        })
        .collect()
}

fn sort_headers(query: &ListQuery) -> Vec<SortHeader> {
    SortField::ALL
        .into_iter()
        .map(|field| SortHeader {
            label: column_label(field),
            href: browse_href(
                &ListQuery {
                    sort: query.sort.toggle(field),
                    ..query.clone()
                },
                1,
            ),
            active: query.sort.field == field,
            ascending: query.sort.field == field && query.sort.order == SortOrder::Asc,
        })
        .collect()
}

fn heading(query: &ListQuery, total_all: usize, filtered: usize) -> String {
    match query.year {
        None => format!("Tất cả văn bản ({})", total_all),
        Some(year) => format!("{} ({} văn bản)", year.label(), filtered),
    }
}

/// Document table with year sidebar, search, type and date filters,
/// sortable columns and pagination.
pub async fn browse_documents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let docs = match state.doc_repo.list().await {
        Ok(docs) => docs,
        Err(e) => {
            tracing::error!("Failed to load documents: {}", e);
            let message = format!("Không thể tải văn bản: {}", e);
            let template = ErrorTemplate {
                title: "Lỗi",
                message: &message,
            };
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(template.render().unwrap_or(message)),
            )
                .into_response();
        }
    };

    let query = params.to_query();
    let filtered = query.apply(&docs);

    // Type counts ignore the type filter itself so every type stays selectable.
    let without_type = ListQuery {
        doc_type: None,
        ..query.clone()
    };
    let type_counts = listing::type_counts(&without_type.apply(&docs));
    let type_options: Vec<TypeOption> = type_counts
        .into_iter()
        .map(|tc| TypeOption {
            selected: query.doc_type.as_deref() == Some(tc.doc_type.as_str()),
            doc_type: tc.doc_type,
            count: tc.count,
        })
        .collect();
    let type_total = type_options.iter().map(|t| t.count).sum();

    let heading = heading(&query, docs.len(), filtered.len());
    let years = year_links(&docs, &query);
    let headers = sort_headers(&query);
    let page = listing::paginate(filtered, params.page(), PER_PAGE);

    let all_href = browse_href(
        &ListQuery {
            year: None,
            ..query.clone()
        },
        1,
    );

    let template = BrowseTemplate {
        title: "Quản lý Văn bản",
        heading,
        total_all: docs.len(),
        all_href,
        all_active: query.year.is_none(),
        years,
        type_options,
        type_total,
        q: query.q.clone().unwrap_or_default(),
        year_val: query.year.map(|y| y.as_param()).unwrap_or_default(),
        date_from: query
            .date_from
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        date_to: query
            .date_to
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        sort_val: query.sort.field.as_str().to_string(),
        order_val: query.sort.order.as_str().to_string(),
        headers,
        documents: page.items.iter().map(DocumentRow::from_document).collect(),
        page: page.page,
        total_pages: page.total_pages,
        has_pagination: page.total_pages > 1,
        has_prev: page.has_prev(),
        prev_href: browse_href(&query, page.page.saturating_sub(1).max(1)),
        has_next: page.has_next(),
        next_href: browse_href(&query, page.page + 1),
        type_labels: type_labels(),
    };

    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
    .into_response()
}
