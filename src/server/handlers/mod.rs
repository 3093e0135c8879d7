//! HTTP request handlers for the web server.

mod browse;
mod documents_api;
mod helpers;
mod static_files;
mod upload;

// Re-export handlers for use by the router
pub use browse::browse_documents;
pub use documents_api::{delete_document, list_documents};
pub use static_files::{serve_css, serve_js, serve_upload};
pub use upload::{extract_metadata, upload_document};
