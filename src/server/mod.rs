//! Web server for the document register.
//!
//! Serves the browse page, the JSON API used by its upload and delete
//! controls, and the stored files themselves.

mod assets;
mod handlers;
mod routes;
mod template_structs;

pub use routes::create_router;

use std::sync::Arc;

use crate::config::Settings;
use crate::repository::DieselDocumentRepository;
use crate::storage::UploadStore;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub doc_repo: Arc<DieselDocumentRepository>,
    pub store: UploadStore,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let ctx = settings.create_db_context();

        Self {
            doc_repo: Arc::new(ctx.documents()),
            store: UploadStore::new(settings.uploads_dir.clone()),
            max_upload_bytes: settings.max_upload_bytes,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
