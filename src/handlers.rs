use axum::{
    Json,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use tracing::debug;

use crate::AppState;
use crate::catalog::FileEntry;
use crate::deliver::Disposition;
use crate::error::FileServerError;
use crate::render::{FileListing, ListingPage};

/// Take a catalog snapshot without blocking the runtime.
async fn snapshot(state: &AppState) -> Result<Vec<FileEntry>, FileServerError> {
    let catalog = state.catalog();
    tokio::task::spawn_blocking(move || catalog.list())
        .await
        .map_err(|err| FileServerError::Enumeration(std::io::Error::other(err.to_string())))?
}

/// GET / - HTML listing page (catalog mode)
pub async fn listing_page(State(state): State<AppState>) -> Result<Html<String>, FileServerError> {
    let files = snapshot(&state).await?;
    debug!("Rendering listing of {} files", files.len());

    Ok(Html(
        ListingPage::new(&files)
            .title(state.config.title.as_str())
            .render(),
    ))
}

/// GET / - Index document (minimal mode)
pub async fn index_document(State(state): State<AppState>) -> Result<Response, FileServerError> {
    state
        .deliverer()
        .deliver(&state.config.index_file, Disposition::Inline)
        .await
}

/// GET /api/files - JSON listing
pub async fn list_files(State(state): State<AppState>) -> Result<Response, FileServerError> {
    let files = snapshot(&state).await?;
    Ok(Json(FileListing::new(&files)).into_response())
}

/// GET /files/{filename} or /{filename} - Download a single file
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, FileServerError> {
    debug!("Download requested: {:?}", filename);
    state
        .deliverer()
        .deliver(&filename, Disposition::Attachment)
        .await
}
