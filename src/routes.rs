use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::AppState;
use crate::config::ServeMode;
use crate::error::FileServerError;
use crate::handlers;

/// Route table for the configured mode. Built once; never changed afterwards.
fn file_routes(mode: ServeMode) -> Router<AppState> {
    match mode {
        ServeMode::Catalog => Router::new()
            .route("/", get(handlers::listing_page))
            .route("/api/files", get(handlers::list_files))
            .route("/files/{filename}", get(handlers::download)),
        ServeMode::Minimal => Router::new()
            .route("/", get(handlers::index_document))
            .route("/api/files", get(handlers::list_files))
            .route("/{filename}", get(handlers::download)),
    }
}

/// Mount each conventional asset directory that exists under the root.
fn static_routes(state: &AppState) -> Router<AppState> {
    let mut router = Router::new();

    for dir in &state.config.static_dirs {
        let path = state.root_dir.join(dir);
        if path.is_dir() {
            info!("Mounting /{} from {}", dir, path.display());
            router = router.nest_service(&format!("/{}", dir), ServeDir::new(path));
        } else {
            debug!("Static directory {:?} not present, skipping", dir);
        }
    }

    if state.config.hide_dotfiles {
        router = router.layer(middleware::from_fn(refuse_dotfiles));
    }

    router
}

/// True if any (percent-decoded) segment of `path` starts with a dot.
fn has_hidden_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        urlencoding::decode(segment).map_or(true, |decoded| decoded.starts_with('.'))
    })
}

/// Keep asset mounts under the same dotfile policy as downloads.
async fn refuse_dotfiles(req: Request, next: Next) -> Response {
    if has_hidden_segment(req.uri().path()) {
        warn!("Hidden static path refused: {}", req.uri().path());
        return FileServerError::Forbidden.into_response();
    }
    next.run(req).await
}

/// Create the full application router
pub fn build_router(state: AppState) -> Router {
    let mut router = file_routes(state.config.mode)
        .merge(static_routes(&state))
        .layer(TraceLayer::new_for_http());

    if state.config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}
