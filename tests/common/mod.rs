//! Test utilities and common setup.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response},
};
use rootserve::config::{Config, ServeMode};
use rootserve::{AppState, routes};
use tempfile::TempDir;
use tower::ServiceExt;

/// Root directory populated with the files most tests need.
pub fn populated_root() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("a.txt"), "hello").unwrap();
    std::fs::write(root.join("b.html"), vec![b'x'; 2048]).unwrap();
    std::fs::write(root.join(".hidden"), "secret").unwrap();
    std::fs::write(root.join("rootserve"), "server binary").unwrap();
    std::fs::create_dir(root.join("nested")).unwrap();
    std::fs::write(root.join("nested/deep.txt"), "deep").unwrap();
    temp_dir
}

/// Test config that protects the `rootserve` name and hides dotfiles.
pub fn test_config(mode: ServeMode) -> Config {
    Config {
        mode,
        protected_files: vec!["rootserve".to_string()],
        ..Config::default()
    }
}

/// Create a test application over `root`.
pub fn test_app(root: &TempDir, config: Config) -> Router {
    let state = AppState::with_config(root.path(), config).unwrap();
    routes::build_router(state)
}

/// Send a GET request and return the response.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method(Method::GET)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Collect a response body.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}
