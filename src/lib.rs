//! File server for a single root directory.
//!
//! Serves the regular files directly inside one directory, with an HTML
//! listing page and a JSON listing endpoint, while refusing the server's own
//! files, hidden files (by policy) and anything outside the root. The binary
//! is a thin wrapper around [`routes::build_router`].

pub mod catalog;
pub mod config;
pub mod deliver;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod mime;
pub mod render;
pub mod routes;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use catalog::{FileCatalog, FileEntry};
pub use config::{Config, ServeMode};
pub use deliver::{Disposition, FileDeliverer};
pub use error::FileServerError;
pub use guard::{PathGuard, Rejection, ValidatedPath};

use crate::mime::MimeLookup;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Canonical root directory to serve files from
    pub root_dir: PathBuf,
    /// Configuration
    pub config: Arc<Config>,
    /// Extension to content-type table
    pub mime_lookup: MimeLookup,
}

impl AppState {
    /// Create a new AppState with the given root directory and default config.
    pub fn new(root_dir: &Path) -> std::io::Result<Self> {
        Self::with_config(root_dir, Config::default())
    }

    /// Create a new AppState with the given root directory and config.
    ///
    /// The root is canonicalized here so every later comparison is against
    /// the real directory.
    pub fn with_config(root_dir: &Path, config: Config) -> std::io::Result<Self> {
        Ok(Self {
            root_dir: root_dir.canonicalize()?,
            config: Arc::new(config),
            mime_lookup: mime::guess_extension,
        })
    }

    /// Replace the MIME table.
    pub fn with_mime_lookup(mut self, lookup: MimeLookup) -> Self {
        self.mime_lookup = lookup;
        self
    }

    pub fn guard(&self) -> PathGuard {
        PathGuard::from_config(&self.root_dir, &self.config)
    }

    pub fn catalog(&self) -> FileCatalog {
        FileCatalog::new(
            self.guard(),
            self.mime_lookup,
            self.config.mode.download_prefix(),
        )
    }

    pub fn deliverer(&self) -> FileDeliverer {
        FileDeliverer::new(self.guard(), self.mime_lookup)
    }
}
