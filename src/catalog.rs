//! Enumeration of the files directly inside the root directory.

use serde::Serialize;
use tracing::debug;

use crate::error::FileServerError;
use crate::guard::PathGuard;
use crate::mime::{self, MimeLookup};

/// One discoverable file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(rename = "path")]
    pub public_path: String,
}

/// Builds a fresh snapshot of the root on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    guard: PathGuard,
    lookup: MimeLookup,
    download_prefix: String,
}

impl FileCatalog {
    pub fn new(guard: PathGuard, lookup: MimeLookup, download_prefix: impl Into<String>) -> Self {
        Self {
            guard,
            lookup,
            download_prefix: download_prefix.into(),
        }
    }

    /// URL path at which `name` can be downloaded.
    pub fn public_path(&self, name: &str) -> String {
        format!("{}{}", self.download_prefix, urlencoding::encode(name))
    }

    /// List the root's regular files, sorted by name (ordinal, case-sensitive).
    ///
    /// Every candidate goes through the guard, so a listed name is always a
    /// downloadable one. Blocking; run it off the async runtime.
    pub fn list(&self) -> Result<Vec<FileEntry>, FileServerError> {
        let entries =
            std::fs::read_dir(self.guard.root()).map_err(FileServerError::Enumeration)?;

        let mut files = Vec::new();

        for entry in entries {
            let entry = entry.map_err(FileServerError::Enumeration)?;
            let file_name = entry.file_name().to_string_lossy().to_string();

            let validated = match self.guard.validate(&file_name) {
                Ok(v) => v,
                Err(rejection) => {
                    debug!("Skipping {:?}: {}", file_name, rejection);
                    continue;
                }
            };

            // Deleted between read_dir and stat: just not part of this snapshot.
            let Ok(metadata) = std::fs::metadata(validated.path()) else {
                continue;
            };

            files.push(FileEntry {
                mime_type: mime::for_name(&file_name, self.lookup).to_string(),
                public_path: self.public_path(&file_name),
                size_bytes: metadata.len(),
                name: file_name,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(files)
    }
}
