//! Streaming a validated file back to the client.

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::FileServerError;
use crate::guard::{PathGuard, ValidatedPath};
use crate::mime::{self, MimeLookup};

/// How the client is told to treat the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Display in place (index document)
    Inline,
    /// Save under the original file name
    Attachment,
}

impl Disposition {
    /// Content-Disposition value with a printable-ASCII `filename` and, when
    /// that had to drop characters, an exact `filename*` (RFC 6266).
    fn header_value(self, file_name: &str) -> String {
        let kind = match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        };

        let safe_filename: String = file_name
            .chars()
            .map(|c| match c {
                '"' => '\'',
                ' '..='~' => c,
                _ => '_',
            })
            .collect();

        if safe_filename == file_name.replace('"', "'") {
            format!("{}; filename=\"{}\"", kind, safe_filename)
        } else {
            format!(
                "{}; filename=\"{}\"; filename*=UTF-8''{}",
                kind,
                safe_filename,
                urlencoding::encode(file_name)
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileDeliverer {
    guard: PathGuard,
    lookup: MimeLookup,
}

impl FileDeliverer {
    pub fn new(guard: PathGuard, lookup: MimeLookup) -> Self {
        Self { guard, lookup }
    }

    /// Validate `requested` and stream it, or report why not.
    pub async fn deliver(
        &self,
        requested: &str,
        disposition: Disposition,
    ) -> Result<Response, FileServerError> {
        let validated = self.guard.validate(requested)?;
        self.stream(&validated, disposition).await
    }

    async fn stream(
        &self,
        validated: &ValidatedPath,
        disposition: Disposition,
    ) -> Result<Response, FileServerError> {
        let path = validated.path();
        debug!("Streaming file: {}", path.display());

        // Removed after validation: same outcome as never existing.
        let file = match fs::File::open(path).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileServerError::NotFound);
            }
            Err(err) => return Err(FileServerError::Io(err)),
        };
        let file_size = file.metadata().await?.len();

        let body = Body::from_stream(ReaderStream::new(file));
        let mime = mime::for_name(validated.name(), self.lookup);

        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime.to_string()),
                (header::CONTENT_LENGTH, file_size.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    disposition.header_value(validated.name()),
                ),
            ],
            body,
        )
            .into_response())
    }
}
