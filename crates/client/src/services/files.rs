//! File upload operations (product images).

use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::HttpGateway;
use crate::types::UploadedFile;

/// Upload and delete files on the backend.
#[derive(Clone)]
pub struct FilesService {
    gateway: HttpGateway,
}

impl FilesService {
    /// Wire the service to the gateway.
    #[must_use]
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    /// Upload a file as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, bytes), fields(filename = %filename, size = bytes.len()))]
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadedFile, ApiError> {
        self.gateway
            .post_multipart("/files/upload", filename, bytes)
            .await
    }

    /// Delete an uploaded file by its stored filename.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, filename: &str) -> Result<(), ApiError> {
        self.gateway.delete_unit(&format!("/files/{filename}")).await
    }
}
