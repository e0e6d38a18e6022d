use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;

use crate::s3::{ObjectMetadata, S3Client, TransferError};

/// The one thing the scheduler needs from a storage backend: put a local
/// file at a remote key with the given metadata.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload_file(
        &self,
        local_path: &Path,
        remote_key: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), TransferError>;
}

#[async_trait]
impl Uploader for S3Client {
    async fn upload_file(
        &self,
        local_path: &Path,
        remote_key: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), TransferError> {
        let file_size = tokio::fs::metadata(local_path)
            .await
            .map_err(|e| TransferError::from_io(e, local_path))?
            .len();

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| TransferError::Read {
                path: local_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut request = self
            .client()
            .put_object()
            .bucket(self.bucket())
            .key(remote_key)
            .body(body)
            .content_length(file_size as i64)
            .storage_class(metadata.storage_class.clone());

        if let Some(content_type) = metadata.content_type {
            request = request.content_type(content_type);
        }
        if let Some(cache_control) = metadata.cache_control {
            request = request.cache_control(cache_control);
        }

        request
            .send()
            .await
            .map_err(|e| TransferError::from_sdk(self.bucket(), DisplayErrorContext(e)))?;

        Ok(())
    }
}
