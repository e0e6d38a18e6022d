pub mod client;
pub mod error;
pub mod metadata;
pub mod upload;

pub use client::S3Client;
pub use error::TransferError;
pub use metadata::{ObjectMetadata, resolve_metadata};
pub use upload::Uploader;
