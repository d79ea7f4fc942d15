pub mod folder;

pub use folder::*;

use async_trait::async_trait;

use crate::error::PublishError;

/// Document-publish service: stores a report and returns a shareable link.
///
/// `Ok(None)` means the call succeeded but nothing was published.
#[async_trait]
pub trait DocumentPublisher: Send + Sync {
    async fn publish(&self, title: &str, markdown: &str) -> Result<Option<String>, PublishError>;
}

/// Publisher that performs no side effect and never returns a link
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

#[async_trait]
impl DocumentPublisher for NoopPublisher {
    async fn publish(&self, _title: &str, _markdown: &str) -> Result<Option<String>, PublishError> {
        Ok(None)
    }
}
