use crate::domain::{Page, PageRequest};
use anyhow::Result;
use async_trait::async_trait;

/// Paginated fetch capability provided by the API client.
///
/// Errors are surfaced as-is; retry policy, if any, belongs to the implementor.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Clone + Send + Sync + 'static;
    type Filters: Clone + Send + Sync + 'static;

    async fn fetch(&self, request: PageRequest<Self::Filters>) -> Result<Page<Self::Item>>;
}
