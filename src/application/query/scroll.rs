use crate::domain::QueryError;
use async_trait::async_trait;

/// Fraction of the visible list length from the end at which the next page
/// is requested.
pub const END_REACHED_THRESHOLD: f64 = 0.5;

/// Next-page capability of a paginated source.
#[async_trait]
pub trait NextPage: Send + Sync {
    fn has_next_page(&self) -> bool;
    /// Single source of truth for whether a next-page request is in flight.
    fn is_fetching_next_page(&self) -> bool;
    async fn fetch_next_page(&self) -> Result<(), QueryError>;
}

/// Scroll position of a list, in the list's own length unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f64,
    pub viewport_length: f64,
    pub content_length: f64,
}

impl ScrollMetrics {
    pub fn distance_from_end(&self) -> f64 {
        (self.content_length - self.offset - self.viewport_length).max(0.0)
    }

    /// Whether the remaining distance is within the end-reached threshold.
    pub fn is_near_end(&self) -> bool {
        self.distance_from_end() <= END_REACHED_THRESHOLD * self.viewport_length
    }
}

/// Infinite-scroll trigger over a paginated source.
#[derive(Debug, Clone)]
pub struct InfiniteScroll<S> {
    source: S,
}

impl<S: NextPage> InfiniteScroll<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn threshold(&self) -> f64 {
        END_REACHED_THRESHOLD
    }

    /// Request the next page when one exists and none is in flight.
    ///
    /// Returns whether a fetch was started.
    pub async fn on_end_reached(&self) -> Result<bool, QueryError> {
        if !self.source.has_next_page() || self.source.is_fetching_next_page() {
            return Ok(false);
        }
        self.source.fetch_next_page().await?;
        Ok(true)
    }

    /// Feed a scroll event; fires [`InfiniteScroll::on_end_reached`] once the
    /// end is within the threshold.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> Result<bool, QueryError> {
        if !metrics.is_near_end() {
            return Ok(false);
        }
        self.on_end_reached().await
    }
}
