use super::fetcher::PageFetcher;
use super::infinite::InfiniteQuery;
use super::refresh::RefreshControl;
use super::scroll::{InfiniteScroll, NextPage, ScrollMetrics};
use crate::domain::QueryError;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Everything a paginated list screen binds to: flattened items, the
/// infinite-scroll trigger and pull-to-refresh.
pub struct InfiniteList<P: PageFetcher> {
    scroll: InfiniteScroll<InfiniteQuery<P>>,
    refresh: RefreshControl,
}

impl<P: PageFetcher + 'static> InfiniteList<P> {
    pub fn new(fetcher: Arc<P>, page_size: u32, filters: P::Filters) -> Result<Self, QueryError> {
        let query = InfiniteQuery::new(fetcher, page_size, filters)?;
        Ok(Self::from_query(query))
    }

    pub fn from_query(query: InfiniteQuery<P>) -> Self {
        Self {
            scroll: InfiniteScroll::new(query),
            refresh: RefreshControl::new(),
        }
    }

    pub fn query(&self) -> &InfiniteQuery<P> {
        self.scroll.source()
    }

    /// Load the first page.
    pub async fn load(&self) -> Result<(), QueryError> {
        self.query().refetch().await
    }

    pub fn items(&self) -> Vec<P::Item> {
        self.query().items()
    }

    pub fn is_loading(&self) -> bool {
        self.query().is_loading()
    }

    /// No load has been started yet. Screens show a placeholder rather than
    /// the empty state while this holds.
    pub fn is_initial(&self) -> bool {
        self.query().is_initial()
    }

    /// Not loading and nothing to show. Also true before the first load; see
    /// [`InfiniteList::is_initial`].
    pub fn is_empty(&self) -> bool {
        !self.is_loading() && self.query().response().is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.query().has_next_page()
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.query().is_fetching_next_page()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    pub async fn on_end_reached(&self) -> Result<bool, QueryError> {
        self.scroll.on_end_reached().await
    }

    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> Result<bool, QueryError> {
        self.scroll.on_scroll(metrics).await
    }

    /// Pull-to-refresh: reload from the first page with `refreshing` raised.
    pub async fn refresh(&self) -> Result<(), QueryError> {
        let query = self.query();
        self.refresh.refresh(|| query.refetch()).await
    }

    /// Reload with new filters every time `settled` changes, typically the
    /// receiver of a [`super::SearchQuery`]. The task ends when the sender is
    /// dropped; abort the handle to stop following earlier.
    pub fn follow<S, M>(&self, mut settled: watch::Receiver<S>, to_filters: M) -> JoinHandle<()>
    where
        S: Clone + Send + Sync + 'static,
        M: Fn(&S) -> P::Filters + Send + Sync + 'static,
    {
        let query = self.query().clone();
        tokio::spawn(async move {
            while settled.changed().await.is_ok() {
                let value = settled.borrow_and_update().clone();
                if let Err(err) = query.set_filters(to_filters(&value)).await {
                    log::warn!(target: "query", "reload after filter change failed: {err}");
                }
            }
        })
    }
}
