//! Page accumulation for infinite lists.
//!
//! Holds the pages fetched so far for one filter set and decides, from the
//! last server-reported position, whether another page exists.

use super::fetcher::PageFetcher;
use super::scroll::NextPage;
use crate::domain::{Page, PageIndex, PageRequest, PagedResponse, QueryError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

const FIRST_PAGE: PageIndex = 1;

struct QueryState<T, F> {
    filters: F,
    response: PagedResponse<T>,
    /// Bumped on every filter change or full reload; results fetched for an
    /// older generation are discarded.
    generation: u64,
    is_loading: bool,
    is_fetching_next_page: bool,
    last_error: Option<String>,
}

/// Lowers one of the state's busy flags when dropped, unless a newer
/// generation has started since; that generation owns the flag now.
struct BusyGuard<'a, T, F> {
    state: &'a Mutex<QueryState<T, F>>,
    generation: u64,
    flag: fn(&mut QueryState<T, F>) -> &mut bool,
}

impl<T, F> Drop for BusyGuard<'_, T, F> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.generation == self.generation {
            *(self.flag)(&mut state) = false;
        }
    }
}

/// Infinite query over a [`PageFetcher`]. Clones share state.
pub struct InfiniteQuery<P: PageFetcher> {
    fetcher: Arc<P>,
    page_size: u32,
    state: Arc<Mutex<QueryState<P::Item, P::Filters>>>,
}

impl<P: PageFetcher> Clone for InfiniteQuery<P> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            page_size: self.page_size,
            state: Arc::clone(&self.state),
        }
    }
}

impl<P: PageFetcher> InfiniteQuery<P> {
    pub fn new(fetcher: Arc<P>, page_size: u32, filters: P::Filters) -> Result<Self, QueryError> {
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize);
        }
        Ok(Self {
            fetcher,
            page_size,
            state: Arc::new(Mutex::new(QueryState {
                filters,
                response: PagedResponse::default(),
                generation: 0,
                is_loading: false,
                is_fetching_next_page: false,
                last_error: None,
            })),
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filters(&self) -> P::Filters {
        self.state.lock().filters.clone()
    }

    pub fn response(&self) -> PagedResponse<P::Item> {
        self.state.lock().response.clone()
    }

    /// All fetched items, in page order and then within-page order.
    pub fn items(&self) -> Vec<P::Item> {
        self.state.lock().response.flatten()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading
    }

    /// True until the first load has been started.
    pub fn is_initial(&self) -> bool {
        self.state.lock().generation == 0
    }

    /// Message of the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    /// Cursor for the next request, or `None` when nothing was fetched yet or
    /// the last page has been reached.
    pub fn next_page_param(&self) -> Option<PageIndex> {
        self.state.lock().response.next_page_param()
    }

    /// Drop all pages and load the first page again with the current filters.
    pub async fn refetch(&self) -> Result<(), QueryError> {
        let (generation, filters) = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.is_loading = true;
            // A next-page fetch from the previous generation no longer blocks.
            state.is_fetching_next_page = false;
            (state.generation, state.filters.clone())
        };
        let _guard = BusyGuard {
            state: &self.state,
            generation,
            flag: |state| &mut state.is_loading,
        };

        let page = self.fetch_page(FIRST_PAGE, filters).await;
        let mut state = self.state.lock();
        if state.generation != generation {
            log::debug!(target: "query", "discarding stale first page (generation {generation})");
            return Ok(());
        }
        match page {
            Ok(page) => {
                state.response = PagedResponse { pages: vec![page] };
                state.last_error = None;
                Ok(())
            }
            Err(err) => {
                state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Replace the filters, forget pages fetched under the old ones and
    /// load the first page.
    pub async fn set_filters(&self, filters: P::Filters) -> Result<(), QueryError> {
        {
            let mut state = self.state.lock();
            state.filters = filters;
            state.response = PagedResponse::default();
        }
        self.refetch().await
    }

    async fn fetch_page(
        &self,
        page: PageIndex,
        filters: P::Filters,
    ) -> Result<Page<P::Item>, QueryError> {
        log::debug!(target: "query", "fetching page {page} (size {})", self.page_size);
        let request = PageRequest {
            page,
            page_size: self.page_size,
            filters,
        };
        self.fetcher
            .fetch(request)
            .await
            .map_err(|source| QueryError::FetchFailed { page, source })
    }
}

#[async_trait]
impl<P: PageFetcher> NextPage for InfiniteQuery<P> {
    fn has_next_page(&self) -> bool {
        self.next_page_param().is_some()
    }

    fn is_fetching_next_page(&self) -> bool {
        self.state.lock().is_fetching_next_page
    }

    /// Append the next page. No-op while another next-page fetch is in flight
    /// or when the last page has been reached.
    async fn fetch_next_page(&self) -> Result<(), QueryError> {
        let (generation, cursor, filters) = {
            let mut state = self.state.lock();
            if state.is_fetching_next_page {
                return Ok(());
            }
            let Some(cursor) = state.response.next_page_param() else {
                return Ok(());
            };
            state.is_fetching_next_page = true;
            (state.generation, cursor, state.filters.clone())
        };
        let _guard = BusyGuard {
            state: &self.state,
            generation,
            flag: |state| &mut state.is_fetching_next_page,
        };

        let page = self.fetch_page(cursor, filters).await;
        let mut state = self.state.lock();
        if state.generation != generation {
            log::debug!(target: "query", "discarding stale page {cursor}");
            return Ok(());
        }
        match page {
            Ok(page) => {
                state.response.pages.push(page);
                state.last_error = None;
                Ok(())
            }
            Err(err) => {
                state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
