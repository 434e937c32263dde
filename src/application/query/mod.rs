//! Debounced query layer: the data side of search boxes and infinite lists.
//!
//! - [`Debounced`] / [`DebouncedCallback`]: trailing-edge debounce.
//! - [`SearchQuery`]: typed query, debounced query and `is_searching`.
//! - [`InfiniteQuery`]: pages fetched from a [`PageFetcher`], with the
//!   next-page cursor derived from the last page.
//! - [`InfiniteScroll`], [`RefreshControl`] and [`InfiniteList`], which
//!   composes them for list screens.

mod debounce;
mod fetcher;
mod infinite;
mod list;
mod refresh;
mod scroll;
mod search;


pub use debounce::{Debounced, DebouncedCallback};
pub use fetcher::PageFetcher;
pub use infinite::InfiniteQuery;
pub use list::InfiniteList;
pub use refresh::RefreshControl;
pub use scroll::{END_REACHED_THRESHOLD, InfiniteScroll, NextPage, ScrollMetrics};
pub use search::SearchQuery;
