use crate::application::form::FormOptions;
use crate::application::pinned::PinnedPosts;
use crate::application::query::{InfiniteList, PageFetcher, SearchQuery};
use crate::domain::{DomainError, PostId, StoreError};
use crate::infra::app_config::{self, AppConfig};
use crate::infra::db::Database;
use crate::infra::store::{KeyValueStore, MemoryStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Services owned by one app session. Everything is constructed from an
/// explicit config and store; nothing lives in module-level globals.
pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub pinned_posts: PinnedPosts,
}

impl AppContext {
    pub fn new(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let pinned_posts = PinnedPosts::new(Arc::clone(&store), config.max_pinned_posts);
        Self {
            config,
            store,
            pinned_posts,
        }
    }

    /// Config from the default location, storage in the default SQLite database.
    pub fn open() -> Result<Self, DomainError> {
        Self::open_with(app_config::load_config(), Database::default_path())
    }

    /// `config` with storage in the SQLite database at `db_path`.
    pub fn open_with(config: AppConfig, db_path: PathBuf) -> Result<Self, DomainError> {
        let db = Database::open_at(db_path).map_err(StoreError::from)?;
        Ok(Self::new(config, Arc::new(db)))
    }

    /// Pin a post and return the updated pin list.
    pub fn pin_post(&self, post_id: &str) -> Result<Vec<PostId>, DomainError> {
        log::debug!(target: "store", "pinning {post_id}");
        Ok(self.pinned_posts.pin(post_id)?)
    }

    /// Default config with process-local storage.
    pub fn in_memory() -> Self {
        Self::new(AppConfig::default(), Arc::new(MemoryStore::new()))
    }

    /// Form options carrying the configured validation defaults.
    pub fn form_options<T: Send + 'static>(&self) -> FormOptions<T> {
        FormOptions::from_config(&self.config)
    }

    /// Search input debounced with the configured delay.
    pub fn search_query(&self, initial: impl Into<String>) -> SearchQuery {
        SearchQuery::new(initial, self.config.search_debounce())
    }

    /// Infinite list paged with the configured page size.
    pub fn infinite_list<P: PageFetcher + 'static>(
        &self,
        fetcher: Arc<P>,
        filters: P::Filters,
    ) -> Result<InfiniteList<P>, DomainError> {
        Ok(InfiniteList::new(fetcher, self.config.page_size, filters)?)
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::in_memory()
    }
}
