//! Integration tests for the query layer: a community feed paged through
//! `InfiniteList`, driven by scroll events, pull-to-refresh and a debounced
//! search box.

use async_trait::async_trait;
use medvest::application::query::{InfiniteList, PageFetcher, ScrollMetrics};
use medvest::domain::{DomainError, Page, PageRequest, QueryError};
use medvest::infra::app_config::AppConfig;
use medvest::infra::store::MemoryStore;
use medvest::state::AppContext;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Post {
    id: String,
    title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct FeedFilters {
    search: String,
}

/// Community feed served from memory, newest first.
struct FeedServer {
    posts: Mutex<Vec<Post>>,
    seen_filters: Mutex<Vec<FeedFilters>>,
    down: Mutex<bool>,
}

impl FeedServer {
    fn new(titles: &[&str]) -> Arc<Self> {
        let posts = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Post {
                id: format!("post-{i}"),
                title: title.to_string(),
            })
            .collect();
        Arc::new(Self {
            posts: Mutex::new(posts),
            seen_filters: Mutex::new(Vec::new()),
            down: Mutex::new(false),
        })
    }

    fn publish(&self, id: &str, title: &str) {
        self.posts.lock().insert(
            0,
            Post {
                id: id.to_string(),
                title: title.to_string(),
            },
        );
    }
}

#[async_trait]
impl PageFetcher for FeedServer {
    type Item = Post;
    type Filters = FeedFilters;

    async fn fetch(&self, request: PageRequest<FeedFilters>) -> anyhow::Result<Page<Post>> {
        self.seen_filters.lock().push(request.filters.clone());
        if *self.down.lock() {
            anyhow::bail!("feed unavailable");
        }

        let needle = request.filters.search.to_lowercase();
        let matching: Vec<Post> = self
            .posts
            .lock()
            .iter()
            .filter(|post| post.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let size = request.page_size as usize;
        let total_pages = matching.len().div_ceil(size) as u32;
        let data = matching
            .into_iter()
            .skip((request.page as usize - 1) * size)
            .take(size)
            .collect();
        Ok(Page {
            data,
            page: request.page,
            total_pages,
        })
    }
}

const TITLES: &[&str] = &[
    "Cardiology devices outlook",
    "Biotech funding round",
    "Cardiac imaging IPO",
    "Pharma earnings recap",
    "Medtech M&A",
];

fn context(page_size: u32) -> AppContext {
    AppContext::new(
        AppConfig {
            page_size,
            ..Default::default()
        },
        Arc::new(MemoryStore::new()),
    )
}

fn titles(list: &InfiniteList<FeedServer>) -> Vec<String> {
    list.items().into_iter().map(|post| post.title).collect()
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_scrolling_through_the_feed() -> anyhow::Result<()> {
    let server = FeedServer::new(TITLES);
    let list = context(2).infinite_list(Arc::clone(&server), FeedFilters::default())?;

    // Nothing loaded yet counts as empty.
    assert!(list.is_empty());
    list.load().await?;
    assert!(!list.is_empty());
    assert_eq!(list.items().len(), 2);
    assert!(list.has_next_page());

    // Far from the end: nothing happens.
    let far = ScrollMetrics {
        offset: 0.0,
        viewport_length: 600.0,
        content_length: 4000.0,
    };
    assert!(!list.on_scroll(far).await?);
    assert_eq!(list.items().len(), 2);

    // Within half a viewport of the end: next page.
    let near = ScrollMetrics {
        offset: 0.0,
        viewport_length: 600.0,
        content_length: 800.0,
    };
    assert!(list.on_scroll(near).await?);
    assert_eq!(list.items().len(), 4);

    assert!(list.on_end_reached().await?);
    assert_eq!(titles(&list), TITLES);
    assert!(!list.has_next_page());
    assert!(!list.on_end_reached().await?);

    Ok(())
}

#[tokio::test]
async fn test_pull_to_refresh_restarts_from_first_page() -> anyhow::Result<()> {
    let server = FeedServer::new(TITLES);
    let list = context(2).infinite_list(Arc::clone(&server), FeedFilters::default())?;
    list.load().await?;
    list.on_end_reached().await?;
    assert_eq!(list.items().len(), 4);

    server.publish("post-new", "Breaking: device recall");
    list.refresh().await?;

    assert!(!list.is_refreshing());
    assert_eq!(
        titles(&list),
        vec!["Breaking: device recall", "Cardiology devices outlook"]
    );
    assert_eq!(list.query().next_page_param(), Some(2));

    Ok(())
}

#[tokio::test]
async fn test_failed_refresh_keeps_list_usable() -> anyhow::Result<()> {
    let server = FeedServer::new(TITLES);
    let list = context(2).infinite_list(Arc::clone(&server), FeedFilters::default())?;
    list.load().await?;

    *server.down.lock() = true;
    let err = list.refresh().await.unwrap_err();
    assert!(matches!(err, QueryError::FetchFailed { page: 1, .. }));
    assert!(!list.is_refreshing());
    assert!(!list.is_loading());

    *server.down.lock() = false;
    list.refresh().await?;
    assert_eq!(list.items().len(), 2);

    Ok(())
}

#[test]
fn test_zero_page_size_is_rejected() {
    let server = FeedServer::new(TITLES);
    let err = context(0)
        .infinite_list(server, FeedFilters::default())
        .err();
    assert!(matches!(
        err,
        Some(DomainError::Query(QueryError::InvalidPageSize))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_search_box_drives_feed() -> anyhow::Result<()> {
    let ctx = context(2);
    let server = FeedServer::new(TITLES);
    let list = ctx.infinite_list(Arc::clone(&server), FeedFilters::default())?;
    list.load().await?;

    let search = ctx.search_query("");
    let follower = list.follow(search.subscribe(), |query: &String| FeedFilters {
        search: query.clone(),
    });

    for typed in ["c", "ca", "car", "card"] {
        search.set_query(typed);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(search.is_searching());
    assert_eq!(search.debounced_query(), "");

    tokio::time::sleep(ctx.config.search_debounce()).await;
    settle().await;

    assert!(!search.is_searching());
    assert_eq!(search.debounced_query(), "card");
    assert_eq!(
        titles(&list),
        vec!["Cardiology devices outlook", "Cardiac imaging IPO"]
    );
    assert!(!list.has_next_page());

    let searches: Vec<String> = server
        .seen_filters
        .lock()
        .iter()
        .map(|f| f.search.clone())
        .collect();
    assert_eq!(searches, vec!["".to_string(), "card".to_string()]);

    // Clearing settles back to the unfiltered feed.
    search.clear();
    tokio::time::sleep(ctx.config.search_debounce() + Duration::from_millis(10)).await;
    settle().await;
    assert_eq!(list.items().len(), 2);
    assert!(list.has_next_page());

    follower.abort();
    Ok(())
}
