use serde::{Deserialize, Serialize};

/// 1-based page index used as the pagination cursor.
pub type PageIndex = u32;

/// Parameters of a single page request sent to the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest<F> {
    pub page: PageIndex,
    pub page_size: u32,
    pub filters: F,
}

/// One page as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: PageIndex,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Cursor for the page after this one, or `None` when this is the last.
    pub fn next_page_param(&self) -> Option<PageIndex> {
        next_page_param(self.page, self.total_pages)
    }
}

/// Decide the next cursor from the server-reported position.
///
/// Advances only while `page < total_pages`; anything else is terminal.
pub fn next_page_param(page: PageIndex, total_pages: u32) -> Option<PageIndex> {
    if page < total_pages {
        Some(page + 1)
    } else {
        None
    }
}

/// Accumulated pages of an infinite query, in fetch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub pages: Vec<Page<T>>,
}

impl<T> Default for PagedResponse<T> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<T: Clone> PagedResponse<T> {
    /// All items in page order, then within-page order.
    pub fn flatten(&self) -> Vec<T> {
        self.pages
            .iter()
            .flat_map(|page| page.data.iter().cloned())
            .collect()
    }
}

impl<T> PagedResponse<T> {
    pub fn len(&self) -> usize {
        self.pages.iter().map(|page| page.data.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_page(&self) -> Option<&Page<T>> {
        self.pages.last()
    }

    /// Cursor derived from the most recently fetched page.
    pub fn next_page_param(&self) -> Option<PageIndex> {
        self.last_page().and_then(Page::next_page_param)
    }
}
