use super::debounce::Debounced;
use std::time::Duration;
use tokio::sync::watch;

/// Typeahead search input: the raw query as typed plus its debounced value.
#[derive(Debug)]
pub struct SearchQuery {
    query: Debounced<String>,
}

impl SearchQuery {
    pub fn new(initial: impl Into<String>, delay: Duration) -> Self {
        Self {
            query: Debounced::new(initial.into(), delay),
        }
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.query.set(query.into());
    }

    pub fn clear(&self) {
        self.set_query(String::new());
    }

    /// The query exactly as typed.
    pub fn query(&self) -> String {
        self.query.immediate()
    }

    /// The query after the typing pause; this is what should be sent to the server.
    pub fn debounced_query(&self) -> String {
        self.query.settled()
    }

    /// True exactly while the typed and debounced queries differ.
    pub fn is_searching(&self) -> bool {
        self.query() != self.debounced_query()
    }

    /// Receiver notified whenever the debounced query settles.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.query.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn searching_while_debounce_is_pending() {
        let search = SearchQuery::new("", Duration::from_millis(300));
        assert!(!search.is_searching());

        search.set_query("car");
        assert!(search.is_searching());
        assert_eq!(search.query(), "car");
        assert_eq!(search.debounced_query(), "");

        tokio::time::sleep(Duration::from_millis(150)).await;
        search.set_query("cardio");
        assert!(search.is_searching());

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert!(!search.is_searching());
        assert_eq!(search.debounced_query(), "cardio");
    }

    #[tokio::test(start_paused = true)]
    async fn retyping_the_settled_query_is_not_searching() {
        let search = SearchQuery::new("heart", Duration::from_millis(300));
        search.set_query("hear");
        assert!(search.is_searching());

        // Back to the settled text before the timer fires.
        search.set_query("heart");
        assert!(!search.is_searching());

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(search.debounced_query(), "heart");
        assert!(!search.is_searching());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_settles_to_empty() {
        let search = SearchQuery::new("biotech", Duration::from_millis(100));
        search.clear();
        assert!(search.is_searching());

        tokio::time::sleep(Duration::from_millis(101)).await;
        assert_eq!(search.debounced_query(), "");
    }
}
