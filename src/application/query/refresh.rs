use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pull-to-refresh state around an async refetch.
#[derive(Debug, Clone, Default)]
pub struct RefreshControl {
    refreshing: Arc<AtomicBool>,
}

struct RefreshingGuard<'a>(&'a AtomicBool);

impl Drop for RefreshingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl RefreshControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    /// Run `refetch` with `refreshing` raised; the flag drops back whatever
    /// the outcome, and the refetch output (including errors) is returned as is.
    pub async fn refresh<F, Fut>(&self, refetch: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        self.refreshing.store(true, Ordering::SeqCst);
        let _guard = RefreshingGuard(&self.refreshing);
        refetch().await
    }
}
