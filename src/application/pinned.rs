//! Pinned posts, persisted through an injected key-value store.

use crate::domain::{PostId, StoreError};
use crate::infra::store::KeyValueStore;
use parking_lot::Mutex;
use std::sync::Arc;

const PINNED_KEY: &str = "pinned_posts";

/// Newest-first list of pinned post ids, capped at `max_pinned`.
pub struct PinnedPosts {
    store: Arc<dyn KeyValueStore>,
    max_pinned: usize,
    // Serializes read-modify-write cycles against the store.
    write_lock: Mutex<()>,
}

impl PinnedPosts {
    pub fn new(store: Arc<dyn KeyValueStore>, max_pinned: usize) -> Self {
        Self {
            store,
            max_pinned,
            write_lock: Mutex::new(()),
        }
    }

    pub fn max_pinned(&self) -> usize {
        self.max_pinned
    }

    pub fn list(&self) -> Result<Vec<PostId>, StoreError> {
        let Some(raw) = self.store.get(PINNED_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            key: PINNED_KEY.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn is_pinned(&self, post_id: &str) -> Result<bool, StoreError> {
        Ok(self.list()?.iter().any(|id| id == post_id))
    }

    /// Pin `post_id` at the front. Pinning an already pinned post moves it to
    /// the front; going over the cap drops the oldest pins.
    pub fn pin(&self, post_id: impl Into<PostId>) -> Result<Vec<PostId>, StoreError> {
        let post_id = post_id.into();
        let _guard = self.write_lock.lock();

        let mut pinned = self.list()?;
        pinned.retain(|id| *id != post_id);
        pinned.insert(0, post_id);
        if pinned.len() > self.max_pinned {
            let dropped = pinned.split_off(self.max_pinned);
            log::debug!(target: "store", "unpinned over cap: {}", dropped.join(", "));
        }
        self.write(&pinned)?;
        Ok(pinned)
    }

    /// Returns whether the post was pinned.
    pub fn unpin(&self, post_id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();

        let mut pinned = self.list()?;
        let before = pinned.len();
        pinned.retain(|id| id != post_id);
        if pinned.len() == before {
            return Ok(false);
        }
        self.write(&pinned)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        self.store.remove(PINNED_KEY)?;
        Ok(())
    }

    fn write(&self, pinned: &[PostId]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(pinned).map_err(|e| StoreError::Corrupt {
            key: PINNED_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(PINNED_KEY, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::store::MemoryStore;

    fn pinned(max: usize) -> (Arc<MemoryStore>, PinnedPosts) {
        let store = Arc::new(MemoryStore::new());
        let service = PinnedPosts::new(store.clone(), max);
        (store, service)
    }

    #[test]
    fn pins_newest_first() {
        let (_, service) = pinned(3);
        service.pin("a").unwrap();
        service.pin("b").unwrap();
        assert_eq!(service.list().unwrap(), vec!["b", "a"]);
        assert!(service.is_pinned("a").unwrap());
        assert!(!service.is_pinned("z").unwrap());
    }

    #[test]
    fn repinning_moves_to_front_without_duplicates() {
        let (_, service) = pinned(3);
        service.pin("a").unwrap();
        service.pin("b").unwrap();
        let list = service.pin("a").unwrap();
        assert_eq!(list, vec!["a", "b"]);
    }

    #[test]
    fn cap_drops_oldest() {
        let (_, service) = pinned(2);
        service.pin("a").unwrap();
        service.pin("b").unwrap();
        service.pin("c").unwrap();
        assert_eq!(service.list().unwrap(), vec!["c", "b"]);
    }

    #[test]
    fn unpin_reports_presence() {
        let (_, service) = pinned(3);
        service.pin("a").unwrap();
        assert!(service.unpin("a").unwrap());
        assert!(!service.unpin("a").unwrap());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn corrupt_payload_is_reported() {
        let (store, service) = pinned(3);
        store.set(PINNED_KEY, "{not json").unwrap();
        let err = service.list().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { key, .. } if key == PINNED_KEY));
    }

    #[test]
    fn state_lives_in_the_injected_store() {
        let (store, service) = pinned(3);
        service.pin("a").unwrap();

        let other = PinnedPosts::new(store, 3);
        assert_eq!(other.list().unwrap(), vec!["a"]);

        other.clear().unwrap();
        assert!(service.list().unwrap().is_empty());
    }
}
