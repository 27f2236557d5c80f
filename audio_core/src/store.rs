//! Session-scoped registry of encoded audio.
//!
//! Every synthesized container is registered here and handed to clients as an
//! opaque handle (an id plus the URL it can be fetched from). Handles stay
//! valid until the owner revokes them, or until the store runs out of room and
//! evicts the least recently used entry.

use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard},
};

use lru::LruCache;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::wav::AudioContainer;

pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioHandle {
    pub id: Uuid,
    pub url: String,
}

#[derive(Debug)]
pub struct AudioStore {
    entries: Mutex<LruCache<Uuid, Arc<AudioContainer>>>,
    url_prefix: String,
}

impl AudioStore {
    /// `url_prefix` is joined with the handle id to form the resource URL,
    /// e.g. `/audio` yields `/audio/<id>`.
    pub fn new(capacity: usize, url_prefix: impl Into<String>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<Uuid, Arc<AudioContainer>>> {
        // A panic while holding the lock cannot leave the cache half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register(&self, container: AudioContainer) -> AudioHandle {
        let id = Uuid::new_v4();
        let evicted = self.entries().push(id, Arc::new(container));
        if let Some((old, _)) = evicted.filter(|(old, _)| *old != id) {
            debug!("Audio store full, released handle {old}");
        }
        AudioHandle {
            id,
            url: self.url_for(&id),
        }
    }

    /// Register a container and get a guard that revokes it when dropped.
    pub fn scoped(&self, container: AudioContainer) -> ScopedAudioHandle<'_> {
        let handle = self.register(container);
        ScopedAudioHandle {
            store: self,
            handle,
            armed: true,
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<AudioContainer>> {
        self.entries().get(id).cloned()
    }

    /// Release a handle. Returns `false` if it was unknown or already released.
    pub fn revoke(&self, id: &Uuid) -> bool {
        self.entries().pop(id).is_some()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.entries().contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries().cap().get()
    }

    pub fn url_for(&self, id: &Uuid) -> String {
        format!("{}/{}", self.url_prefix, id)
    }
}

impl Default for AudioStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, "/audio")
    }
}

/// Handle that is revoked from its store on drop.
#[derive(Debug)]
pub struct ScopedAudioHandle<'a> {
    store: &'a AudioStore,
    handle: AudioHandle,
    armed: bool,
}

impl ScopedAudioHandle<'_> {
    pub fn handle(&self) -> &AudioHandle {
        &self.handle
    }

    /// Keep the entry alive past this guard; the caller takes over release.
    pub fn persist(mut self) -> AudioHandle {
        self.armed = false;
        self.handle.clone()
    }
}

impl Drop for ScopedAudioHandle<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.store.revoke(&self.handle.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::{encode_wav, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};

    fn container(fill: u8) -> AudioContainer {
        encode_wav(&[fill; 4], DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let store = AudioStore::default();
        let handle = store.register(container(1));
        assert_eq!(handle.url, format!("/audio/{}", handle.id));

        let stored = store.get(&handle.id).unwrap();
        assert_eq!(stored.payload(), &[1, 1, 1, 1]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_revoke() {
        let store = AudioStore::default();
        let handle = store.register(container(2));
        assert!(store.revoke(&handle.id));
        assert!(store.get(&handle.id).is_none());
        assert!(!store.revoke(&handle.id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_scoped_handle_revokes_on_drop() {
        let store = AudioStore::default();
        let id = {
            let scoped = store.scoped(container(3));
            assert!(store.contains(&scoped.handle().id));
            scoped.handle().id
        };
        assert!(!store.contains(&id));
    }

    #[test]
    fn test_scoped_handle_persist() {
        let store = AudioStore::default();
        let handle = store.scoped(container(4)).persist();
        assert!(store.contains(&handle.id));
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let store = AudioStore::new(2, "/api/audio/");
        let first = store.register(container(1));
        let second = store.register(container(2));

        // touch the first entry so the second becomes the eviction candidate
        assert!(store.get(&first.id).is_some());
        let third = store.register(container(3));

        assert_eq!(store.len(), 2);
        assert!(store.contains(&first.id));
        assert!(!store.contains(&second.id));
        assert!(store.contains(&third.id));
        assert!(third.url.starts_with("/api/audio/"));
        assert!(!third.url.contains("//"));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let store = AudioStore::new(0, "/audio");
        assert_eq!(store.capacity(), 1);
    }
}
