use bytes::Bytes;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Thumbnail {
    pub data: Bytes,
    pub media_type: String,
}

struct Entry {
    thumbnail: Thumbnail,
    stored_at: Instant,
}

/// Thumbnail bytes keyed by video id. Bounded by entry count (least recently
/// used goes first) and by age.
#[derive(Clone)]
pub struct ThumbnailCache {
    inner: Arc<Mutex<LruCache<Uuid, Entry>>>,
    ttl: Duration,
}

impl ThumbnailCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<Uuid, Entry>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, video_id: Uuid, thumbnail: Thumbnail) {
        let mut cache = self.lock();
        if let Some((evicted, _)) = cache.push(
            video_id,
            Entry {
                thumbnail,
                stored_at: Instant::now(),
            },
        ) {
            if evicted != video_id {
                debug!(%evicted, "Thumbnail evicted");
            }
        }
    }

    pub fn get(&self, video_id: &Uuid) -> Option<Thumbnail> {
        let mut cache = self.lock();
        let expired = match cache.get(video_id) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                return Some(entry.thumbnail.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            cache.pop(video_id);
        }
        None
    }

    pub fn remove(&self, video_id: &Uuid) {
        self.lock().pop(video_id);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Called on shutdown.
    pub fn clear(&self) {
        self.lock().clear();
    }
}
