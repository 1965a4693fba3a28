//! Background thumbnail loading with caching

use crate::domain::PhotoRef;
use crate::thumbnail::{request_thumbnail, TargetSize, Thumbnail};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};

/// Maximum number of cached thumbnails
const CACHE_SIZE: usize = 10;

/// Thumbnail loading state for the photo on screen
#[derive(Debug, Clone)]
pub enum ThumbnailState {
    Loading,
    Ready(Thumbnail),
    /// The photo could not be decoded; nothing to show
    Unavailable,
    Error(String),
}

impl ThumbnailState {
    fn from_decoded(decoded: Option<Thumbnail>) -> Self {
        match decoded {
            Some(thumbnail) => ThumbnailState::Ready(thumbnail),
            None => ThumbnailState::Unavailable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    target: TargetSize,
}

enum ThumbnailRequest {
    Load {
        photo: Arc<PhotoRef>,
        target: TargetSize,
        response_tx: oneshot::Sender<ThumbnailState>,
    },
    Shutdown,
}

/// LRU cache of decoded thumbnails.
///
/// Undecodable photos are cached as `None` so they are not decoded again.
#[derive(Debug)]
struct ThumbnailCache {
    cache: HashMap<CacheKey, Option<Thumbnail>>,
    /// Most recently used at the end
    access_order: Vec<CacheKey>,
    max_size: usize,
}

impl ThumbnailCache {
    fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            access_order: Vec::new(),
            max_size,
        }
    }

    fn get(&mut self, key: &CacheKey) -> Option<Option<Thumbnail>> {
        let entry = self.cache.get(key)?.clone();
        self.access_order.retain(|k| k != key);
        self.access_order.push(key.clone());
        Some(entry)
    }

    fn insert(&mut self, key: CacheKey, thumbnail: Option<Thumbnail>) {
        if self.cache.contains_key(&key) {
            self.access_order.retain(|k| k != &key);
        } else if self.cache.len() >= self.max_size {
            if let Some(oldest) = self.access_order.first().cloned() {
                self.cache.remove(&oldest);
                self.access_order.remove(0);
            }
        }

        self.cache.insert(key.clone(), thumbnail);
        self.access_order.push(key);
    }

    fn len(&self) -> usize {
        self.cache.len()
    }
}

/// Handle for sending requests to the background thumbnail worker
#[derive(Clone)]
pub struct ThumbnailLoader {
    request_tx: mpsc::Sender<ThumbnailRequest>,
    cache: Arc<Mutex<ThumbnailCache>>,
    /// Path being decoded right now. Cleared by the caller on cancel, not
    /// through the request queue, so it takes effect mid-decode.
    current_loading: Arc<Mutex<Option<PathBuf>>>,
}

impl ThumbnailLoader {
    /// Creates a loader and spawns its worker on the current tokio runtime
    pub fn new() -> Self {
        let (request_tx, request_rx) = mpsc::channel(32);
        let cache = Arc::new(Mutex::new(ThumbnailCache::new(CACHE_SIZE)));
        let current_loading = Arc::new(Mutex::new(None));

        let loader = Self {
            request_tx,
            cache: Arc::clone(&cache),
            current_loading: Arc::clone(&current_loading),
        };

        tokio::spawn(Self::worker(request_rx, cache, current_loading));

        loader
    }

    async fn worker(
        mut request_rx: mpsc::Receiver<ThumbnailRequest>,
        cache: Arc<Mutex<ThumbnailCache>>,
        current_loading: Arc<Mutex<Option<PathBuf>>>,
    ) {
        while let Some(request) = request_rx.recv().await {
            match request {
                ThumbnailRequest::Load {
                    photo,
                    target,
                    response_tx,
                } => {
                    // Nobody is waiting for it anymore
                    if response_tx.is_closed() {
                        continue;
                    }

                    let key = CacheKey {
                        path: photo.path.clone(),
                        target,
                    };

                    if let Some(cached) = cache.lock().await.get(&key) {
                        let _ = response_tx.send(ThumbnailState::from_decoded(cached));
                        continue;
                    }

                    *current_loading.lock().await = Some(key.path.clone());

                    let result =
                        tokio::task::spawn_blocking(move || request_thumbnail(&photo, target))
                            .await;

                    let state = match result {
                        Ok(Ok(decoded)) => {
                            // Cached even when cancelled; the cursor may come back
                            cache.lock().await.insert(key.clone(), decoded.clone());
                            ThumbnailState::from_decoded(decoded)
                        }
                        Ok(Err(e)) => ThumbnailState::Error(e.to_string()),
                        Err(e) => ThumbnailState::Error(format!("Task panicked: {}", e)),
                    };

                    let cancelled = {
                        let mut loading = current_loading.lock().await;
                        let cancelled = loading.as_ref() != Some(&key.path);
                        if !cancelled {
                            *loading = None;
                        }
                        cancelled
                    };

                    if cancelled {
                        tracing::trace!(photo = %key.path.display(), "thumbnail cancelled");
                    } else {
                        let _ = response_tx.send(state);
                    }
                }
                ThumbnailRequest::Shutdown => break,
            }
        }

        tracing::debug!("thumbnail worker stopped");
    }

    /// Queues a request and returns the receiver without waiting
    async fn submit(
        &self,
        photo: Arc<PhotoRef>,
        target: TargetSize,
    ) -> Option<oneshot::Receiver<ThumbnailState>> {
        let (response_tx, response_rx) = oneshot::channel();
        let request = ThumbnailRequest::Load {
            photo,
            target,
            response_tx,
        };
        self.request_tx.send(request).await.ok()?;
        Some(response_rx)
    }

    async fn get_cached(&self, path: &PathBuf, target: TargetSize) -> Option<Option<Thumbnail>> {
        let key = CacheKey {
            path: path.clone(),
            target,
        };
        self.cache.lock().await.get(&key)
    }

    /// Cancels whatever is being decoded right now.
    ///
    /// The decode still finishes and is cached, but its response is dropped.
    pub async fn cancel_current(&self) {
        *self.current_loading.lock().await = None;
    }

    pub async fn shutdown(&self) {
        let _ = self.request_tx.send(ThumbnailRequest::Shutdown).await;
    }

    pub async fn cache_size(&self) -> usize {
        self.cache.lock().await.len()
    }
}

impl Default for ThumbnailLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Polling front end to [`ThumbnailLoader`] for the synchronous UI loop.
///
/// Owns its own runtime. `request` never blocks on decoding; call it every
/// frame and it moves from `Loading` to a final state once the worker answers.
pub struct SyncThumbnailManager {
    loader: ThumbnailLoader,
    runtime: tokio::runtime::Runtime,
    current_state: ThumbnailState,
    current_key: Option<CacheKey>,
    receiver: Option<oneshot::Receiver<ThumbnailState>>,
}

impl SyncThumbnailManager {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let loader = runtime.block_on(async { ThumbnailLoader::new() });

        Ok(Self {
            loader,
            runtime,
            current_state: ThumbnailState::Loading,
            current_key: None,
            receiver: None,
        })
    }

    /// Returns the state of the thumbnail for `photo`, starting a load if needed
    pub fn request(&mut self, photo: &Arc<PhotoRef>, target: TargetSize) -> &ThumbnailState {
        let key = CacheKey {
            path: photo.path.clone(),
            target,
        };

        if self.current_key.as_ref() != Some(&key) {
            if self.current_key.is_some() {
                self.runtime.block_on(self.loader.cancel_current());
            }

            self.current_key = Some(key.clone());
            self.receiver = None;

            if let Some(cached) = self
                .runtime
                .block_on(self.loader.get_cached(&key.path, target))
            {
                self.current_state = ThumbnailState::from_decoded(cached);
                return &self.current_state;
            }

            self.current_state = ThumbnailState::Loading;
            self.receiver = self
                .runtime
                .block_on(self.loader.submit(Arc::clone(photo), target));
            if self.receiver.is_none() {
                self.current_state =
                    ThumbnailState::Error("Thumbnail loader shut down".to_string());
            }
        }

        if matches!(self.current_state, ThumbnailState::Loading) {
            if let Some(ref mut rx) = self.receiver {
                match rx.try_recv() {
                    Ok(state) => {
                        self.current_state = state;
                        self.receiver = None;
                    }
                    Err(oneshot::error::TryRecvError::Empty) => {}
                    Err(oneshot::error::TryRecvError::Closed) => {
                        // Cancelled responses are dropped; the cache may still have it
                        self.current_state = match self
                            .runtime
                            .block_on(self.loader.get_cached(&key.path, target))
                        {
                            Some(cached) => ThumbnailState::from_decoded(cached),
                            None => ThumbnailState::Error("Thumbnail channel closed".to_string()),
                        };
                        self.receiver = None;
                    }
                }
            }
        }

        &self.current_state
    }

    pub fn current_state(&self) -> &ThumbnailState {
        &self.current_state
    }

    /// Forgets the current photo, e.g. after the cursor moved
    pub fn reset(&mut self) {
        if self.current_key.is_some() {
            self.runtime.block_on(self.loader.cancel_current());
        }
        self.current_key = None;
        self.current_state = ThumbnailState::Loading;
        self.receiver = None;
    }

    pub fn cache_size(&self) -> usize {
        self.runtime.block_on(self.loader.cache_size())
    }
}

impl Drop for SyncThumbnailManager {
    fn drop(&mut self) {
        self.runtime.block_on(self.loader.shutdown());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::path::Path;
    use tempfile::TempDir;

    const TARGET: TargetSize = TargetSize {
        columns: 40,
        rows: 20,
    };

    fn write_png(path: &Path) -> Arc<PhotoRef> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb([9, 9, 9]));
        img.save(path).unwrap();
        Arc::new(PhotoRef::from_path(path).unwrap())
    }

    fn thumbnail() -> Thumbnail {
        Thumbnail {
            original_width: 1,
            original_height: 1,
            lines: vec![],
        }
    }

    fn key(name: &str) -> CacheKey {
        CacheKey {
            path: PathBuf::from(name),
            target: TARGET,
        }
    }

    mod cache_tests {
        use super::*;

        #[test]
        fn test_cache_insert_and_get() {
            let mut cache = ThumbnailCache::new(3);
            cache.insert(key("a.jpg"), Some(thumbnail()));

            assert!(cache.cache.contains_key(&key("a.jpg")));
            assert!(matches!(cache.get(&key("a.jpg")), Some(Some(_))));
            assert!(cache.get(&key("b.jpg")).is_none());
        }

        #[test]
        fn test_cache_remembers_undecodable() {
            let mut cache = ThumbnailCache::new(3);
            cache.insert(key("broken.jpg"), None);
            assert!(matches!(cache.get(&key("broken.jpg")), Some(None)));
        }

        #[test]
        fn test_cache_lru_eviction() {
            let mut cache = ThumbnailCache::new(2);
            cache.insert(key("a.jpg"), Some(thumbnail()));
            cache.insert(key("b.jpg"), Some(thumbnail()));
            cache.insert(key("c.jpg"), Some(thumbnail()));

            assert_eq!(cache.len(), 2);
            assert!(!cache.cache.contains_key(&key("a.jpg")));
            assert!(cache.cache.contains_key(&key("b.jpg")));
            assert!(cache.cache.contains_key(&key("c.jpg")));
        }

        #[test]
        fn test_cache_access_updates_order() {
            let mut cache = ThumbnailCache::new(2);
            cache.insert(key("a.jpg"), Some(thumbnail()));
            cache.insert(key("b.jpg"), Some(thumbnail()));

            cache.get(&key("a.jpg"));
            cache.insert(key("c.jpg"), Some(thumbnail()));

            assert!(cache.cache.contains_key(&key("a.jpg")));
            assert!(!cache.cache.contains_key(&key("b.jpg")));
        }

        #[test]
        fn test_cache_reinsert_does_not_evict() {
            let mut cache = ThumbnailCache::new(2);
            cache.insert(key("a.jpg"), None);
            cache.insert(key("b.jpg"), None);
            cache.insert(key("a.jpg"), Some(thumbnail()));

            assert_eq!(cache.len(), 2);
            assert!(cache.cache.contains_key(&key("b.jpg")));
        }
    }

    mod loader_tests {
        use super::*;

        async fn load(loader: &ThumbnailLoader, photo: Arc<PhotoRef>) -> ThumbnailState {
            let rx = loader.submit(photo, TARGET).await.unwrap();
            rx.await.unwrap()
        }

        #[tokio::test]
        async fn test_loader_returns_and_caches() {
            let temp_dir = TempDir::new().unwrap();
            let photo = write_png(&temp_dir.path().join("a.png"));

            let loader = ThumbnailLoader::new();
            let state = load(&loader, Arc::clone(&photo)).await;

            assert!(matches!(state, ThumbnailState::Ready(_)));
            assert!(matches!(
                loader.get_cached(&photo.path, TARGET).await,
                Some(Some(_))
            ));
            assert_eq!(loader.cache_size().await, 1);
        }

        #[tokio::test]
        async fn test_loader_undecodable_photo() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("broken.jpg");
            std::fs::write(&path, b"garbage").unwrap();
            let photo = Arc::new(PhotoRef::from_path(&path).unwrap());

            let loader = ThumbnailLoader::new();
            let state = load(&loader, Arc::clone(&photo)).await;

            assert!(matches!(state, ThumbnailState::Unavailable));
            assert!(matches!(
                loader.get_cached(&photo.path, TARGET).await,
                Some(None)
            ));
        }

        #[tokio::test]
        async fn test_loader_missing_photo() {
            let photo = Arc::new(PhotoRef {
                path: PathBuf::from("/nonexistent/photo.png"),
                name: "photo.png".to_string(),
                size: 0,
                created: None,
            });

            let loader = ThumbnailLoader::new();
            let state = load(&loader, photo).await;

            assert!(matches!(state, ThumbnailState::Error(_)));
            assert_eq!(loader.cache_size().await, 0);
        }

        #[tokio::test]
        async fn test_loader_after_shutdown() {
            let temp_dir = TempDir::new().unwrap();
            let photo = write_png(&temp_dir.path().join("a.png"));

            let loader = ThumbnailLoader::new();
            loader.shutdown().await;
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;

            assert!(loader.submit(photo, TARGET).await.is_none());
        }

        #[tokio::test]
        async fn test_cancel_clears_in_flight_path_immediately() {
            let loader = ThumbnailLoader::new();
            *loader.current_loading.lock().await = Some(PathBuf::from("a.png"));

            // Takes effect without waiting for the worker to drain its queue
            loader.cancel_current().await;

            assert!(loader.current_loading.lock().await.is_none());
        }

        #[tokio::test]
        async fn test_abandoned_request_is_not_decoded() {
            let temp_dir = TempDir::new().unwrap();
            let skipped = write_png(&temp_dir.path().join("skipped.png"));
            let wanted = write_png(&temp_dir.path().join("wanted.png"));

            let loader = ThumbnailLoader::new();
            // The worker has not run yet on this single-threaded runtime
            drop(loader.submit(Arc::clone(&skipped), TARGET).await);

            let state = load(&loader, Arc::clone(&wanted)).await;

            assert!(matches!(state, ThumbnailState::Ready(_)));
            assert!(loader.get_cached(&skipped.path, TARGET).await.is_none());
            assert_eq!(loader.cache_size().await, 1);
        }
    }

    mod sync_manager_tests {
        use super::*;

        fn poll_until_settled(
            manager: &mut SyncThumbnailManager,
            photo: &Arc<PhotoRef>,
        ) -> ThumbnailState {
            for _ in 0..40 {
                let state = manager.request(photo, TARGET).clone();
                if !matches!(state, ThumbnailState::Loading) {
                    return state;
                }
                std::thread::sleep(std::time::Duration::from_millis(25));
            }
            ThumbnailState::Loading
        }

        #[test]
        fn test_sync_manager_creation() {
            let manager = SyncThumbnailManager::new().unwrap();
            assert_eq!(manager.cache_size(), 0);
            assert!(matches!(manager.current_state(), ThumbnailState::Loading));
        }

        #[test]
        fn test_sync_manager_loads_thumbnail() {
            let temp_dir = TempDir::new().unwrap();
            let photo = write_png(&temp_dir.path().join("a.png"));

            let mut manager = SyncThumbnailManager::new().unwrap();
            let state = poll_until_settled(&mut manager, &photo);

            assert!(matches!(state, ThumbnailState::Ready(_)));
        }

        #[test]
        fn test_sync_manager_serves_cache_after_reset() {
            let temp_dir = TempDir::new().unwrap();
            let photo = write_png(&temp_dir.path().join("a.png"));

            let mut manager = SyncThumbnailManager::new().unwrap();
            poll_until_settled(&mut manager, &photo);
            assert_eq!(manager.cache_size(), 1);

            manager.reset();
            assert!(matches!(manager.current_state(), ThumbnailState::Loading));

            let state = manager.request(&photo, TARGET);
            assert!(matches!(state, ThumbnailState::Ready(_)));
        }

        #[test]
        fn test_sync_manager_switches_photos() {
            let temp_dir = TempDir::new().unwrap();
            let first = write_png(&temp_dir.path().join("first.png"));
            let second = write_png(&temp_dir.path().join("second.png"));

            let mut manager = SyncThumbnailManager::new().unwrap();
            let _ = manager.request(&first, TARGET);

            let state = poll_until_settled(&mut manager, &second);
            assert!(matches!(state, ThumbnailState::Ready(_)));
        }

        #[test]
        fn test_sync_manager_returns_to_cancelled_photo() {
            let temp_dir = TempDir::new().unwrap();
            let first = write_png(&temp_dir.path().join("first.png"));
            let second = write_png(&temp_dir.path().join("second.png"));

            let mut manager = SyncThumbnailManager::new().unwrap();
            let _ = manager.request(&first, TARGET);
            poll_until_settled(&mut manager, &second);

            let state = poll_until_settled(&mut manager, &first);
            assert!(matches!(state, ThumbnailState::Ready(_)));
        }
    }
}
