//! In-memory caches for annotation lookups.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::types::AnnotationStatus;

#[derive(Clone)]
struct TaskCacheEntry {
    status: AnnotationStatus,
    expires_at: Instant,
}

impl TaskCacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Annotation server URL plus the looked-up key.
type ServerKey<K> = (String, K);

fn server_key<K>(url: &str, key: K) -> ServerKey<K> {
    (url.to_string(), key)
}

/// TTL-bounded cache of task lookups keyed by server URL and exact task name.
///
/// Expired entries are not evicted; they are ignored on read and
/// overwritten by the next refresh.
#[derive(Default)]
pub struct TaskLookupCache {
    entries: DashMap<ServerKey<String>, TaskCacheEntry>,
    /// Per-name locks so concurrent misses for one name refresh once.
    /// Removed again once no caller holds them.
    refresh_locks: DashMap<ServerKey<String>, Arc<Mutex<()>>>,
}

impl TaskLookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached status for `name` on `url`, if present and unexpired.
    pub fn get(&self, url: &str, name: &str) -> Option<AnnotationStatus> {
        let entry = self.entries.get(&server_key(url, name.to_string()))?;
        if entry.is_expired() {
            return None;
        }
        Some(entry.status.clone())
    }

    pub fn insert(&self, url: &str, name: &str, status: AnnotationStatus, ttl: Duration) {
        self.entries.insert(
            server_key(url, name.to_string()),
            TaskCacheEntry {
                status,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn refresh_lock(&self, url: &str, name: &str) -> Arc<Mutex<()>> {
        self.refresh_locks
            .entry(server_key(url, name.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Hand back a lock from [`refresh_lock`](Self::refresh_lock). The map
    /// entry is dropped when no other caller holds or waits on it.
    pub fn release_refresh_lock(&self, url: &str, name: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.refresh_locks
            .remove_if(&server_key(url, name.to_string()), |_, lock| {
                Arc::strong_count(lock) == 1
            });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of refresh locks currently tracked.
    pub fn refresh_lock_count(&self) -> usize {
        self.refresh_locks.len()
    }
}

/// Project id to display name, per server. Projects are treated as
/// immutable, so there is no TTL.
#[derive(Default)]
pub struct ProjectNameCache {
    names: DashMap<ServerKey<i64>, String>,
}

impl ProjectNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str, project_id: i64) -> Option<String> {
        self.names
            .get(&server_key(url, project_id))
            .map(|name| name.clone())
    }

    pub fn insert(&self, url: &str, project_id: i64, name: String) {
        self.names.insert(server_key(url, project_id), name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://cvat";

    #[tokio::test]
    async fn test_task_entry_expires() {
        let cache = TaskLookupCache::new();
        cache.insert(URL, "cam1", AnnotationStatus::not_found(), Duration::from_millis(20));
        assert!(cache.get(URL, "cam1").is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(URL, "cam1").is_none());
        // still stored until superseded
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_is_never_a_hit() {
        let cache = TaskLookupCache::new();
        cache.insert(URL, "cam1", AnnotationStatus::not_found(), Duration::ZERO);
        assert!(cache.get(URL, "cam1").is_none());
    }

    #[test]
    fn test_entries_are_scoped_to_server() {
        let cache = TaskLookupCache::new();
        cache.insert(URL, "cam1", AnnotationStatus::not_found(), Duration::from_secs(60));
        assert!(cache.get(URL, "cam1").is_some());
        assert!(cache.get("http://other", "cam1").is_none());
    }

    #[test]
    fn test_refresh_lock_is_shared_per_name() {
        let cache = TaskLookupCache::new();
        let a = cache.refresh_lock(URL, "cam1");
        let b = cache.refresh_lock(URL, "cam1");
        let c = cache.refresh_lock(URL, "cam2");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_released_lock_is_dropped_once_unused() {
        let cache = TaskLookupCache::new();
        let first = cache.refresh_lock(URL, "cam1");
        let second = cache.refresh_lock(URL, "cam1");

        cache.release_refresh_lock(URL, "cam1", first);
        assert_eq!(cache.refresh_lock_count(), 1);

        cache.release_refresh_lock(URL, "cam1", second);
        assert_eq!(cache.refresh_lock_count(), 0);
    }

    #[test]
    fn test_project_names() {
        let cache = ProjectNameCache::new();
        assert_eq!(cache.get(URL, 7), None);
        cache.insert(URL, 7, "Belts".to_string());
        assert_eq!(cache.get(URL, 7).as_deref(), Some("Belts"));
        assert_eq!(cache.get("http://other", 7), None);
    }
}
