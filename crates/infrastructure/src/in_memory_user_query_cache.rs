use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use opsdesk_application::UserQueryService;
use opsdesk_core::AppResult;
use opsdesk_domain::{USERS_DETAILS_QUERY_TAG, UserId, UserRecord};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct UserQueryKey {
    tag: &'static str,
    user_id: UserId,
}

impl UserQueryKey {
    fn user_details(user_id: UserId) -> Self {
        Self {
            tag: USERS_DETAILS_QUERY_TAG,
            user_id,
        }
    }
}

#[derive(Debug, Clone)]
struct UserQueryCacheEntry {
    record: UserRecord,
    expires_at: Instant,
}

/// Read-through cache in front of another query service.
///
/// Entries older than `stale_after` are refetched on the next read and dropped
/// whenever the source is called. A zero duration disables caching, which
/// matches how the console treats detail pages.
pub struct InMemoryUserQueryCache {
    source: Arc<dyn UserQueryService>,
    stale_after: Duration,
    entries: RwLock<HashMap<UserQueryKey, UserQueryCacheEntry>>,
}

impl InMemoryUserQueryCache {
    /// Creates an empty cache over a source query service.
    #[must_use]
    pub fn new(source: Arc<dyn UserQueryService>, stale_after: Duration) -> Self {
        Self {
            source,
            stale_after,
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn load_and_store(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.evict_expired().await;
        let record = self.source.fetch_user(user_id).await?;

        if self.stale_after.is_zero() {
            return Ok(record);
        }

        let now = Instant::now();
        let expires_at = now.checked_add(self.stale_after).unwrap_or(now);
        self.entries.write().await.insert(
            UserQueryKey::user_details(user_id),
            UserQueryCacheEntry {
                record: record.clone(),
                expires_at,
            },
        );

        Ok(record)
    }

    async fn evict_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);

        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "evicted expired user detail entries");
        }
    }
}

#[async_trait]
impl UserQueryService for InMemoryUserQueryCache {
    async fn fetch_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&UserQueryKey::user_details(user_id))
                && entry.expires_at > Instant::now()
            {
                debug!(user_id = %user_id, "serving user detail from cache");
                return Ok(entry.record.clone());
            }
        }

        self.load_and_store(user_id).await
    }

    async fn refetch_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.load_and_store(user_id).await
    }
}
