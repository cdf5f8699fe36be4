//! Client-side query cache.
//!
//! Entries are keyed by resource plus canonical query parameters and expire
//! after the resource's stale time. There is no dependency tracking: every
//! mutation path names the resource it stales via
//! [`QueryCache::invalidate_resource`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{AlertDto, BudgetWithCategoryDto, CategoryDto, MoneyNoteDto};
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

pub const DEFAULT_CACHE_CAPACITY: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    MoneyNotes,
    Categories,
    Alerts,
    Budgets,
}

impl Resource {
    pub fn name(self) -> &'static str {
        match self {
            Resource::MoneyNotes => "money-notes",
            Resource::Categories => "categories",
            Resource::Alerts => "alerts",
            Resource::Budgets => "budgets",
        }
    }

    /// How long a fetched list is served without refetching.
    pub fn stale_time(self) -> Duration {
        match self {
            Resource::MoneyNotes | Resource::Alerts => Duration::from_secs(2 * 60),
            Resource::Categories | Resource::Budgets => Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: Resource,
    /// Canonical `k=v&k=v` rendering of the query parameters.
    pub params: String,
}

impl QueryKey {
    pub fn new(resource: Resource, params: &[(&str, String)]) -> Self {
        let params = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");
        Self { resource, params }
    }
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    MoneyNotes(Arc<Vec<MoneyNoteDto>>),
    Categories(Arc<Vec<CategoryDto>>),
    Alerts(Arc<Vec<AlertDto>>),
    Budgets(Arc<Vec<BudgetWithCategoryDto>>),
}

/// A list type that can live in the cache.
pub trait CachedResource: Sized {
    const RESOURCE: Resource;

    fn wrap(items: Arc<Vec<Self>>) -> CachedData;

    fn unwrap(data: CachedData) -> Option<Arc<Vec<Self>>>;
}

macro_rules! cached_resource {
    ($ty:ty, $variant:ident) => {
        impl CachedResource for $ty {
            const RESOURCE: Resource = Resource::$variant;

            fn wrap(items: Arc<Vec<Self>>) -> CachedData {
                CachedData::$variant(items)
            }

            fn unwrap(data: CachedData) -> Option<Arc<Vec<Self>>> {
                match data {
                    CachedData::$variant(items) => Some(items),
                    _ => None,
                }
            }
        }
    };
}

cached_resource!(MoneyNoteDto, MoneyNotes);
cached_resource!(CategoryDto, Categories);
cached_resource!(AlertDto, Alerts);
cached_resource!(BudgetWithCategoryDto, Budgets);

struct StaleTime;

impl Expiry<QueryKey, CachedData> for StaleTime {
    fn expire_after_create(
        &self,
        key: &QueryKey,
        _value: &CachedData,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(key.resource.stale_time())
    }
}

#[derive(Clone, Debug)]
pub struct QueryCache {
    inner: Cache<QueryKey, CachedData>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl QueryCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(StaleTime)
            .build();
        Self { inner }
    }

    pub async fn get<T: CachedResource>(&self, key: &QueryKey) -> Option<Arc<Vec<T>>> {
        self.inner.get(key).await.and_then(T::unwrap)
    }

    pub async fn insert<T: CachedResource>(&self, key: QueryKey, items: Arc<Vec<T>>) {
        self.inner.insert(key, T::wrap(items)).await;
    }

    /// Drops every entry of `resource`, whatever its parameters.
    pub async fn invalidate_resource(&self, resource: Resource) {
        let stale: Vec<Arc<QueryKey>> = self
            .inner
            .iter()
            .filter(|(key, _)| key.resource == resource)
            .map(|(key, _)| key)
            .collect();

        for key in &stale {
            self.inner.invalidate(key.as_ref()).await;
        }
        debug!("Invalidated {} cached {} queries", stale.len(), resource.name());
    }

    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }
}
