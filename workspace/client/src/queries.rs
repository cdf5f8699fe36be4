//! Cached reads and invalidating mutations on top of [`ApiClient`].

use std::future::Future;
use std::sync::Arc;

use common::{
    AlertDto, BudgetWithCategoryDto, CategoryDto, CreateAlertRequest, CreateBudgetRequest,
    CreateCategoryRequest, CreateMoneyNoteRequest, MoneyNoteDto, MoneyNoteQuery, RecordStatus,
    UpdateAlertRequest, UpdateBudgetRequest, UpdateCategoryRequest, UpdateMoneyNoteRequest,
    UtcRange,
};
use tracing::debug;

use crate::api_client::ApiClient;
use crate::cache::{CachedResource, QueryCache, QueryKey, Resource};
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct QueryClient {
    api: ApiClient,
    cache: QueryCache,
}

impl QueryClient {
    pub fn new(api: ApiClient) -> Self {
        Self::with_cache(api, QueryCache::default())
    }

    pub fn with_cache(api: ApiClient, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Serves the query from the cache, or awaits `fetch` and stores the result.
    /// Failed fetches are not cached.
    async fn cached<T, F>(&self, params: &[(&str, String)], fetch: F) -> Result<Arc<Vec<T>>>
    where
        T: CachedResource,
        F: Future<Output = Result<Vec<T>>>,
    {
        let key = QueryKey::new(T::RESOURCE, params);
        if let Some(items) = self.cache.get::<T>(&key).await {
            debug!("Serving {} [{}] from cache", T::RESOURCE.name(), key.params);
            return Ok(items);
        }

        let items = Arc::new(fetch.await?);
        self.cache.insert(key, items.clone()).await;
        Ok(items)
    }

    // ===================== Reads =====================

    pub async fn money_notes(&self, query: &MoneyNoteQuery) -> Result<Arc<Vec<MoneyNoteDto>>> {
        self.cached(&query.to_params(), self.api.list_money_notes(query))
            .await
    }

    pub async fn active_categories(&self) -> Result<Arc<Vec<CategoryDto>>> {
        let params = [("status", RecordStatus::Active.code().to_string())];
        self.cached(&params, self.api.list_active_categories()).await
    }

    pub async fn alerts(&self, range: UtcRange) -> Result<Arc<Vec<AlertDto>>> {
        let params = [
            ("start_date", range.start.to_string()),
            ("end_date", range.end.to_string()),
        ];
        self.cached(&params, self.api.list_alerts(range)).await
    }

    pub async fn budgets(&self) -> Result<Arc<Vec<BudgetWithCategoryDto>>> {
        self.cached(&[], self.api.list_budgets()).await
    }

    // ===================== Money notes =====================

    pub async fn create_money_notes(&self, notes: &[CreateMoneyNoteRequest]) -> Result<()> {
        self.api.create_money_notes(notes).await?;
        self.cache.invalidate_resource(Resource::MoneyNotes).await;
        Ok(())
    }

    pub async fn update_money_note(&self, id: i64, request: &UpdateMoneyNoteRequest) -> Result<()> {
        self.api.update_money_note(id, request).await?;
        self.cache.invalidate_resource(Resource::MoneyNotes).await;
        Ok(())
    }

    pub async fn deactivate_money_note(&self, note: &MoneyNoteDto) -> Result<()> {
        self.api.deactivate_money_note(note).await?;
        self.cache.invalidate_resource(Resource::MoneyNotes).await;
        Ok(())
    }

    pub async fn delete_money_note(&self, id: i64) -> Result<()> {
        self.api.delete_money_note(id).await?;
        self.cache.invalidate_resource(Resource::MoneyNotes).await;
        Ok(())
    }

    // ===================== Categories =====================

    pub async fn create_category(&self, request: &CreateCategoryRequest) -> Result<()> {
        self.api.create_category(request).await?;
        self.cache.invalidate_resource(Resource::Categories).await;
        Ok(())
    }

    pub async fn update_category(&self, id: i64, request: &UpdateCategoryRequest) -> Result<()> {
        self.api.update_category(id, request).await?;
        self.cache.invalidate_resource(Resource::Categories).await;
        Ok(())
    }

    pub async fn deactivate_category(&self, category: &CategoryDto) -> Result<()> {
        self.api.deactivate_category(category).await?;
        self.cache.invalidate_resource(Resource::Categories).await;
        Ok(())
    }

    // ===================== Alerts =====================

    pub async fn create_alert(&self, request: &CreateAlertRequest) -> Result<()> {
        self.api.create_alert(request).await?;
        self.cache.invalidate_resource(Resource::Alerts).await;
        Ok(())
    }

    pub async fn update_alert(&self, id: i64, request: &UpdateAlertRequest) -> Result<()> {
        self.api.update_alert(id, request).await?;
        self.cache.invalidate_resource(Resource::Alerts).await;
        Ok(())
    }

    pub async fn deactivate_alert(&self, alert: &AlertDto) -> Result<()> {
        self.api.deactivate_alert(alert).await?;
        self.cache.invalidate_resource(Resource::Alerts).await;
        Ok(())
    }

    // ===================== Budgets =====================

    pub async fn create_budget(&self, request: &CreateBudgetRequest) -> Result<()> {
        self.api.create_budget(request).await?;
        self.cache.invalidate_resource(Resource::Budgets).await;
        Ok(())
    }

    pub async fn update_budget(&self, id: i64, request: &UpdateBudgetRequest) -> Result<()> {
        self.api.update_budget(id, request).await?;
        self.cache.invalidate_resource(Resource::Budgets).await;
        Ok(())
    }

    pub async fn delete_budget(&self, id: i64) -> Result<()> {
        self.api.delete_budget(id).await?;
        self.cache.invalidate_resource(Resource::Budgets).await;
        Ok(())
    }
}
