use common::{CategoryDto, CreateCategoryRequest, RecordStatus, UpdateCategoryRequest};
use tracing::{debug, error, info, instrument, trace};

use super::ApiClient;
use crate::error::Result;

const CATEGORY_PATH: &str = "/api/v1/category";

impl ApiClient {
    /// Categories, optionally restricted to one status.
    #[instrument(skip(self))]
    pub async fn list_categories(&self, status: Option<RecordStatus>) -> Result<Vec<CategoryDto>> {
        trace!("Fetching categories");
        let query: Vec<(&str, String)> = status
            .map(|status| vec![("status", status.code().to_string())])
            .unwrap_or_default();

        let result = self.get::<Vec<CategoryDto>>(CATEGORY_PATH, &query).await;
        match &result {
            Ok(categories) => info!("Fetched {} categories", categories.len()),
            Err(e) => error!("Failed to fetch categories: {}", e),
        }
        result
    }

    pub async fn list_active_categories(&self) -> Result<Vec<CategoryDto>> {
        self.list_categories(Some(RecordStatus::Active)).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(&self, request: &CreateCategoryRequest) -> Result<()> {
        debug!("Creating new category: {}", request.name);
        match self.post(CATEGORY_PATH, request).await {
            Ok(_) => {
                info!("Successfully created category: {}", request.name);
                Ok(())
            }
            Err(e) => {
                error!("Failed to create category '{}': {}", request.name, e);
                Err(e)
            }
        }
    }

    #[instrument(skip(self, request))]
    pub async fn update_category(&self, id: i64, request: &UpdateCategoryRequest) -> Result<()> {
        debug!("Updating category ID: {}", id);
        self.put(&format!("{}/{}", CATEGORY_PATH, id), request).await?;
        info!("Successfully updated category ID: {}", id);
        Ok(())
    }

    /// Soft delete: the category keeps its name and type, only the status changes.
    pub async fn deactivate_category(&self, category: &CategoryDto) -> Result<()> {
        let request = UpdateCategoryRequest {
            kind: category.kind,
            name: category.name.clone(),
            status: Some(RecordStatus::Inactive),
        };
        self.update_category(category.id, &request).await
    }
}
