use common::{BudgetWithCategoryDto, CreateBudgetRequest, UpdateBudgetRequest};
use tracing::{debug, error, info, instrument};

use super::ApiClient;
use crate::error::Result;

const BUDGET_PATH: &str = "/api/v1/budget";

impl ApiClient {
    /// Budgets with their category name and server-computed usage.
    #[instrument(skip(self))]
    pub async fn list_budgets(&self) -> Result<Vec<BudgetWithCategoryDto>> {
        let result = self.get::<Vec<BudgetWithCategoryDto>>(BUDGET_PATH, &[]).await;
        match &result {
            Ok(budgets) => info!("Fetched {} budgets", budgets.len()),
            Err(e) => error!("Failed to fetch budgets: {}", e),
        }
        result
    }

    #[instrument(skip(self, request))]
    pub async fn create_budget(&self, request: &CreateBudgetRequest) -> Result<()> {
        debug!(
            "Creating {} budget for category {}",
            request.period_type.label(),
            request.category_id
        );
        self.post(BUDGET_PATH, request).await?;
        info!("Successfully created budget for category {}", request.category_id);
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn update_budget(&self, id: i64, request: &UpdateBudgetRequest) -> Result<()> {
        debug!("Updating budget ID: {}", id);
        self.put(&format!("{}/{}", BUDGET_PATH, id), request).await?;
        info!("Successfully updated budget ID: {}", id);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_budget(&self, id: i64) -> Result<()> {
        debug!("Deleting budget ID: {}", id);
        self.delete(&format!("{}/{}", BUDGET_PATH, id)).await?;
        info!("Successfully deleted budget ID: {}", id);
        Ok(())
    }
}
