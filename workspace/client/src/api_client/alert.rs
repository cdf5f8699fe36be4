use common::{AlertDto, CreateAlertRequest, RecordStatus, UpdateAlertRequest, UtcRange};
use tracing::{debug, error, info, instrument, trace};

use super::ApiClient;
use crate::error::Result;

const ALERT_PATH: &str = "/api/v1/alert";

impl ApiClient {
    /// Active alerts overlapping the window.
    #[instrument(skip(self))]
    pub async fn list_alerts(&self, range: UtcRange) -> Result<Vec<AlertDto>> {
        trace!("Fetching alerts from {} to {}", range.start, range.end);
        let query = [
            ("start_date", range.start.to_string()),
            ("end_date", range.end.to_string()),
            ("status", RecordStatus::Active.code().to_string()),
        ];

        let result = self.get::<Vec<AlertDto>>(ALERT_PATH, &query).await;
        match &result {
            Ok(alerts) => info!("Fetched {} alerts", alerts.len()),
            Err(e) => error!("Failed to fetch alerts: {}", e),
        }
        result
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_alert(&self, request: &CreateAlertRequest) -> Result<()> {
        debug!(
            "Creating alert for category {} with limit {}",
            request.category_id, request.amount
        );
        self.post(ALERT_PATH, request).await?;
        info!("Successfully created alert: {}", request.title);
        Ok(())
    }

    /// The backend updates alerts with POST on the item path, not PUT.
    #[instrument(skip(self, request))]
    pub async fn update_alert(&self, id: i64, request: &UpdateAlertRequest) -> Result<()> {
        debug!("Updating alert ID: {}", id);
        self.post(&format!("{}/{}", ALERT_PATH, id), request).await?;
        info!("Successfully updated alert ID: {}", id);
        Ok(())
    }

    pub async fn deactivate_alert(&self, alert: &AlertDto) -> Result<()> {
        let request = UpdateAlertRequest {
            title: alert.title.clone(),
            amount: alert.threshold,
            status: RecordStatus::Inactive,
        };
        self.update_alert(alert.id, &request).await
    }
}
