use common::{
    CreateMoneyNoteRequest, MoneyNoteDto, MoneyNoteQuery, RecordStatus, UpdateMoneyNoteRequest,
};
use tracing::{debug, error, info, instrument, trace};

use super::ApiClient;
use crate::error::Result;

const MONEY_NOTE_PATH: &str = "/api/v1/money-note";

impl ApiClient {
    /// Money notes dated inside the query window.
    #[instrument(skip(self))]
    pub async fn list_money_notes(&self, query: &MoneyNoteQuery) -> Result<Vec<MoneyNoteDto>> {
        trace!(
            "Fetching money notes from {} to {}",
            query.range.start, query.range.end
        );
        let result = self
            .get::<Vec<MoneyNoteDto>>(MONEY_NOTE_PATH, &query.to_params())
            .await;
        match &result {
            Ok(notes) => info!("Fetched {} money notes", notes.len()),
            Err(e) => error!("Failed to fetch money notes: {}", e),
        }
        result
    }

    /// Bulk create; the backend takes an array even for a single note.
    #[instrument(skip(self, notes), fields(count = notes.len()))]
    pub async fn create_money_notes(&self, notes: &[CreateMoneyNoteRequest]) -> Result<()> {
        debug!("Creating {} money notes", notes.len());
        self.post(MONEY_NOTE_PATH, &notes).await?;
        info!("Successfully created {} money notes", notes.len());
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn update_money_note(&self, id: i64, request: &UpdateMoneyNoteRequest) -> Result<()> {
        debug!("Updating money note ID: {}", id);
        self.put(&format!("{}/{}", MONEY_NOTE_PATH, id), request).await?;
        info!("Successfully updated money note ID: {}", id);
        Ok(())
    }

    /// Soft delete: resends the note with an inactive status.
    pub async fn deactivate_money_note(&self, note: &MoneyNoteDto) -> Result<()> {
        let request = UpdateMoneyNoteRequest {
            note: note.note.clone(),
            amount: note.amount,
            category_id: note.category_id,
            status: Some(RecordStatus::Inactive),
        };
        self.update_money_note(note.id, &request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_money_note(&self, id: i64) -> Result<()> {
        debug!("Deleting money note ID: {}", id);
        self.delete(&format!("{}/{}", MONEY_NOTE_PATH, id)).await?;
        info!("Successfully deleted money note ID: {}", id);
        Ok(())
    }
}
