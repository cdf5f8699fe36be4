use common::FinanceChatRequest;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::ApiClient;
use crate::error::Result;

const FINANCE_AI_CHAT_PATH: &str = "/api/v3/finance-ai/chat";

fn chat_form(request: &FinanceChatRequest) -> Result<Form> {
    let mut form = Form::new().text("chat", request.chat.clone());

    if let Some(file) = &request.file {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        form = form.part("file", part);
    }
    if let Some(model) = &request.model {
        form = form.text("model", model.clone());
    }
    if let Some(temperature) = request.temperature {
        form = form.text("temperature", temperature.to_string());
    }
    Ok(form)
}

impl ApiClient {
    /// Sends a message (and optional receipt image or audio) to the finance
    /// assistant. The reply is returned as-is; `Value::Null` when it has no JSON body.
    #[instrument(skip(self, request), fields(has_file = request.file.is_some()))]
    pub async fn finance_chat(&self, request: &FinanceChatRequest) -> Result<Value> {
        debug!("Sending finance chat message ({} chars)", request.chat.len());
        let form = chat_form(request)?;
        let reply = self.post_multipart(FINANCE_AI_CHAT_PATH, form).await?;
        info!("Finance chat reply received");
        Ok(reply.unwrap_or(Value::Null))
    }
}
