use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use common::{ChatAttachment, FinanceChatRequest};
use tracing::debug;

use super::user_facing;
use crate::cli::AppContext;

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// Message for the assistant
    pub message: String,
    /// Receipt image or voice recording to attach
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub temperature: Option<f32>,
}

/// MIME type from the file extension; unknown extensions are sent as raw bytes.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("wav") => "audio/wav",
        Some("webm") => "audio/webm",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

async fn attachment(path: &Path) -> Result<ChatAttachment> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("attachment")
        .to_string();
    debug!("Attaching {} ({} bytes)", file_name, bytes.len());
    Ok(ChatAttachment {
        file_name,
        mime_type: guess_mime_type(path).to_string(),
        bytes,
    })
}

pub async fn run(ctx: &AppContext, args: AskArgs) -> Result<()> {
    let file = match &args.file {
        Some(path) => Some(attachment(path).await?),
        None => None,
    };
    let request = FinanceChatRequest {
        chat: args.message,
        file,
        model: args.model,
        temperature: args.temperature,
    };

    let reply = ctx
        .queries
        .api()
        .finance_chat(&request)
        .await
        .map_err(user_facing)?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
