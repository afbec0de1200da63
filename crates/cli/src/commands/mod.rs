pub mod categories;
pub mod config;
pub mod doctor;
pub mod submit;
pub mod ticket;

use std::sync::Arc;

use serde::Serialize;

use homzhub_api::{ApiClient, HttpAttachmentApi, HttpTicketApi};
use homzhub_core::config::AppConfig;
use homzhub_core::notify::TracingNotifier;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Shared wiring for the network-backed commands.
pub(crate) struct ApiHandles {
    pub tickets: Arc<HttpTicketApi>,
    pub attachments: Arc<HttpAttachmentApi>,
    pub notifier: Arc<TracingNotifier>,
}

pub(crate) fn api_handles(config: &AppConfig) -> Result<ApiHandles, String> {
    let client = ApiClient::new(&config.api)
        .map_err(|error| format!("failed to build api client: {error}"))?;
    let upload_timeout = std::time::Duration::from_secs(config.api.upload_timeout_secs);
    Ok(ApiHandles {
        tickets: Arc::new(HttpTicketApi::new(client.clone())),
        attachments: Arc::new(HttpAttachmentApi::new(client, upload_timeout)),
        notifier: Arc::new(TracingNotifier),
    })
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| format!("failed to initialize async runtime: {error}"))
}
