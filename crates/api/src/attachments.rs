use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;

use homzhub_core::domain::quote::{AttachmentId, FileRef};

use crate::client::ApiClient;
use crate::error::ApiError;

/// External collaborator that stores uploaded files and hands back
/// stable attachment identifiers.
#[async_trait]
pub trait AttachmentApi: Send + Sync {
    async fn upload(&self, file: &FileRef) -> Result<AttachmentId, ApiError>;
}

#[derive(Clone)]
pub struct HttpAttachmentApi {
    client: ApiClient,
    upload_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    #[serde(default)]
    data: Vec<UploadedFile>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    id: i64,
}

impl HttpAttachmentApi {
    pub fn new(client: ApiClient, upload_timeout: Duration) -> Self {
        Self { client, upload_timeout }
    }
}

#[async_trait]
impl AttachmentApi for HttpAttachmentApi {
    async fn upload(&self, file: &FileRef) -> Result<AttachmentId, ApiError> {
        let bytes = tokio::fs::read(&file.path).await.map_err(|error| ApiError::FileRead {
            name: file.name.clone(),
            message: error.to_string(),
        })?;

        let part = Part::bytes(bytes).file_name(file.name.clone()).mime_str(&file.mime)?;
        let form = Form::new().part("files[]", part);

        let response = self
            .client
            .request(Method::POST, "attachments")
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await?;
        let response = ApiClient::ensure_success(response).await?;
        let envelope: UploadEnvelope = ApiClient::parse_json(response).await?;

        // The service reports corrupt files inside a 2xx body.
        if let Some(error) = envelope.error {
            return Err(ApiError::UploadRejected(error));
        }
        let uploaded = envelope.data.first().ok_or_else(|| {
            ApiError::UploadRejected("attachment service returned no id".to_string())
        })?;
        Ok(AttachmentId(uploaded.id))
    }
}
