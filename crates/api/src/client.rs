use std::time::Duration;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use homzhub_core::config::ApiConfig;

use crate::error::ApiError;

/// Shared HTTP plumbing for every endpoint wrapper: one pooled client,
/// the base URL, and the bearer credential.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: SecretString,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(http, config.base_url.clone(), config.bearer_token.clone()))
    }

    /// Reuse an existing `reqwest::Client` so wrappers share one
    /// connection pool.
    pub fn with_client(
        http: reqwest::Client,
        base_url: String,
        bearer_token: SecretString,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { http, base_url, bearer_token }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        debug!(event_name = "api.request", %method, path, "dispatching api request");
        self.http.request(method, self.url(path)).bearer_auth(self.bearer_token.expose_secret())
    }

    pub(crate) async fn get_json<T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::parse_json(Self::ensure_success(response).await?).await
    }

    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    pub(crate) async fn patch_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    pub(crate) async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response_body(status.as_u16(), &body));
        }
        Ok(response)
    }

    pub(crate) async fn parse_json<T>(response: reqwest::Response) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        response.json::<T>().await.map_err(|error| ApiError::Decode(error.to_string()))
    }
}
