//! reqwest implementation of [`Backend`].

use reqwest::{RequestBuilder, Response, Url};
use ripdash_core::error::ErrorDetail;
use ripdash_core::{DriveSnapshot, JobSnapshot, SystemSnapshot};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::backend::Backend;
use crate::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// HTTP basic credentials; the backend guards every endpoint with them.
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: None,
            password: None,
        }
    }
}

pub struct HttpBackend {
    base: Url,
    username: Option<String>,
    password: Option<String>,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url));
        }
        Ok(Self {
            base,
            username: config.username,
            password: config.password,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build an endpoint URL under the base, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => req.basic_auth(user, self.password.as_deref()),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                detail: ErrorDetail::parse(&body).map(|d| d.message()),
            });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "backend GET");

        let resp = self.send(self.client.get(url)).await?;
        resp.json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn post(
        &self,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "backend POST");

        let mut req = self.client.post(url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        self.send(req).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn system_info(&self) -> Result<SystemSnapshot, ClientError> {
        self.get_json(&["api", "system-info"]).await
    }

    async fn drives(&self) -> Result<Vec<DriveSnapshot>, ClientError> {
        self.get_json(&["api", "drives"]).await
    }

    async fn jobs(&self) -> Result<Vec<JobSnapshot>, ClientError> {
        self.get_json(&["api", "jobs"]).await
    }

    async fn eject(&self, path: &str) -> Result<(), ClientError> {
        self.post(
            &["api", "drives", "eject"],
            Some(serde_json::json!({ "path": path })),
        )
        .await
    }

    async fn cancel_job(&self, job_id: &str) -> Result<(), ClientError> {
        self.post(&["api", "jobs", job_id, "cancel"], None).await
    }
}
