use crate::domain::model::{Course, CoursesEnvelope, FormKind, HealthStatus, Level, SubmissionReceipt};
use crate::domain::ports::{BackendApi, ConfigProvider};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// reqwest client for the bootcamp backend, rooted at `<base_url>/api`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_root: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            api_root: format!("{}/api", base_url.trim_end_matches('/')),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, config.api_base_url()))
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    /// Server-side filtering through `GET /courses/filter`.
    pub async fn fetch_filtered_courses(
        &self,
        level: Option<Level>,
        duration: Option<&str>,
    ) -> Result<Vec<Course>> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(level) = level {
            query.push(("level", level.as_str()));
        }
        if let Some(duration) = duration {
            query.push(("duration", duration));
        }

        let envelope: CoursesEnvelope = self.get_json("/courses/filter", &query).await?;
        Ok(envelope.data)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.get_json("/health", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;
        tracing::debug!("GET {} -> {}", url, response.status());

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// 非 2xx 回應轉成 `Rejected`，盡量保留 JSON 內容
    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<serde_json::Value>(&text).ok();
        Err(PortalError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn fetch_courses(&self) -> Result<Vec<Course>> {
        let envelope: CoursesEnvelope = self.get_json("/courses", &[]).await?;
        if let Some(total) = envelope.total_courses {
            if total != envelope.data.len() {
                tracing::debug!(
                    "Backend reported {} courses but sent {}",
                    total,
                    envelope.data.len()
                );
            }
        }
        Ok(envelope.data)
    }

    async fn submit(&self, kind: FormKind, payload: serde_json::Value) -> Result<SubmissionReceipt> {
        let url = self.url(kind.endpoint());
        tracing::debug!("POST {} ({} form)", url, kind);

        let response = self.client.post(&url).json(&payload).send().await?;
        tracing::debug!("POST {} -> {}", url, response.status());

        let response = Self::ensure_success(response).await?;
        let body: serde_json::Value = response.json().await?;

        SubmissionReceipt::from_body(kind, &body).ok_or_else(|| {
            PortalError::Serialization(serde::de::Error::missing_field("message"))
        })
    }
}
