use crate::core::{ConfigProvider, GenerationDispatcher, UsageStore};
use crate::domain::model::{GenerationRequest, QuotaBucket, User};
use crate::utils::error::{LessonGenError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Shared reqwest client plus base URL and bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut base = config.api_base_url().to_string();
        // 確保 join 時保留最後一段路徑
        if !base.ends_with('/') {
            base.push('/');
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
            token: config.api_token().map(str::to_string),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub fn get(&self, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);
        Ok(self.authorize(self.client.get(url)))
    }

    pub fn post(&self, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);
        Ok(self.authorize(self.client.post(url)))
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("API response status: {}", status);

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(LessonGenError::ApiStatus {
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    api: ApiClient,
}

impl HttpGenerationClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl GenerationDispatcher for HttpGenerationClient {
    async fn dispatch(&self, request: &GenerationRequest) -> Result<serde_json::Value> {
        let response = self.api.post("generate")?.json(request).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct RemainingCounters {
    images: u32,
    generations: u32,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    remaining: u32,
}

/// Usage counters kept by the backend.
#[derive(Debug, Clone)]
pub struct HttpUsageStore {
    api: ApiClient,
}

impl HttpUsageStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl UsageStore for HttpUsageStore {
    async fn remaining_generations(&self, user: &User, bucket: QuotaBucket) -> Result<u32> {
        let path = format!("users/{}/limits", user.id);
        let response = self.api.get(&path)?.send().await?;
        let counters: RemainingCounters = ensure_success(response).await?.json().await?;

        Ok(match bucket {
            QuotaBucket::Images => counters.images,
            QuotaBucket::Generations => counters.generations,
        })
    }

    async fn record_generation(&self, user: &User, bucket: QuotaBucket) -> Result<u32> {
        let path = format!("users/{}/usage/{}", user.id, bucket);
        let response = self.api.post(&path)?.send().await?;

        // 後端以 403/429 表示額度已用完
        if matches!(
            response.status(),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
        ) {
            return Err(LessonGenError::QuotaExhausted { bucket });
        }

        let tracked: TrackResponse = ensure_success(response).await?.json().await?;
        Ok(tracked.remaining)
    }
}
