use crate::domain::model::{GenerationRequest, QuotaBucket, User};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Live usage counters for a user, kept by the backend.
#[async_trait]
pub trait UsageStore: Send + Sync {
    async fn remaining_generations(&self, user: &User, bucket: QuotaBucket) -> Result<u32>;

    /// Consume one generation and return what is left.
    async fn record_generation(&self, user: &User, bucket: QuotaBucket) -> Result<u32>;
}

#[async_trait]
pub trait GenerationDispatcher: Send + Sync {
    async fn dispatch(&self, request: &GenerationRequest) -> Result<serde_json::Value>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn api_token(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
}
