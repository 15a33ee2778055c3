use crate::core::UsageStore;
use crate::domain::model::{QuotaBucket, User};
use crate::utils::error::{LessonGenError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Counters {
    remaining: HashMap<(i64, QuotaBucket), u32>,
    tracked: HashMap<i64, u32>,
}

/// Usage counters held in process. Unknown users start with nothing left.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsageStore {
    counters: Arc<Mutex<Counters>>,
}

impl InMemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_remaining(&self, user_id: i64, bucket: QuotaBucket, remaining: u32) {
        let mut counters = self.counters.lock().await;
        counters.remaining.insert((user_id, bucket), remaining);
    }

    /// How many generations have been recorded for a user across buckets.
    pub async fn tracked_count(&self, user_id: i64) -> u32 {
        let counters = self.counters.lock().await;
        counters.tracked.get(&user_id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn remaining_generations(&self, user: &User, bucket: QuotaBucket) -> Result<u32> {
        let counters = self.counters.lock().await;
        Ok(counters
            .remaining
            .get(&(user.id, bucket))
            .copied()
            .unwrap_or(0))
    }

    async fn record_generation(&self, user: &User, bucket: QuotaBucket) -> Result<u32> {
        let mut counters = self.counters.lock().await;
        let remaining = counters.remaining.entry((user.id, bucket)).or_insert(0);
        if *remaining == 0 {
            return Err(LessonGenError::QuotaExhausted { bucket });
        }
        *remaining -= 1;
        let left = *remaining;

        *counters.tracked.entry(user.id).or_insert(0) += 1;
        Ok(left)
    }
}
