use crate::core::UsageStore;
use crate::domain::model::{
    ContentType, GenerationLimits, Quota, TariffCatalog, TariffLimits, User,
};
use crate::utils::error::{LessonGenError, Result};

/// What a user is entitled to before looking at usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entitlement<'a> {
    Denied,
    Unlimited,
    Metered(&'a TariffLimits),
}

pub fn entitlement<'a>(user: Option<&User>, catalog: &'a TariffCatalog) -> Entitlement<'a> {
    let Some(user) = user else {
        return Entitlement::Denied;
    };

    if user.role.is_unlimited() {
        return Entitlement::Unlimited;
    }

    match user.tariff.as_deref().and_then(|name| catalog.get(name)) {
        Some(limits) => Entitlement::Metered(limits),
        None => Entitlement::Denied,
    }
}

pub struct LimitsResolver<S: UsageStore> {
    catalog: TariffCatalog,
    store: S,
}

impl<S: UsageStore> LimitsResolver<S> {
    pub fn new(catalog: TariffCatalog, store: S) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &TariffCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn compute_limits(
        &self,
        user: Option<&User>,
        content_type: ContentType,
    ) -> Result<GenerationLimits> {
        match entitlement(user, &self.catalog) {
            Entitlement::Denied => Ok(GenerationLimits::none()),
            Entitlement::Unlimited => Ok(GenerationLimits::unlimited()),
            Entitlement::Metered(tariff) => {
                // Metered 只會在有使用者時出現
                let user = user.ok_or(LessonGenError::NotAuthenticated)?;
                let bucket = content_type.bucket();
                let remaining = self.store.remaining_generations(user, bucket).await?;
                Ok(GenerationLimits::limited(tariff.limit_for(bucket), remaining))
            }
        }
    }

    pub async fn can_generate(&self, user: Option<&User>, content_type: ContentType) -> Result<bool> {
        let limits = self.compute_limits(user, content_type).await?;
        Ok(limits.allows_generation())
    }

    /// Re-checks the quota right before consuming it, then records the usage.
    /// Returns the limits as they stand after tracking.
    pub async fn check_and_track_generation(
        &self,
        user: Option<&User>,
        content_type: ContentType,
    ) -> Result<GenerationLimits> {
        let user = user.ok_or(LessonGenError::NotAuthenticated)?;

        let limits = self.compute_limits(Some(user), content_type).await?;
        if !limits.allows_generation() {
            tracing::warn!(
                user_id = user.id,
                content_type = %content_type,
                "Generation limit reached"
            );
            return Err(LessonGenError::LimitReached { content_type });
        }

        if limits.is_unlimited {
            tracing::debug!(user_id = user.id, role = %user.role, "Unlimited role, usage not tracked");
            return Ok(limits);
        }

        // 另一個請求可能已用掉最後一次額度
        let remaining = self
            .store
            .record_generation(user, content_type.bucket())
            .await
            .map_err(|e| match e {
                LessonGenError::QuotaExhausted { .. } => {
                    LessonGenError::LimitReached { content_type }
                }
                other => other,
            })?;
        tracing::debug!(
            user_id = user.id,
            content_type = %content_type,
            remaining,
            "Generation tracked"
        );

        Ok(GenerationLimits {
            remaining: Quota::Limited(remaining),
            ..limits
        })
    }
}
