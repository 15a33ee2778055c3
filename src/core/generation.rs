use crate::core::limits::LimitsResolver;
use crate::core::prompt::{build_payload, generate_prompt};
use crate::core::validator::first_invalid_step;
use crate::core::{GenerationDispatcher, UsageStore};
use crate::domain::model::{
    ContentType, FormData, GeneratedContent, GenerationRequest, User,
};
use crate::utils::error::{LessonGenError, Result};
use serde_json::Value;

/// Validate, check quota, track usage and dispatch. No retries: every error
/// from tracking or dispatch is returned to the caller as-is.
pub struct GenerationService<S: UsageStore, D: GenerationDispatcher> {
    limits: LimitsResolver<S>,
    dispatcher: D,
}

impl<S: UsageStore, D: GenerationDispatcher> GenerationService<S, D> {
    pub fn new(limits: LimitsResolver<S>, dispatcher: D) -> Self {
        Self { limits, dispatcher }
    }

    pub fn limits(&self) -> &LimitsResolver<S> {
        &self.limits
    }

    pub async fn submit_lesson_plan(
        &self,
        user: Option<&User>,
        form: &FormData,
    ) -> Result<GeneratedContent> {
        if let Some((step, result)) = first_invalid_step(form) {
            return Err(LessonGenError::Validation {
                step,
                errors: result.errors,
            });
        }

        let prompt = generate_prompt(form);
        let payload = build_payload(form);
        self.generate(user, ContentType::LessonPlan, prompt, Some(payload))
            .await
    }

    pub async fn generate(
        &self,
        user: Option<&User>,
        content_type: ContentType,
        prompt: String,
        parameters: Option<Value>,
    ) -> Result<GeneratedContent> {
        let user = user.ok_or(LessonGenError::NotAuthenticated)?;
        let limits = self
            .limits
            .check_and_track_generation(Some(user), content_type)
            .await?;

        let request = GenerationRequest {
            user_id: user.id,
            content_type,
            prompt,
            parameters,
        };

        tracing::info!(user_id = user.id, content_type = %content_type, "Dispatching generation request");
        let response = self.dispatcher.dispatch(&request).await?;
        let content = extract_content(&response)?;
        tracing::info!(
            content_type = %content_type,
            chars = content.len(),
            remaining = %limits.remaining,
            "Generation completed"
        );

        Ok(GeneratedContent {
            content_type,
            content,
            generated_at: chrono::Utc::now(),
            limits,
        })
    }
}

/// Pulls the generated text out of a backend response. Anything other than a
/// non-empty string is a failed generation.
pub fn extract_content(response: &Value) -> Result<String> {
    let content = match response {
        Value::String(text) => Some(text.as_str()),
        Value::Object(map) => map.get("content").and_then(Value::as_str),
        _ => None,
    };

    match content {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        Some(_) => Err(LessonGenError::GenerationFailure {
            message: "backend returned empty content".to_string(),
        }),
        None => Err(LessonGenError::GenerationFailure {
            message: format!("backend returned no text content: {}", response),
        }),
    }
}
