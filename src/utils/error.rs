use crate::domain::model::{ContentType, QuotaBucket, WizardStep};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LessonGenError {
    #[error("Step {step} is invalid: {}", .errors.join("; "))]
    Validation {
        step: WizardStep,
        errors: Vec<String>,
    },

    #[error("Generation limit reached for {content_type}")]
    LimitReached { content_type: ContentType },

    #[error("No {bucket} left in usage store")]
    QuotaExhausted { bucket: QuotaBucket },

    #[error("No authenticated user")]
    NotAuthenticated,

    #[error("Generation failed: {message}")]
    GenerationFailure { message: String },

    #[error("API returned status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Quota,
    Backend,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LessonGenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Input,
            Self::LimitReached { .. } | Self::QuotaExhausted { .. } | Self::NotAuthenticated => {
                ErrorCategory::Quota
            }
            Self::GenerationFailure { .. }
            | Self::ApiStatus { .. }
            | Self::ApiError(_)
            | Self::SerializationError(_) => ErrorCategory::Backend,
            Self::UrlError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者修正輸入即可
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Quota | ErrorCategory::Backend => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Validation { step, errors } => {
                format!("Please fix step {}: {}", step, errors.join("; "))
            }
            Self::LimitReached { content_type } => {
                format!("You have no {} generations left on your tariff", content_type)
            }
            Self::QuotaExhausted { bucket } => {
                format!("You have no {} left on your tariff", bucket)
            }
            Self::NotAuthenticated => "You need to sign in before generating content".to_string(),
            Self::GenerationFailure { .. } | Self::ApiStatus { .. } | Self::ApiError(_) => {
                "The generation service could not complete the request".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Correct the highlighted fields and try again",
            ErrorCategory::Quota => "Upgrade your tariff or wait for the next billing period",
            ErrorCategory::Backend => "Try again later; the backend may be unavailable",
            ErrorCategory::Configuration => "Check the configuration file and environment variables",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, LessonGenError>;
