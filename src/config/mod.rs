pub mod cli;
pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use crate::domain::model::{ContentType, Role, User};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_required_field, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "lesson-gen")]
#[command(about = "Validate a lesson-plan form and request generation from the backend")]
pub struct CliConfig {
    #[arg(long, default_value = "lesson-gen.toml")]
    pub config: String,

    #[arg(long, help = "Lesson-plan form as JSON or TOML")]
    pub form: Option<String>,

    #[arg(long, help = "Free-text prompt for content types other than lesson_plan")]
    pub prompt: Option<String>,

    #[arg(long)]
    pub user_id: i64,

    #[arg(long, default_value = "user")]
    pub role: Role,

    #[arg(long)]
    pub tariff: Option<String>,

    #[arg(long, default_value = "lesson_plan")]
    pub content_type: ContentType,

    #[arg(long, help = "Print prompt and payload without calling the backend")]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn user(&self) -> User {
        User {
            id: self.user_id,
            role: self.role,
            tariff: self.tariff.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("config", &self.config)?;

        match self.content_type {
            ContentType::LessonPlan => {
                let form = validate_required_field("form", &self.form)?;
                validate_path("form", form)?;
            }
            _ => {
                let prompt = validate_required_field("prompt", &self.prompt)?;
                validate_non_empty_string("prompt", prompt)?;
            }
        }

        Ok(())
    }
}
