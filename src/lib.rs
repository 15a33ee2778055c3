pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::{ApiClient, HttpGenerationClient, HttpUsageStore};
pub use adapters::memory::InMemoryUsageStore;
pub use config::AppConfig;
pub use crate::core::{
    generation::GenerationService,
    limits::LimitsResolver,
    prompt::{build_payload, generate_prompt},
    validator::validate_step,
    wizard::LessonPlanWizard,
};
pub use utils::error::{LessonGenError, Result};
