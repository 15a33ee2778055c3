pub mod generation;
pub mod limits;
pub mod prompt;
pub mod validator;
pub mod wizard;

pub use crate::domain::model::{FormData, GenerationLimits, ValidationResult, WizardStep};
pub use crate::domain::ports::{ConfigProvider, GenerationDispatcher, UsageStore};
pub use crate::utils::error::Result;
