use crate::domain::model::FormData;
use crate::utils::error::{LessonGenError, Result};
use std::path::Path;

/// Loads a saved wizard form. `.toml` files are parsed as TOML, anything
/// else as JSON (the shape the mini app posts).
pub fn load_form<P: AsRef<Path>>(path: P) -> Result<FormData> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&content).map_err(|e| LessonGenError::ConfigValidationError {
            field: "form".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}
