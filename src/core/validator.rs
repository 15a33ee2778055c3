use crate::domain::model::{
    FormData, Methodologies, ValidationResult, WizardStep, MAX_DURATION_MINUTES,
    MIN_DURATION_MINUTES,
};
use crate::utils::validation::{is_blank, validate_range};

/// Validates the fields owned by `step`. Every rule runs; nothing short-circuits.
pub fn validate_step(form: &FormData, step: WizardStep) -> ValidationResult {
    let mut result = ValidationResult::default();

    match step {
        WizardStep::Details => {
            if is_blank(&form.language) {
                result.errors.push("Language is required".to_string());
            }
            if is_blank(&form.level) {
                result.errors.push("Level is required".to_string());
            }
            if is_blank(&form.topic) {
                result.errors.push("Topic is required".to_string());
            }
            if let Err(e) = validate_range(
                "duration",
                form.duration,
                MIN_DURATION_MINUTES,
                MAX_DURATION_MINUTES,
            ) {
                tracing::debug!("Rejected duration: {}", e);
                result.errors.push(format!(
                    "Invalid duration: duration out of range ({}-{} minutes)",
                    MIN_DURATION_MINUTES, MAX_DURATION_MINUTES
                ));
            }
        }
        WizardStep::Methodology => {
            if is_blank(&form.methodologies.main_method) {
                result.errors.push("Main teaching method is required".to_string());
            }
            if is_blank(&form.teaching_methodology) {
                result.errors.push("Teaching methodology is required".to_string());
            }
            if form.methodologies.support_methods.is_empty() {
                result.warnings.push(
                    "Consider adding supporting methods to diversify the lesson".to_string(),
                );
            }
        }
        WizardStep::Objectives => {
            if form.objectives.iter().all(|o| is_blank(o)) {
                result
                    .errors
                    .push("Learning objectives: at least one is required".to_string());
            }
            if form.materials.is_empty() {
                result
                    .warnings
                    .push("No materials listed; consider adding lesson materials".to_string());
            }
        }
        WizardStep::Review => {}
    }

    tracing::debug!(
        step = %step,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Validated wizard step"
    );

    result
}

/// Validates steps in order and returns the first step that blocks.
pub fn first_invalid_step(form: &FormData) -> Option<(WizardStep, ValidationResult)> {
    WizardStep::ALL
        .into_iter()
        .map(|step| (step, validate_step(form, step)))
        .find(|(_, result)| !result.can_proceed())
}

impl Methodologies {
    /// Main overwrites unconditionally. Supporting methods are de-duplicated and
    /// the current main method is never appended as supporting. Promoting an
    /// existing supporting method to main leaves it in the supporting list.
    pub fn add_method(mut self, id: impl Into<String>, is_main: bool) -> Self {
        let id = id.into();
        if is_main {
            self.main_method = id;
        } else if id != self.main_method && !self.support_methods.contains(&id) {
            self.support_methods.push(id);
        }
        self
    }

    pub fn remove_method(mut self, id: &str) -> Self {
        if self.main_method == id {
            self.main_method.clear();
        } else {
            self.support_methods.retain(|m| m != id);
        }
        self
    }
}

impl FormData {
    pub fn add_method(mut self, id: impl Into<String>, is_main: bool) -> Self {
        self.methodologies = std::mem::take(&mut self.methodologies).add_method(id, is_main);
        self
    }

    pub fn remove_method(mut self, id: &str) -> Self {
        self.methodologies = std::mem::take(&mut self.methodologies).remove_method(id);
        self
    }
}
