use crate::core::validator::validate_step;
use crate::domain::model::{FormData, ValidationResult, WizardStep};

/// One lesson-plan creation session: the form snapshot plus the current step.
#[derive(Debug, Clone, Default)]
pub struct LessonPlanWizard {
    form: FormData,
    step: WizardStep,
    last_result: ValidationResult,
}

impl LessonPlanWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: FormData) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn last_result(&self) -> &ValidationResult {
        &self.last_result
    }

    /// Replaces the form with the snapshot returned by `f`.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(FormData) -> FormData,
    {
        let form = std::mem::take(&mut self.form);
        self.form = f(form);
    }

    /// Validates the current step and advances only when it has no errors.
    /// The terminal step validates but never advances.
    pub fn next_step(&mut self) -> &ValidationResult {
        self.last_result = validate_step(&self.form, self.step);

        if self.last_result.can_proceed() {
            if let Some(next) = self.step.next() {
                tracing::debug!(from = %self.step, to = %next, "Wizard advanced");
                self.step = next;
            }
        }

        &self.last_result
    }

    pub fn previous_step(&mut self) {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
