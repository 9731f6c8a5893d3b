use super::{open_patient_record, until};
use crate::pages::DoctorDashboardPage;
use screenplay::{Click, ElementState, Enter, ScenarioConfig, ScreenplayResult, Task};

/// A doctor adding a comment to a patient's record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddComment {
    patient: String,
    comment: String,
}

impl AddComment {
    /// Add `comment` to a patient's record
    #[must_use]
    pub fn to_patient(patient: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            patient: patient.into(),
            comment: comment.into(),
        }
    }

    /// Build the task
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the patient name cannot be bound.
    pub fn build(&self, config: &ScenarioConfig) -> ScreenplayResult<Task> {
        let page = DoctorDashboardPage::get();
        Ok(Task::where_(format!("add a comment to {}", self.patient))
            .then(open_patient_record(&self.patient, config)?)
            .then(until(
                &page.comment_textarea,
                ElementState::Visible,
                &config.timeouts.standard(),
            ))
            .then(Enter::the_value(self.comment.clone()).into_the(page.comment_textarea.clone()))
            .then(until(
                &page.save_comment_button,
                ElementState::Clickable,
                &config.timeouts.short(),
            ))
            .then(Click::on(page.save_comment_button.clone()))
            .build())
    }
}
