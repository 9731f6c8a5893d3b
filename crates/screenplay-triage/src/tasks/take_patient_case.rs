use super::{open_patient_record, until};
use crate::pages::DoctorDashboardPage;
use screenplay::{Click, ElementState, Enter, ScenarioConfig, ScreenplayResult, Task};

/// A doctor assigning a waiting patient to themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakePatientCase {
    patient: String,
    comment: Option<String>,
}

impl TakePatientCase {
    /// Take the case of a patient
    #[must_use]
    pub fn for_patient(patient: impl Into<String>) -> Self {
        Self {
            patient: patient.into(),
            comment: None,
        }
    }

    /// Write a comment before taking the case
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into()).filter(|c| !c.is_empty());
        self
    }

    /// Build the task
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the patient name cannot be bound.
    pub fn build(&self, config: &ScenarioConfig) -> ScreenplayResult<Task> {
        let page = DoctorDashboardPage::get();
        let comment = self.comment.as_ref().map(|comment| {
            Task::where_("write a comment")
                .then(until(
                    &page.comment_textarea,
                    ElementState::Visible,
                    &config.timeouts.short(),
                ))
                .then(Enter::the_value(comment.clone()).into_the(page.comment_textarea.clone()))
                .build()
        });
        Ok(Task::where_(format!("take the case of {}", self.patient))
            .then(open_patient_record(&self.patient, config)?)
            .then_optional(comment)
            .then(until(
                &page.take_case_button,
                ElementState::Clickable,
                &config.timeouts.standard(),
            ))
            .then(Click::on(page.take_case_button.clone()))
            .build())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::roles::default_config;

    #[test]
    fn test_comment_is_a_build_time_step() {
        let config = default_config();
        let plain = TakePatientCase::for_patient("Juan Pérez").build(&config).unwrap();
        let commented = TakePatientCase::for_patient("Juan Pérez")
            .with_comment("Dolor torácico")
            .build(&config)
            .unwrap();
        assert_eq!(plain.len(), 3);
        assert_eq!(commented.len(), 4);
        assert_eq!(commented.step_descriptions()[1], "write a comment");
        assert_eq!(
            plain.step_descriptions()[0],
            "open the record of Juan Pérez"
        );
    }

    #[test]
    fn test_empty_comment_is_no_comment() {
        let task = TakePatientCase::for_patient("Ana")
            .with_comment("")
            .build(&default_config())
            .unwrap();
        assert_eq!(task.len(), 3);
    }
}
