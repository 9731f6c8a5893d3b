use crate::pages::{DoctorDashboardPage, NurseDashboardPage};
use screenplay::{about, Actor, Question, Text, Visibility};

const SUCCESS_WORDS: [&str; 3] = ["éxito", "exitosamente", "success"];

/// Questions about patients
#[derive(Debug, Clone, Copy)]
pub struct ThePatient;

impl ThePatient {
    /// Whether a patient appears in the nurse dashboard's list
    #[must_use]
    pub fn is_registered(patient: impl Into<String>) -> impl Question<Answer = bool> {
        let patient = patient.into();
        about(
            format!("whether patient {patient} is registered"),
            false,
            move |actor: &Actor| {
                let page = NurseDashboardPage::get();
                Ok(actor.asks_for(&Visibility::of(page.patient_item(&patient)?))
                    || actor
                        .asks_for(&Text::of(page.patient_list.clone()))
                        .contains(patient.as_str()))
            },
        )
    }

    /// Whether a success toast is showing
    #[must_use]
    pub fn has_success_message() -> impl Question<Answer = bool> {
        about(
            "whether a success message is displayed",
            false,
            |actor: &Actor| {
                let toast = &NurseDashboardPage::get().success_message;
                if actor.asks_for(&Visibility::of(toast.clone())) {
                    return Ok(true);
                }
                let text = actor.asks_for(&Text::of(toast.clone())).to_lowercase();
                Ok(SUCCESS_WORDS.iter().any(|word| text.contains(word)))
            },
        )
    }

    /// Whether an error toast is showing
    #[must_use]
    pub fn has_error_message() -> impl Question<Answer = bool> {
        about("whether an error message is displayed", false, |actor: &Actor| {
            Ok(actor.asks_for(&Visibility::of(
                NurseDashboardPage::get().error_message.clone(),
            )))
        })
    }

    /// Status badge of a patient on the doctor dashboard, `"unknown"` if unreadable
    #[must_use]
    pub fn current_status(patient: impl Into<String>) -> impl Question<Answer = String> {
        let patient = patient.into();
        about(
            format!("the current status of {patient}"),
            "unknown".to_string(),
            move |actor: &Actor| {
                Text::of(DoctorDashboardPage::get().patient_status(&patient)?).evaluate(actor)
            },
        )
    }

    /// Whether the process select shows a process
    #[must_use]
    pub fn has_process(process: impl Into<String>) -> impl Question<Answer = bool> {
        let process = process.into().to_lowercase();
        about(
            format!("whether process {process} is set"),
            false,
            move |actor: &Actor| {
                let select = DoctorDashboardPage::get().process_select.clone();
                Ok(Text::of(select)
                    .evaluate(actor)?
                    .to_lowercase()
                    .contains(process.as_str()))
            },
        )
    }
}
