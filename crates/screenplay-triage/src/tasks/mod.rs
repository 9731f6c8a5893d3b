//! Business tasks of the triage application.
//!
//! Every task is a builder that, given the scenario configuration, produces
//! an immutable [`Task`]. Optional fields become steps only when set.

mod add_comment;
mod login;
mod register_patient;
mod start;
mod take_patient_case;
mod update_patient_process;

pub use add_comment::AddComment;
pub use login::Login;
pub use register_patient::{RegisterPatient, VitalSigns};
pub use start::Start;
pub use take_patient_case::TakePatientCase;
pub use update_patient_process::{ProcessChoice, ProcessKind, UpdatePatientProcess};

use crate::pages::DoctorDashboardPage;
use screenplay::{
    Click, ElementState, Interaction, ScenarioConfig, ScreenplayResult, Target, Task, WaitOptions,
    WaitUntil,
};

/// Wait for `target` to reach `state` within `options`
fn until(target: &Target, state: ElementState, options: &WaitOptions) -> Interaction {
    WaitUntil::the(target.clone(), state)
        .for_no_more_than(options.timeout())
        .polling_every(options.poll_interval())
}

/// Click a patient's card on the doctor dashboard and wait for the modal
fn open_patient_record(patient: &str, config: &ScenarioConfig) -> ScreenplayResult<Task> {
    let page = DoctorDashboardPage::get();
    let card = page.patient_card(patient)?;
    Ok(Task::where_(format!("open the record of {patient}"))
        .then(until(&card, ElementState::Visible, &config.timeouts.standard()))
        .then(Click::on(card))
        .then(until(
            &page.modal_title,
            ElementState::Visible,
            &config.timeouts.short(),
        ))
        .build())
}
