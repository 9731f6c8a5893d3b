use super::{open_patient_record, until};
use crate::pages::DoctorDashboardPage;
use screenplay::{
    Click, ElementState, ScenarioConfig, ScreenplayResult, SelectFromOptions, Target, Task,
};
use std::fmt;
use tracing::debug;

/// Where a patient goes next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessKind {
    /// Admit to a ward
    Hospitalization {
        /// Expected stay, for the record
        days: Option<String>,
    },
    /// Send home
    Discharge,
    /// Refer to another clinic
    Referral {
        /// Receiving clinic, for the record
        clinic: Option<String>,
    },
    /// Admit to intensive care
    Icu,
    /// Any other status, chosen from the status select
    Status(String),
}

impl ProcessKind {
    /// Process code, or the status label for free-form statuses
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Hospitalization { .. } => "HOSPITALIZATION",
            Self::Discharge => "DISCHARGE",
            Self::Referral { .. } => "REFERRAL",
            Self::Icu => "ICU",
            Self::Status(status) => status,
        }
    }

    fn button(&self, page: &'static DoctorDashboardPage) -> Option<&'static Target> {
        match self {
            Self::Hospitalization { .. } => Some(&page.hospitalize_button),
            Self::Discharge => Some(&page.discharge_button),
            Self::Referral { .. } => Some(&page.transfer_button),
            Self::Icu => Some(&page.icu_button),
            Self::Status(_) => None,
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hospitalization { days: Some(days) } => {
                write!(f, "hospitalization ({days} days)")
            }
            Self::Hospitalization { days: None } => f.write_str("hospitalization"),
            Self::Discharge => f.write_str("discharge"),
            Self::Referral { clinic: Some(clinic) } => write!(f, "referral to {clinic}"),
            Self::Referral { clinic: None } => f.write_str("referral"),
            Self::Icu => f.write_str("ICU"),
            Self::Status(status) => write!(f, "status {status:?}"),
        }
    }
}

/// A doctor moving a patient to a new process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePatientProcess {
    patient: String,
    process: ProcessKind,
}

/// Chooses the process of an [`UpdatePatientProcess`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessChoice {
    patient: String,
}

impl UpdatePatientProcess {
    /// Update the process of a patient
    #[must_use]
    pub fn for_patient(patient: impl Into<String>) -> ProcessChoice {
        ProcessChoice {
            patient: patient.into(),
        }
    }

    /// The chosen process
    #[must_use]
    pub const fn process(&self) -> &ProcessKind {
        &self.process
    }

    /// Build the task
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the patient name cannot be bound.
    pub fn build(&self, config: &ScenarioConfig) -> ScreenplayResult<Task> {
        let page = DoctorDashboardPage::get();
        let short = config.timeouts.short();
        let builder = Task::where_(format!("move {} to {}", self.patient, self.process))
            .then(open_patient_record(&self.patient, config)?);
        let button = self.process.button(page);
        debug!(
            patient = %self.patient,
            code = self.process.code(),
            via_select = button.is_none(),
            "building process update"
        );
        let builder = match button {
            Some(button) => builder
                .then(until(button, ElementState::Clickable, &short))
                .then(Click::on(button.clone())),
            None => builder
                .then(until(&page.process_select, ElementState::Visible, &short))
                .then(
                    SelectFromOptions::by_visible_text(self.process.code())
                        .from(page.process_select.clone()),
                )
                .then(Click::on(page.update_status_button.clone())),
        };
        Ok(builder.build())
    }
}

#[allow(clippy::wrong_self_convention)]
impl ProcessChoice {
    fn to(self, process: ProcessKind) -> UpdatePatientProcess {
        UpdatePatientProcess {
            patient: self.patient,
            process,
        }
    }

    /// Hospitalize for a number of days
    #[must_use]
    pub fn to_hospitalization(self, days: impl Into<String>) -> UpdatePatientProcess {
        self.to(ProcessKind::Hospitalization {
            days: Some(days.into()),
        })
    }

    /// Discharge
    #[must_use]
    pub fn to_discharge(self) -> UpdatePatientProcess {
        self.to(ProcessKind::Discharge)
    }

    /// Refer to a clinic
    #[must_use]
    pub fn to_referral(self, clinic: impl Into<String>) -> UpdatePatientProcess {
        self.to(ProcessKind::Referral {
            clinic: Some(clinic.into()),
        })
    }

    /// Admit to intensive care
    #[must_use]
    pub fn to_icu(self) -> UpdatePatientProcess {
        self.to(ProcessKind::Icu)
    }

    /// Set a status by its label in the status select
    #[must_use]
    pub fn to_status(self, status: impl Into<String>) -> UpdatePatientProcess {
        self.to(ProcessKind::Status(status.into()))
    }
}
