use crate::pages::{DoctorDashboardPage, NurseDashboardPage};
use screenplay::{about, Actor, Count, Question, Target, Visibility};

fn visible(actor: &Actor, target: &Target) -> bool {
    actor.asks_for(&Visibility::of(target.clone()))
}

/// Questions about the dashboards
#[derive(Debug, Clone, Copy)]
pub struct TheDashboard;

impl TheDashboard {
    /// Whether either dashboard is showing
    #[must_use]
    pub fn is_displayed() -> impl Question<Answer = bool> {
        about("whether a dashboard is displayed", false, |actor: &Actor| {
            let nurse = NurseDashboardPage::get();
            let doctor = DoctorDashboardPage::get();
            Ok([
                &nurse.dashboard_title,
                &doctor.dashboard_title,
                &nurse.register_patient_button,
                &doctor.patient_list,
            ]
            .into_iter()
            .any(|target| visible(actor, target)))
        })
    }

    /// Whether the nurse dashboard is showing, with its register button
    #[must_use]
    pub fn nurse_dashboard_is_displayed() -> impl Question<Answer = bool> {
        about(
            "whether the nurse dashboard is displayed",
            false,
            |actor: &Actor| {
                let page = NurseDashboardPage::get();
                Ok(visible(actor, &page.dashboard_title)
                    && visible(actor, &page.register_patient_button))
            },
        )
    }

    /// Whether the doctor dashboard is showing, with its patient list
    #[must_use]
    pub fn doctor_dashboard_is_displayed() -> impl Question<Answer = bool> {
        about(
            "whether the doctor dashboard is displayed",
            false,
            |actor: &Actor| {
                let page = DoctorDashboardPage::get();
                Ok(visible(actor, &page.dashboard_title) && visible(actor, &page.patient_list))
            },
        )
    }

    /// Number of patient cards on the current dashboard
    #[must_use]
    pub fn patient_count() -> impl Question<Answer = usize> {
        about("the number of patients displayed", 0, |actor: &Actor| {
            Ok(actor.asks_for(&Count::of(NurseDashboardPage::get().patient_items.clone()))
                + actor.asks_for(&Count::of(DoctorDashboardPage::get().patient_cards.clone())))
        })
    }
}
