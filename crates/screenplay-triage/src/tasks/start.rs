use crate::pages::{DoctorDashboardPage, LoginPage, NurseDashboardPage};
use screenplay::{Open, PageObject, ScenarioConfig, Task};

/// Navigation to a page of the application
#[derive(Debug, Clone, Copy)]
pub struct Start;

impl Start {
    /// Open `page` under the configured base URL
    #[must_use]
    pub fn on<P: PageObject + ?Sized>(page: &P, config: &ScenarioConfig) -> Task {
        Task::where_(format!("start on the {}", page.page_name()))
            .then(Open::url(config.url(page.path())))
            .build()
    }

    /// Open the login page
    #[must_use]
    pub fn on_the_login_page(config: &ScenarioConfig) -> Task {
        Self::on(LoginPage::get(), config)
    }

    /// Open the nurse dashboard
    #[must_use]
    pub fn on_the_nurse_dashboard(config: &ScenarioConfig) -> Task {
        Self::on(NurseDashboardPage::get(), config)
    }

    /// Open the doctor dashboard
    #[must_use]
    pub fn on_the_doctor_dashboard(config: &ScenarioConfig) -> Task {
        Self::on(DoctorDashboardPage::get(), config)
    }
}
