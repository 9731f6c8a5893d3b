use super::{start::Start, until};
use crate::pages::LoginPage;
use crate::roles::Role;
use screenplay::{
    Click, Credentials, ElementState, Enter, ScenarioConfig, ScreenplayResult, Task,
};
use tracing::debug;

#[derive(Debug, Clone)]
enum Account {
    Role(Role),
    Explicit(Credentials),
}

/// Logging in through the login form
#[derive(Debug, Clone)]
pub struct Login {
    account: Account,
}

impl Login {
    /// Log in with the configured credentials of a role
    #[must_use]
    pub const fn as_role(role: Role) -> Self {
        Self {
            account: Account::Role(role),
        }
    }

    /// Log in with explicit credentials
    #[must_use]
    pub fn with_credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: Account::Explicit(Credentials::new(email, password)),
        }
    }

    /// Build the task
    ///
    /// # Errors
    ///
    /// Returns `Config` if the role has no configured credentials.
    pub fn build(&self, config: &ScenarioConfig) -> ScreenplayResult<Task> {
        let credentials = match &self.account {
            Account::Role(role) => config.credentials_for(role.name())?.clone(),
            Account::Explicit(credentials) => credentials.clone(),
        };
        debug!(email = %credentials.email, "building login");
        let page = LoginPage::get();
        Ok(Task::where_(format!("log in as {}", credentials.email))
            .then(Start::on(page, config))
            .then(until(
                &page.email_input,
                ElementState::Visible,
                &config.timeouts.standard(),
            ))
            .then(Enter::the_value(credentials.email).into_the(page.email_input.clone()))
            .then(Enter::the_secret(credentials.password).into_the(page.password_input.clone()))
            .then(Click::on(page.login_button.clone()))
            .build())
    }
}
