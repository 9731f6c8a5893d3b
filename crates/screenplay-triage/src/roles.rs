//! Application roles and their demo accounts.

use screenplay::{Credentials, ScenarioConfig};
use std::fmt;

/// Where the application runs in local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:3003";

/// A user role of the triage application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Registers and prioritises incoming patients
    Nurse,
    /// Takes cases and decides the patient process
    Doctor,
    /// Administers accounts
    Admin,
}

impl Role {
    /// Every role
    pub const ALL: [Self; 3] = [Self::Nurse, Self::Doctor, Self::Admin];

    /// Key used in the scenario configuration's credentials table
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nurse => "nurse",
            Self::Doctor => "doctor",
            Self::Admin => "admin",
        }
    }

    /// The seeded demo account
    #[must_use]
    pub fn demo_credentials(self) -> Credentials {
        match self {
            Self::Nurse => Credentials::new("ana.garcia@healthtech.com", "password123"),
            Self::Doctor => Credentials::new("carlos.mendoza@healthtech.com", "password123"),
            Self::Admin => Credentials::new("admin@healthtech.com", "admin123"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the local application with every demo account
#[must_use]
pub fn default_config() -> ScenarioConfig {
    Role::ALL
        .into_iter()
        .fold(ScenarioConfig::new().with_base_url(DEFAULT_BASE_URL), |config, role| {
            config.with_credentials(role.name(), role.demo_credentials())
        })
}
