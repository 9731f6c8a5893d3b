//! Screenplay scenarios for the HealthTech triage application.
//!
//! Nurses register incoming patients through a three-step wizard; doctors
//! take their cases, comment on them and decide where they go next. This
//! crate holds the locator catalog of those screens ([`pages`]), the
//! business tasks ([`tasks`]) and the questions asked about them
//! ([`questions`]).
//!
//! ```
//! use screenplay::Performable;
//! use screenplay_triage::{default_config, tasks::RegisterPatient};
//!
//! let config = default_config();
//! let register = RegisterPatient::named("Juan Pérez")
//!     .aged(45)
//!     .with_priority("3")
//!     .build(&config)
//!     .unwrap();
//! assert_eq!(register.describe(), "register patient Juan Pérez");
//! ```

#![warn(missing_docs)]

pub mod pages;
pub mod questions;
mod roles;
pub mod tasks;

pub use pages::{priority_level, DoctorDashboardPage, LoginPage, NurseDashboardPage};
pub use roles::{default_config, Role, DEFAULT_BASE_URL};

/// Actors browsing through their own Chromium window
#[cfg(feature = "browser")]
pub fn chromium_cast(config: &screenplay::ScenarioConfig) -> impl screenplay::Cast {
    let options = screenplay::ChromiumOptions::from_config(config);
    screenplay::SessionCast::new(move || screenplay::ChromiumSession::launch(&options))
}
