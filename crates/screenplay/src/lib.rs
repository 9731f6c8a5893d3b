//! Probar Screenplay: acceptance tests written as what users do.
//!
//! Scenarios are told from the point of view of [`Actor`]s. An actor holds
//! [`Ability`]s (such as [`BrowseTheWeb`]), performs [`Task`]s built from
//! [`Interaction`]s against [`Target`]s, and checks outcomes by asking
//! [`Question`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    SCREENPLAY Architecture                       │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────┐  attempts_to  ┌────────┐         ┌──────────────┐   │
//! │   │ Actor  │──────────────►│  Task  │────────►│ Interaction  │   │
//! │   │        │               └────────┘         └──────┬───────┘   │
//! │   │        │  asks_for     ┌──────────┐              │           │
//! │   │        │──────────────►│ Question │              ▼           │
//! │   └───┬────┘               └────┬─────┘     ┌────────────────┐   │
//! │       │ BrowseTheWeb            └──────────►│ Target/Locator │   │
//! │       ▼                                     └───────┬────────┘   │
//! │   ┌──────────────────────────────────────────────────▼────────┐  │
//! │   │ WebSession (MockSession, ChromiumSession)                 │  │
//! │   └───────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use screenplay::prelude::*;
//!
//! let session = MockSession::new();
//! session.add_element(
//!     MockElement::matching("save", &Locator::css("#save")).with_text("Save"),
//! );
//!
//! let save = Target::the("the save button").located_by(Locator::css("#save"));
//! let mut ana = Actor::named("Ana").who_can(BrowseTheWeb::with(session.clone()));
//!
//! ana.attempts_to(&Click::on(save.clone())).unwrap();
//! assert!(ana.asks_for(&Visibility::of(save)));
//! assert!(session.was_called("click:save"));
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod ability;
mod actor;
mod assertion;
#[cfg(feature = "browser")]
mod browser;
mod config;
mod driver;
mod interaction;
mod journal;
mod locator;
/// Subscriber setup for scenario runs
pub mod logging;
mod page_object;
mod question;
mod result;
mod target;
mod task;
mod wait;
mod wizard;

pub use ability::{Ability, AsAny, BrowseTheWeb};
pub use actor::{Actor, Cast, SessionCast};
pub use assertion::{at_least, contains_text, is, is_false, is_true, see_that, Matcher, SeeThat};
#[cfg(feature = "browser")]
pub use browser::{ChromiumOptions, ChromiumSession, HANDLE_ATTRIBUTE};
pub use config::{Credentials, ScenarioConfig, Timeouts, BASE_URL_ENV, HEADLESS_ENV};
pub use driver::{ElementHandle, MockElement, MockSession, WebSession};
pub use interaction::{
    Action, Clear, Click, Enter, Grace, Interaction, Open, Pause, SelectFromOptions, WaitUntil,
    MAX_GRACE, MODAL_TRANSITION_GRACE, TOAST_ANIMATION_GRACE,
};
pub use journal::{ActivityStatus, Journal, JournalEntry};
pub use locator::{Locator, LocatorStrategy, LocatorTemplate};
pub use page_object::{PageObject, TheCurrentPage, UrlMatcher};
pub use question::{
    about, About, Count, CurrentUrl, Presence, Question, Text, TextOfAll, Visibility,
};
pub use result::{ScreenplayError, ScreenplayResult};
pub use target::{Target, TargetTemplate};
pub use task::{Performable, Task, TaskBuilder};
pub use wait::{
    wait_until, ElementState, FnCondition, TargetCondition, WaitCondition, WaitOptions,
    WaitResult, WaitState, Waiter, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
    MIN_POLL_INTERVAL_MS,
};
pub use wizard::{Wizard, WizardState, WizardStep};

/// Everything a scenario usually needs
pub mod prelude {
    pub use super::ability::*;
    pub use super::actor::*;
    pub use super::assertion::*;
    #[cfg(feature = "browser")]
    pub use super::browser::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::interaction::*;
    pub use super::journal::*;
    pub use super::locator::*;
    pub use super::page_object::*;
    pub use super::question::*;
    pub use super::result::*;
    pub use super::target::*;
    pub use super::task::*;
    pub use super::wait::*;
    pub use super::wizard::*;
}
