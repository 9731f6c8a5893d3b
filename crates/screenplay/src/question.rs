//! Questions: read-only probes of the page.
//!
//! A question never changes the page. When it cannot be answered (the
//! target does not resolve, the session errors, the actor cannot browse)
//! it degrades to its fallback instead of failing: `false` for visibility
//! and presence, an empty string for text, zero for counts.
//!
//! `evaluate` exposes the underlying error for callers that want it;
//! [`Actor::asks_for`] always goes through the fallback path.

use crate::actor::Actor;
use crate::result::{ScreenplayError, ScreenplayResult};
use crate::target::Target;
use crate::wait::ElementState;
use std::fmt;
use tracing::{debug, warn};

/// A probe answered by an actor
pub trait Question: Send + Sync {
    /// Type of the answer
    type Answer: fmt::Debug;

    /// Description used in logs and assertion messages
    fn describe(&self) -> String;

    /// Answer the question, reporting why it could not be answered
    ///
    /// # Errors
    ///
    /// Returns the error that prevented an answer.
    fn evaluate(&self, actor: &Actor) -> ScreenplayResult<Self::Answer>;

    /// Answer used when `evaluate` fails
    fn fallback(&self) -> Self::Answer;

    /// Answer the question, degrading to the fallback on failure
    fn answered_by(&self, actor: &Actor) -> Self::Answer {
        match self.evaluate(actor) {
            Ok(answer) => {
                debug!(question = %self.describe(), ?answer, "answered");
                answer
            }
            Err(e) => {
                let answer = self.fallback();
                warn!(
                    question = %self.describe(),
                    error = %e,
                    fallback = ?answer,
                    "unanswerable, using fallback"
                );
                answer
            }
        }
    }
}

fn first_element_text(actor: &Actor, target: &Target) -> ScreenplayResult<String> {
    let session = actor.session()?;
    let element = target
        .resolve(session)
        .into_iter()
        .next()
        .ok_or_else(|| ScreenplayError::not_found(target.name(), target.describe_locators()))?;
    session.text(&element).map_err(|e| e.for_target(target.name()))
}

/// Whether any element of a target is visible
#[derive(Debug, Clone)]
pub struct Visibility {
    target: Target,
}

impl Visibility {
    /// Visibility of a target
    #[must_use]
    pub fn of(target: Target) -> Self {
        Self { target }
    }
}

impl Question for Visibility {
    type Answer = bool;

    fn describe(&self) -> String {
        format!("the visibility of {}", self.target.name())
    }

    fn evaluate(&self, actor: &Actor) -> ScreenplayResult<bool> {
        Ok(ElementState::Visible.holds(actor.session()?, &self.target))
    }

    fn fallback(&self) -> bool {
        false
    }
}

/// Whether a target matches any element
#[derive(Debug, Clone)]
pub struct Presence {
    target: Target,
}

impl Presence {
    /// Presence of a target
    #[must_use]
    pub fn of(target: Target) -> Self {
        Self { target }
    }
}

impl Question for Presence {
    type Answer = bool;

    fn describe(&self) -> String {
        format!("the presence of {}", self.target.name())
    }

    fn evaluate(&self, actor: &Actor) -> ScreenplayResult<bool> {
        Ok(ElementState::Present.holds(actor.session()?, &self.target))
    }

    fn fallback(&self) -> bool {
        false
    }
}

/// Text of a target's first element
#[derive(Debug, Clone)]
pub struct Text {
    target: Target,
    fallback: String,
}

impl Text {
    /// Text of a target
    #[must_use]
    pub fn of(target: Target) -> Self {
        Self {
            target,
            fallback: String::new(),
        }
    }

    /// Texts of every element of a target
    #[must_use]
    pub fn of_all(target: Target) -> TextOfAll {
        TextOfAll { target }
    }

    /// Answer `fallback` instead of an empty string when unanswerable
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }
}

impl Question for Text {
    type Answer = String;

    fn describe(&self) -> String {
        format!("the text of {}", self.target.name())
    }

    fn evaluate(&self, actor: &Actor) -> ScreenplayResult<String> {
        first_element_text(actor, &self.target)
    }

    fn fallback(&self) -> String {
        self.fallback.clone()
    }
}

/// Texts of all of a target's elements, in document order
#[derive(Debug, Clone)]
pub struct TextOfAll {
    target: Target,
}

impl Question for TextOfAll {
    type Answer = Vec<String>;

    fn describe(&self) -> String {
        format!("the texts of {}", self.target.name())
    }

    fn evaluate(&self, actor: &Actor) -> ScreenplayResult<Vec<String>> {
        let session = actor.session()?;
        self.target
            .resolve(session)
            .iter()
            .map(|e| session.text(e).map_err(|err| err.for_target(self.target.name())))
            .collect()
    }

    fn fallback(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Number of elements a target matches
#[derive(Debug, Clone)]
pub struct Count {
    target: Target,
}

impl Count {
    /// Count a target's elements
    #[must_use]
    pub fn of(target: Target) -> Self {
        Self { target }
    }
}

impl Question for Count {
    type Answer = usize;

    fn describe(&self) -> String {
        format!("the number of {}", self.target.name())
    }

    fn evaluate(&self, actor: &Actor) -> ScreenplayResult<usize> {
        Ok(self.target.resolve(actor.session()?).len())
    }

    fn fallback(&self) -> usize {
        0
    }
}

/// URL of the current page
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentUrl;

impl CurrentUrl {
    /// URL of the current page
    #[must_use]
    pub const fn of_the_page() -> Self {
        Self
    }
}

impl Question for CurrentUrl {
    type Answer = String;

    fn describe(&self) -> String {
        "the current URL".to_string()
    }

    fn evaluate(&self, actor: &Actor) -> ScreenplayResult<String> {
        actor.session()?.current_url()
    }

    fn fallback(&self) -> String {
        String::new()
    }
}

/// A question built from a closure
pub struct About<T, F> {
    description: String,
    fallback: T,
    probe: F,
}

impl<T: fmt::Debug, F> fmt::Debug for About<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("About")
            .field("description", &self.description)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// Build a question from a description, a fallback answer and a probe
pub fn about<T, F>(description: impl Into<String>, fallback: T, probe: F) -> About<T, F>
where
    T: fmt::Debug + Clone + Send + Sync,
    F: Fn(&Actor) -> ScreenplayResult<T> + Send + Sync,
{
    About {
        description: description.into(),
        fallback,
        probe,
    }
}

impl<T, F> Question for About<T, F>
where
    T: fmt::Debug + Clone + Send + Sync,
    F: Fn(&Actor) -> ScreenplayResult<T> + Send + Sync,
{
    type Answer = T;

    fn describe(&self) -> String {
        self.description.clone()
    }

    fn evaluate(&self, actor: &Actor) -> ScreenplayResult<T> {
        (self.probe)(actor)
    }

    fn fallback(&self) -> T {
        self.fallback.clone()
    }
}
