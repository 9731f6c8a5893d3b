//! Assertions over question answers.
//!
//! `see_that(question, matcher)` pairs a question with an expectation.
//! [`Actor::should`] checks it once; [`Actor::should_within`] polls it
//! through the wait engine for eventually-consistent UI state and, on
//! timeout, fails with the last answer it saw.

use crate::actor::Actor;
use crate::question::Question;
use crate::result::{ScreenplayError, ScreenplayResult};
use crate::wait::{FnCondition, WaitOptions, Waiter};
use std::cell::RefCell;
use std::fmt::{self, Debug};

/// An expectation about an answer
pub struct Matcher<T> {
    description: String,
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<T> Matcher<T> {
    /// Create a matcher from a description and predicate
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Check an answer
    #[must_use]
    pub fn matches(&self, answer: &T) -> bool {
        (self.predicate)(answer)
    }

    /// Expectation description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Answer equals `expected`
pub fn is<T>(expected: T) -> Matcher<T>
where
    T: PartialEq + Debug + Send + Sync + 'static,
{
    Matcher::new(format!("is {expected:?}"), move |answer| *answer == expected)
}

/// Answer is `true`
#[must_use]
pub fn is_true() -> Matcher<bool> {
    Matcher::new("is true", |answer: &bool| *answer)
}

/// Answer is `false`
#[must_use]
pub fn is_false() -> Matcher<bool> {
    Matcher::new("is false", |answer: &bool| !*answer)
}

/// Answer contains `needle`
pub fn contains_text(needle: impl Into<String>) -> Matcher<String> {
    let needle = needle.into();
    Matcher::new(format!("contains {needle:?}"), move |answer: &String| {
        answer.contains(needle.as_str())
    })
}

/// Answer is at least `minimum`
pub fn at_least<T>(minimum: T) -> Matcher<T>
where
    T: PartialOrd + Debug + Send + Sync + 'static,
{
    Matcher::new(format!("is at least {minimum:?}"), move |answer| {
        *answer >= minimum
    })
}

/// A question paired with an expectation
pub struct SeeThat<Q: Question> {
    question: Q,
    matcher: Matcher<Q::Answer>,
}

impl<Q: Question> Debug for SeeThat<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeeThat")
            .field("question", &self.question.describe())
            .field("matcher", &self.matcher)
            .finish()
    }
}

/// Pair a question with an expectation
pub fn see_that<Q: Question>(question: Q, matcher: Matcher<Q::Answer>) -> SeeThat<Q> {
    SeeThat { question, matcher }
}

impl<Q: Question> SeeThat<Q> {
    fn failure(&self, actual: String) -> ScreenplayError {
        ScreenplayError::AssertionFailed {
            question: self.question.describe(),
            expected: self.matcher.description().to_string(),
            actual,
        }
    }

    /// Check once
    ///
    /// # Errors
    ///
    /// Returns `AssertionFailed` if the answer does not match.
    pub fn check(&self, actor: &Actor) -> ScreenplayResult<()> {
        let answer = actor.asks_for(&self.question);
        if self.matcher.matches(&answer) {
            Ok(())
        } else {
            Err(self.failure(format!("{answer:?}")))
        }
    }

    /// Poll until the answer matches
    ///
    /// # Errors
    ///
    /// Returns `AssertionFailed` with the last answer if the timeout elapses.
    pub fn check_within(&self, actor: &Actor, options: &WaitOptions) -> ScreenplayResult<()> {
        let last_answer = RefCell::new(String::new());
        let condition = FnCondition::new(
            || {
                let answer = actor.asks_for(&self.question);
                *last_answer.borrow_mut() = format!("{answer:?}");
                self.matcher.matches(&answer)
            },
            format!("{} {}", self.question.describe(), self.matcher.description()),
        );
        match Waiter::new().wait_for(&condition, options) {
            Ok(_) => Ok(()),
            Err(ScreenplayError::WaitTimeout { elapsed, .. }) => Err(self.failure(format!(
                "{} after {elapsed:?}",
                last_answer.borrow()
            ))),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ability::BrowseTheWeb;
    use crate::driver::{MockElement, MockSession};
    use crate::locator::Locator;
    use crate::question::{Count, Text, Visibility};
    use crate::target::Target;
    use std::time::Duration;

    fn toast() -> Target {
        Target::the("the success toast").located_by(Locator::css(".toast-success"))
    }

    fn quick() -> WaitOptions {
        WaitOptions::new().with_timeout(60).with_poll_interval(10)
    }

    mod matcher_tests {
        use super::*;

        #[test]
        fn test_matchers() {
            assert!(is(3).matches(&3));
            assert!(!is(3).matches(&4));
            assert!(is_true().matches(&true));
            assert!(is_false().matches(&false));
            assert!(contains_text("éxito").matches(&"Paciente registrado con éxito".to_string()));
            assert!(at_least(2_usize).matches(&5));
            assert!(!at_least(2_usize).matches(&1));
            assert_eq!(at_least(2_usize).description(), "is at least 2");
        }
    }

    mod should_tests {
        use super::*;

        #[test]
        fn test_should_passes_and_fails() {
            let session = MockSession::new();
            let actor = Actor::named("Nurse").who_can(BrowseTheWeb::with(session.clone()));
            actor.should(&see_that(Visibility::of(toast()), is_false())).unwrap();
            let err = actor
                .should(&see_that(Visibility::of(toast()), is_true()))
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Assertion failed: expected the visibility of the success toast is true, but was false"
            );
        }

        #[test]
        fn test_should_within_waits_for_late_answer() {
            let session = MockSession::new();
            session.add_element(
                MockElement::matching("t", &Locator::css(".toast-success"))
                    .with_text("Guardado exitosamente")
                    .appearing_after(Duration::from_millis(30)),
            );
            let actor = Actor::named("Nurse").who_can(BrowseTheWeb::with(session));
            actor
                .should_within(
                    &see_that(Text::of(toast()), contains_text("exitosamente")),
                    &WaitOptions::new().with_timeout(1_000).with_poll_interval(5),
                )
                .unwrap();
        }

        #[test]
        fn test_should_within_reports_last_answer() {
            let session = MockSession::new();
            session.add_element(MockElement::matching("t", &Locator::css(".toast-success")));
            let actor = Actor::named("Nurse").who_can(BrowseTheWeb::with(session));
            let err = actor
                .should_within(&see_that(Count::of(toast()), at_least(2)), &quick())
                .unwrap_err();
            match err {
                ScreenplayError::AssertionFailed {
                    question,
                    expected,
                    actual,
                } => {
                    assert_eq!(question, "the number of the success toast");
                    assert_eq!(expected, "is at least 2");
                    assert!(actual.starts_with("1 after"), "{actual}");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
