//! Multi-step form wizards.
//!
//! A wizard is a linear state machine `Step(1) -> ... -> Step(n) ->
//! Submitted`, moved forward only by its advance (or, on the last step,
//! submit) button. [`Wizard::build`] produces a task that, for every step,
//! waits for the step's landmark, completes its fills, waits for the button
//! to be clickable and clicks it.

use crate::interaction::{Click, Interaction, WaitUntil};
use crate::target::Target;
use crate::task::Task;
use crate::wait::{ElementState, WaitOptions};
use std::time::Duration;

/// Position in a wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// On step `n` (1-based)
    Step(usize),
    /// Form submitted
    Submitted,
}

impl WizardState {
    /// State after one forward transition in a wizard of `total` steps
    #[must_use]
    pub const fn advance(self, total: usize) -> Self {
        match self {
            Self::Step(n) if n < total => Self::Step(n + 1),
            Self::Step(_) | Self::Submitted => Self::Submitted,
        }
    }
}

/// One page of a wizard
#[derive(Debug, Clone)]
pub struct WizardStep {
    title: String,
    landmark: Target,
    fills: Vec<Interaction>,
}

impl WizardStep {
    /// A step recognised by its landmark element
    #[must_use]
    pub fn titled(title: impl Into<String>, landmark: Target) -> Self {
        Self {
            title: title.into(),
            landmark,
            fills: Vec::new(),
        }
    }

    /// Add a fill
    #[must_use]
    pub fn filling(mut self, fill: Interaction) -> Self {
        self.fills.push(fill);
        self
    }

    /// Add a fill if present
    #[must_use]
    pub fn filling_optional(mut self, fill: Option<Interaction>) -> Self {
        self.fills.extend(fill);
        self
    }

    /// Step title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fills in the order they run
    #[must_use]
    pub fn fills(&self) -> &[Interaction] {
        &self.fills
    }
}

/// A linear multi-step form
#[derive(Debug, Clone)]
pub struct Wizard {
    name: String,
    steps: Vec<WizardStep>,
    advance: Target,
    submit: Target,
    previous: Option<Target>,
    patience: WaitOptions,
}

impl Wizard {
    /// A wizard moved forward by `advance` and finished by `submit`
    #[must_use]
    pub fn named(name: impl Into<String>, advance: Target, submit: Target) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            advance,
            submit,
            previous: None,
            patience: WaitOptions::default(),
        }
    }

    /// Append a step
    #[must_use]
    pub fn step(mut self, step: WizardStep) -> Self {
        self.steps.push(step);
        self
    }

    /// The button returning to the previous step
    #[must_use]
    pub fn going_back_with(mut self, previous: Target) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Wait options for landmarks and buttons
    #[must_use]
    pub const fn waiting_up_to(mut self, options: WaitOptions) -> Self {
        self.patience = options;
        self
    }

    /// Steps in order
    #[must_use]
    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the wizard has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Interaction returning to the previous step, if the wizard has one
    #[must_use]
    pub fn go_back(&self) -> Option<Interaction> {
        self.previous.clone().map(Click::on)
    }

    fn wait_for(&self, target: &Target, state: ElementState) -> Interaction {
        WaitUntil::the(target.clone(), state)
            .for_no_more_than(Duration::from_millis(self.patience.timeout_ms))
            .polling_every(Duration::from_millis(self.patience.poll_interval_ms))
    }

    /// The task completing every step and submitting
    #[must_use]
    pub fn build(&self) -> Task {
        let mut builder = Task::where_(self.name.clone());
        let mut state = WizardState::Step(1);
        for step in &self.steps {
            let WizardState::Step(number) = state else {
                break;
            };
            let button = if number == self.steps.len() {
                &self.submit
            } else {
                &self.advance
            };
            let page = Task::where_(format!("complete step {number}: {}", step.title))
                .then(self.wait_for(&step.landmark, ElementState::Visible))
                .then_all(step.fills.iter().cloned())
                .then(self.wait_for(button, ElementState::Clickable))
                .then(Click::on(button.clone()))
                .build();
            builder = builder.then(page);
            state = state.advance(self.steps.len());
        }
        builder.build()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ability::BrowseTheWeb;
    use crate::actor::Actor;
    use crate::driver::{MockElement, MockSession};
    use crate::interaction::Enter;
    use crate::locator::Locator;

    fn t(id: &str) -> Target {
        Target::the(format!("the {id}")).located_by(Locator::css(format!("#{id}")))
    }

    fn three_step_wizard() -> Wizard {
        Wizard::named("register a patient", t("next"), t("submit"))
            .step(
                WizardStep::titled("basic", t("step1"))
                    .filling(Enter::the_value("Juan").into_the(t("name"))),
            )
            .step(
                WizardStep::titled("vitals", t("step2"))
                    .filling(Enter::the_value("70").into_the(t("hr"))),
            )
            .step(WizardStep::titled("triage", t("step3")))
            .going_back_with(t("previous"))
            .waiting_up_to(WaitOptions::new().with_timeout(200).with_poll_interval(5))
    }

    #[test]
    fn test_state_machine() {
        let s = WizardState::Step(1);
        assert_eq!(s.advance(3), WizardState::Step(2));
        assert_eq!(s.advance(3).advance(3).advance(3), WizardState::Submitted);
        assert_eq!(WizardState::Submitted.advance(3), WizardState::Submitted);
    }

    #[test]
    fn test_build_structure() {
        let task = three_step_wizard().build();
        assert_eq!(
            task.step_descriptions(),
            [
                "complete step 1: basic",
                "complete step 2: vitals",
                "complete step 3: triage"
            ]
        );
    }

    #[test]
    fn test_advances_then_submits() {
        let session = MockSession::new();
        for id in ["step1", "step2", "step3", "name", "hr", "next", "submit", "previous"] {
            session.add_element(MockElement::matching(id, &Locator::css(format!("#{id}"))));
        }
        let mut actor = Actor::named("Nurse").who_can(BrowseTheWeb::with(session.clone()));
        actor.attempts_to(&three_step_wizard().build()).unwrap();
        assert_eq!(
            session.action_history(),
            [
                "clear:name",
                "type:name:Juan",
                "click:next",
                "clear:hr",
                "type:hr:70",
                "click:next",
                "click:submit"
            ]
        );
        assert!(!session.was_called("click:previous"));
    }

    #[test]
    fn test_missing_landmark_stops_before_fills() {
        let session = MockSession::new();
        session.add_element(MockElement::matching("name", &Locator::css("#name")));
        let mut actor = Actor::named("Nurse").who_can(BrowseTheWeb::with(session.clone()));
        let err = actor.attempts_to(&three_step_wizard().build()).unwrap_err();
        assert!(err.to_string().contains("the step1 to be visible"));
        assert!(session.action_history().is_empty());
    }

    #[test]
    fn test_go_back_available_but_unused() {
        let wizard = three_step_wizard();
        assert!(wizard.go_back().is_some());
        assert_eq!(wizard.len(), 3);
    }
}
