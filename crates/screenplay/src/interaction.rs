//! Interactions: the primitive activities.
//!
//! Each interaction acts through the actor's session on the first target of
//! its chain that can be resolved. Element interactions may declare
//! patience, in which case they wait for the element to be present before
//! acting; without it they resolve once.
//!
//! # Fallback targets
//!
//! `or_else` appends a target to the chain. When a target fails to resolve
//! (not found, or not present within the patience window) the next one is
//! tried. Any other failure, and a resolution failure on the last target,
//! fails the interaction.

use crate::actor::Actor;
use crate::driver::ElementHandle;
use crate::result::{ScreenplayError, ScreenplayResult};
use crate::target::Target;
use crate::task::Performable;
use crate::wait::{ElementState, TargetCondition, WaitOptions, Waiter};
use std::time::Duration;
use tracing::{debug, warn};

// =============================================================================
// GRACE PERIODS
// =============================================================================

/// Upper bound on any grace period
pub const MAX_GRACE: Duration = Duration::from_secs(2);

/// A named, bounded pause for transitions no element state can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grace {
    name: &'static str,
    duration: Duration,
}

impl Grace {
    /// Define a grace period; durations above [`MAX_GRACE`] are capped
    #[must_use]
    pub const fn new(name: &'static str, duration: Duration) -> Self {
        let duration = if duration.as_millis() > MAX_GRACE.as_millis() {
            MAX_GRACE
        } else {
            duration
        };
        Self { name, duration }
    }

    /// Name used in logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Length of the pause
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

/// Toast notifications sliding in
pub const TOAST_ANIMATION_GRACE: Grace =
    Grace::new("toast animation", Duration::from_millis(500));

/// Modal dialogs fading in or out
pub const MODAL_TRANSITION_GRACE: Grace =
    Grace::new("modal transition", Duration::from_millis(300));

// =============================================================================
// INTERACTION
// =============================================================================

/// What an interaction does
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Navigate to a URL
    Open {
        /// Absolute URL
        url: String,
    },
    /// Click an element
    Click,
    /// Clear a field, then type into it
    Enter {
        /// Text to type
        value: String,
        /// Keep the value out of logs
        secret: bool,
    },
    /// Clear a field
    Clear,
    /// Choose an option by its label
    SelectByVisibleText {
        /// Option label
        text: String,
    },
    /// Choose an option by its value
    SelectByValue {
        /// Option value
        value: String,
    },
    /// Wait for an element state
    WaitUntil {
        /// Awaited state
        state: ElementState,
        /// Timeout and poll interval
        options: WaitOptions,
    },
    /// Named grace period
    Pause {
        /// The pause
        grace: Grace,
    },
}

/// A primitive activity
#[derive(Debug, Clone)]
pub struct Interaction {
    action: Action,
    targets: Vec<Target>,
    patience: Option<WaitOptions>,
}

impl Interaction {
    fn on(action: Action, target: Target) -> Self {
        Self {
            action,
            targets: vec![target],
            patience: None,
        }
    }

    fn without_target(action: Action) -> Self {
        Self {
            action,
            targets: Vec::new(),
            patience: None,
        }
    }

    /// Try `target` when the earlier targets cannot be resolved
    #[must_use]
    pub fn or_else(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Wait for each target to be present before acting on it
    #[must_use]
    pub fn waiting_up_to(mut self, options: WaitOptions) -> Self {
        self.patience = Some(options);
        self
    }

    /// Bound the interaction's wait
    ///
    /// For `WaitUntil` this is the wait itself; for element interactions it
    /// sets the patience timeout.
    #[must_use]
    pub fn for_no_more_than(mut self, timeout: Duration) -> Self {
        let ms = timeout.as_millis() as u64;
        match &mut self.action {
            Action::WaitUntil { options, .. } => *options = options.with_timeout(ms),
            _ => self.patience = Some(self.patience.unwrap_or_default().with_timeout(ms)),
        }
        self
    }

    /// Poll interval of the interaction's wait
    #[must_use]
    pub fn polling_every(mut self, interval: Duration) -> Self {
        let ms = interval.as_millis() as u64;
        match &mut self.action {
            Action::WaitUntil { options, .. } => *options = options.with_poll_interval(ms),
            _ => self.patience = Some(self.patience.unwrap_or_default().with_poll_interval(ms)),
        }
        self
    }

    /// The action performed
    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Target chain, primary first
    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Patience before acting, if any
    #[must_use]
    pub fn patience(&self) -> Option<&WaitOptions> {
        self.patience.as_ref()
    }

    fn target_name(&self) -> &str {
        self.targets.first().map_or("nothing", Target::name)
    }

    fn on_first_resolving<F>(&self, mut attempt: F) -> ScreenplayResult<()>
    where
        F: FnMut(&Target) -> ScreenplayResult<()>,
    {
        for (position, target) in self.targets.iter().enumerate() {
            match attempt(target) {
                Ok(()) => return Ok(()),
                Err(e) if e.is_resolution_failure() && position + 1 < self.targets.len() => {
                    warn!(
                        target_name = target.name(),
                        fallback = self.targets[position + 1].name(),
                        error = %e,
                        "target unresolved, trying fallback"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Err(ScreenplayError::invalid_locator(format!(
            "{} has no target",
            self.describe()
        )))
    }

    fn locate(&self, actor: &Actor, target: &Target) -> ScreenplayResult<ElementHandle> {
        let session = actor.session()?;
        if let Some(options) = &self.patience {
            let present = TargetCondition::new(session, target, ElementState::Present);
            Waiter::new().wait_for(&present, options)?;
        }
        let element = target
            .resolve(session)
            .into_iter()
            .next()
            .ok_or_else(|| ScreenplayError::not_found(target.name(), target.describe_locators()))?;
        debug!(target_name = target.name(), element = %element, "located");
        Ok(element)
    }

    fn act_on(&self, actor: &mut Actor, target: &Target) -> ScreenplayResult<()> {
        let element = self.locate(actor, target)?;
        let session = actor.session_mut()?;
        let outcome = match &self.action {
            Action::Click => session.click(&element),
            Action::Enter { value, .. } => session
                .clear(&element)
                .and_then(|()| session.type_text(&element, value)),
            Action::Clear => session.clear(&element),
            Action::SelectByVisibleText { text } => session.select_by_visible_text(&element, text),
            Action::SelectByValue { value } => session.select_by_value(&element, value),
            Action::Open { .. } | Action::WaitUntil { .. } | Action::Pause { .. } => Ok(()),
        };
        outcome.map_err(|e| e.for_target(target.name()))
    }
}

impl Performable for Interaction {
    fn describe(&self) -> String {
        let target = self.target_name();
        match &self.action {
            Action::Open { url } => format!("open {url}"),
            Action::Click => format!("click on {target}"),
            Action::Enter { secret: true, .. } => format!("enter a secret value into {target}"),
            Action::Enter { value, .. } => format!("enter '{value}' into {target}"),
            Action::Clear => format!("clear {target}"),
            Action::SelectByVisibleText { text } => format!("select '{text}' from {target}"),
            Action::SelectByValue { value } => format!("select value '{value}' from {target}"),
            Action::WaitUntil { state, .. } => format!("wait until {target} is {state}"),
            Action::Pause { grace } => format!("pause for the {}", grace.name()),
        }
    }

    fn perform_as(&self, actor: &mut Actor) -> ScreenplayResult<()> {
        match &self.action {
            Action::Open { url } => actor.session_mut()?.open(url),
            Action::Pause { grace } => {
                debug!(grace = grace.name(), ms = grace.duration().as_millis() as u64, "pausing");
                std::thread::sleep(grace.duration());
                Ok(())
            }
            Action::WaitUntil { state, options } => self.on_first_resolving(|target| {
                let condition = TargetCondition::new(actor.session()?, target, *state);
                Waiter::new().wait_for(&condition, options).map(|_| ())
            }),
            _ => self.on_first_resolving(|target| self.act_on(actor, target)),
        }
    }
}

// =============================================================================
// BUILDERS
// =============================================================================

/// Navigation
#[derive(Debug, Clone, Copy)]
pub struct Open;

impl Open {
    /// Open a URL
    #[must_use]
    pub fn url(url: impl Into<String>) -> Interaction {
        Interaction::without_target(Action::Open { url: url.into() })
    }
}

/// Clicking
#[derive(Debug, Clone, Copy)]
pub struct Click;

impl Click {
    /// Click a target
    #[must_use]
    pub fn on(target: Target) -> Interaction {
        Interaction::on(Action::Click, target)
    }
}

/// Typing into a field
#[derive(Debug, Clone)]
pub struct Enter {
    value: String,
    secret: bool,
}

impl Enter {
    /// Text to type
    #[must_use]
    pub fn the_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            secret: false,
        }
    }

    /// Text to type, kept out of logs
    #[must_use]
    pub fn the_secret(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            secret: true,
        }
    }

    /// The field to type into
    #[must_use]
    pub fn into_the(self, target: Target) -> Interaction {
        Interaction::on(
            Action::Enter {
                value: self.value,
                secret: self.secret,
            },
            target,
        )
    }
}

/// Clearing a field
#[derive(Debug, Clone, Copy)]
pub struct Clear;

impl Clear {
    /// Clear a target field
    #[must_use]
    pub fn field(target: Target) -> Interaction {
        Interaction::on(Action::Clear, target)
    }
}

/// Choosing from a select element
#[derive(Debug, Clone)]
pub struct SelectFromOptions {
    action: Action,
}

impl SelectFromOptions {
    /// Choose the option with this label
    #[must_use]
    pub fn by_visible_text(text: impl Into<String>) -> Self {
        Self {
            action: Action::SelectByVisibleText { text: text.into() },
        }
    }

    /// Choose the option with this value
    #[must_use]
    pub fn by_value(value: impl Into<String>) -> Self {
        Self {
            action: Action::SelectByValue {
                value: value.into(),
            },
        }
    }

    /// The select element
    #[must_use]
    pub fn from(self, target: Target) -> Interaction {
        Interaction::on(self.action, target)
    }
}

/// Waiting for an element state
#[derive(Debug, Clone, Copy)]
pub struct WaitUntil;

impl WaitUntil {
    /// Wait until `target` is in `state`, with default wait options
    #[must_use]
    pub fn the(target: Target, state: ElementState) -> Interaction {
        Interaction::on(
            Action::WaitUntil {
                state,
                options: WaitOptions::default(),
            },
            target,
        )
    }
}

/// Grace-period pauses
#[derive(Debug, Clone, Copy)]
pub struct Pause;

impl Pause {
    /// Pause for a named grace period
    #[must_use]
    pub fn for_grace(grace: Grace) -> Interaction {
        Interaction::without_target(Action::Pause { grace })
    }
}
