//! Abilities: what an actor can do.
//!
//! Abilities are stored on the actor keyed by type, so an actor holds at
//! most one of each. [`BrowseTheWeb`] wraps the actor's browser session.

use crate::actor::Actor;
use crate::driver::WebSession;
use crate::result::ScreenplayResult;
use std::any::Any;
use std::fmt;

/// Downcasting support for trait objects
pub trait AsAny {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A capability held exclusively by one actor.
///
/// `release` is called when the actor is dismissed or the ability is
/// replaced; implementations free external resources there.
pub trait Ability: AsAny + Send + fmt::Debug {
    /// Completes "... does not have the ability to {description}"
    fn description() -> &'static str
    where
        Self: Sized;

    /// Free resources held by the ability
    fn release(&mut self) -> ScreenplayResult<()> {
        Ok(())
    }
}

/// The ability to drive a browser session
#[derive(Debug)]
pub struct BrowseTheWeb {
    session: Box<dyn WebSession>,
}

impl BrowseTheWeb {
    /// Browse the web through the given session
    #[must_use]
    pub fn with(session: impl WebSession + 'static) -> Self {
        Self {
            session: Box::new(session),
        }
    }

    /// Browse the web through an already boxed session
    #[must_use]
    pub fn with_boxed(session: Box<dyn WebSession>) -> Self {
        Self { session }
    }

    /// The session, for read-only queries
    #[must_use]
    pub fn session(&self) -> &dyn WebSession {
        self.session.as_ref()
    }

    /// The session, for actions
    pub fn session_mut(&mut self) -> &mut dyn WebSession {
        self.session.as_mut()
    }

    /// The browsing ability of an actor
    ///
    /// # Errors
    ///
    /// Returns `MissingAbility` if the actor cannot browse the web.
    pub fn as_(actor: &Actor) -> ScreenplayResult<&Self> {
        actor.ability::<Self>()
    }

    /// Mutable browsing ability of an actor
    ///
    /// # Errors
    ///
    /// Returns `MissingAbility` if the actor cannot browse the web.
    pub fn as_mut(actor: &mut Actor) -> ScreenplayResult<&mut Self> {
        actor.ability_mut::<Self>()
    }
}

impl Ability for BrowseTheWeb {
    fn description() -> &'static str {
        "browse the web"
    }

    fn release(&mut self) -> ScreenplayResult<()> {
        self.session.close()
    }
}
