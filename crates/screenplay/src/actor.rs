//! Actors: the entry point for performing tasks and asking questions.
//!
//! An actor is created per scenario, holds its abilities exclusively and
//! releases them when dismissed or dropped. Scenarios obtain actors from a
//! [`Cast`]; there is no global registry.

use crate::ability::{Ability, BrowseTheWeb};
use crate::assertion::SeeThat;
use crate::driver::WebSession;
use crate::journal::Journal;
use crate::question::Question;
use crate::result::{ScreenplayError, ScreenplayResult};
use crate::task::Performable;
use crate::wait::WaitOptions;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

struct HeldAbility {
    description: &'static str,
    ability: Box<dyn Ability>,
}

/// Someone performing a scenario
pub struct Actor {
    name: String,
    abilities: HashMap<TypeId, HeldAbility>,
    journal: Journal,
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field(
                "abilities",
                &self.abilities.values().map(|h| h.description).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

fn downcast_ref<A: Ability + 'static>(ability: &dyn Ability) -> Option<&A> {
    ability.as_any().downcast_ref::<A>()
}

fn downcast_mut<A: Ability + 'static>(ability: &mut dyn Ability) -> Option<&mut A> {
    ability.as_any_mut().downcast_mut::<A>()
}

impl Actor {
    /// Create an actor without abilities
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abilities: HashMap::new(),
            journal: Journal::new(),
        }
    }

    /// Give the actor an ability
    #[must_use]
    pub fn who_can<A: Ability + 'static>(mut self, ability: A) -> Self {
        self.can(ability);
        self
    }

    /// Give the actor an ability, replacing and releasing one of the same type
    pub fn can<A: Ability + 'static>(&mut self, ability: A) {
        let held = HeldAbility {
            description: A::description(),
            ability: Box::new(ability),
        };
        if let Some(mut previous) = self.abilities.insert(TypeId::of::<A>(), held) {
            warn!(actor = %self.name, ability = previous.description, "replacing ability");
            if let Err(e) = previous.ability.release() {
                warn!(
                    actor = %self.name,
                    ability = previous.description,
                    error = %e,
                    "release failed"
                );
            }
        }
    }

    /// Actor name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the actor holds an ability of type `A`
    #[must_use]
    pub fn has_ability<A: Ability + 'static>(&self) -> bool {
        self.abilities.contains_key(&TypeId::of::<A>())
    }

    /// Borrow an ability
    ///
    /// # Errors
    ///
    /// Returns `MissingAbility` if the actor does not hold one of type `A`.
    pub fn ability<A: Ability + 'static>(&self) -> ScreenplayResult<&A> {
        self.abilities
            .get(&TypeId::of::<A>())
            .and_then(|held| downcast_ref::<A>(&*held.ability))
            .ok_or_else(|| self.missing::<A>())
    }

    /// Mutably borrow an ability
    ///
    /// # Errors
    ///
    /// Returns `MissingAbility` if the actor does not hold one of type `A`.
    pub fn ability_mut<A: Ability + 'static>(&mut self) -> ScreenplayResult<&mut A> {
        let missing = self.missing::<A>();
        self.abilities
            .get_mut(&TypeId::of::<A>())
            .and_then(|held| downcast_mut::<A>(&mut *held.ability))
            .ok_or(missing)
    }

    fn missing<A: Ability>(&self) -> ScreenplayError {
        ScreenplayError::MissingAbility {
            actor: self.name.clone(),
            ability: A::description().to_string(),
        }
    }

    /// The actor's browser session
    ///
    /// # Errors
    ///
    /// Returns `MissingAbility` if the actor cannot browse the web.
    pub fn session(&self) -> ScreenplayResult<&dyn WebSession> {
        Ok(BrowseTheWeb::as_(self)?.session())
    }

    /// The actor's browser session, for actions
    ///
    /// # Errors
    ///
    /// Returns `MissingAbility` if the actor cannot browse the web.
    pub fn session_mut(&mut self) -> ScreenplayResult<&mut dyn WebSession> {
        Ok(BrowseTheWeb::as_mut(self)?.session_mut())
    }

    /// Perform a task or interaction.
    ///
    /// The activity is journaled; the first error propagates unchanged.
    ///
    /// # Errors
    ///
    /// Returns whatever error the activity raised.
    pub fn attempts_to<P: Performable + ?Sized>(&mut self, activity: &P) -> ScreenplayResult<()> {
        let description = activity.describe();
        let depth = self.journal.depth();
        let span = info_span!("attempt", actor = %self.name, activity = %description, depth);
        let _entered = span.enter();

        let index = self.journal.begin(description.as_str());
        let started = Instant::now();
        let outcome = activity.perform_as(self);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.journal.finish(index, outcome.as_ref().map(|_| ()));

        match &outcome {
            Ok(()) if depth == 0 => info!(elapsed_ms, "{} attempted to {description}", self.name),
            Ok(()) => debug!(elapsed_ms, "done"),
            Err(e) if depth == 0 => error!(
                elapsed_ms,
                error = %e,
                "{} failed to {description}",
                self.name
            ),
            Err(e) => debug!(elapsed_ms, error = %e, "failed"),
        }
        outcome
    }

    /// Answer a question, falling back to its default when it cannot be answered
    pub fn asks_for<Q: Question + ?Sized>(&self, question: &Q) -> Q::Answer {
        question.answered_by(self)
    }

    /// Check an assertion once
    ///
    /// # Errors
    ///
    /// Returns `AssertionFailed` if the answer does not match.
    pub fn should<Q: Question>(&self, assertion: &SeeThat<Q>) -> ScreenplayResult<()> {
        assertion.check(self)
    }

    /// Poll an assertion until it holds or the timeout elapses
    ///
    /// # Errors
    ///
    /// Returns `AssertionFailed` naming the last observed answer.
    pub fn should_within<Q: Question>(
        &self,
        assertion: &SeeThat<Q>,
        options: &WaitOptions,
    ) -> ScreenplayResult<()> {
        assertion.check_within(self, options)
    }

    /// Everything the actor attempted
    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Failing activity path and error, if anything failed
    #[must_use]
    pub fn failure_report(&self) -> Option<String> {
        self.journal
            .failure_report()
            .map(|report| format!("{} failed while attempting to:\n{report}", self.name))
    }

    /// Release every ability, reporting the first release error
    ///
    /// # Errors
    ///
    /// Returns the first error raised while releasing.
    pub fn dismiss(mut self) -> ScreenplayResult<()> {
        let mut first_error = None;
        for (_, mut held) in self.abilities.drain() {
            if let Err(e) = held.ability.release() {
                first_error.get_or_insert(e);
            }
        }
        debug!(actor = %self.name, "dismissed");
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for Actor {
    fn drop(&mut self) {
        for (_, mut held) in self.abilities.drain() {
            if let Err(e) = held.ability.release() {
                warn!(actor = %self.name, ability = held.description, error = %e, "release failed");
            }
        }
    }
}

// =============================================================================
// CAST
// =============================================================================

/// Supplies actors for scenarios
pub trait Cast {
    /// A fresh actor with the cast's standard abilities
    ///
    /// # Errors
    ///
    /// Returns error if an ability cannot be provisioned.
    fn actor_named(&self, name: &str) -> ScreenplayResult<Actor>;
}

/// Cast whose actors each browse the web through a new session
pub struct SessionCast<F> {
    factory: F,
}

impl<F> fmt::Debug for SessionCast<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCast").finish_non_exhaustive()
    }
}

impl<F, S> SessionCast<F>
where
    F: Fn() -> ScreenplayResult<S>,
    S: WebSession + 'static,
{
    /// Create a cast from a session factory
    #[must_use]
    pub const fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F, S> Cast for SessionCast<F>
where
    F: Fn() -> ScreenplayResult<S>,
    S: WebSession + 'static,
{
    fn actor_named(&self, name: &str) -> ScreenplayResult<Actor> {
        let session = (self.factory)()?;
        debug!(actor = name, "casting actor");
        Ok(Actor::named(name).who_can(BrowseTheWeb::with(session)))
    }
}
