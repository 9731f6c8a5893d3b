//! Tasks: named, composable sequences of activities.
//!
//! A task is assembled by a [`TaskBuilder`] and frozen by `build`. Optional
//! steps are decided while building (`then_if`, `then_optional`); a built
//! task performs exactly its steps, in order, and stops at the first
//! failure.

use crate::actor::Actor;
use crate::result::ScreenplayResult;
use std::fmt;
use std::sync::Arc;

/// Something an actor can attempt
pub trait Performable: Send + Sync {
    /// Description used in logs and the journal
    fn describe(&self) -> String;

    /// Carry out the activity as the given actor
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the activity.
    fn perform_as(&self, actor: &mut Actor) -> ScreenplayResult<()>;
}

impl<P: Performable + ?Sized> Performable for Arc<P> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn perform_as(&self, actor: &mut Actor) -> ScreenplayResult<()> {
        (**self).perform_as(actor)
    }
}

/// An immutable, shareable sequence of activities
#[derive(Clone)]
pub struct Task {
    name: String,
    steps: Arc<[Arc<dyn Performable>]>,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field(
                "steps",
                &self.steps.iter().map(|s| s.describe()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Task {
    /// Start building a task
    #[must_use]
    pub fn where_(name: impl Into<String>) -> TaskBuilder {
        TaskBuilder {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Task name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of direct steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the task has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step descriptions, in order
    #[must_use]
    pub fn step_descriptions(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.describe()).collect()
    }

    /// A task performing this task's steps, then `other`'s
    #[must_use]
    pub fn followed_by(&self, other: &Self) -> Self {
        let steps: Vec<_> = self.steps.iter().chain(other.steps.iter()).cloned().collect();
        Self {
            name: format!("{}, then {}", self.name, other.name),
            steps: steps.into(),
        }
    }
}

impl Performable for Task {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn perform_as(&self, actor: &mut Actor) -> ScreenplayResult<()> {
        for step in self.steps.iter() {
            actor.attempts_to(step.as_ref())?;
        }
        Ok(())
    }
}

/// Assembles a [`Task`]
pub struct TaskBuilder {
    name: String,
    steps: Vec<Arc<dyn Performable>>,
}

impl fmt::Debug for TaskBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBuilder")
            .field("name", &self.name)
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl TaskBuilder {
    /// Append a step
    #[must_use]
    pub fn then(mut self, step: impl Performable + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Append a step only when `include` is true
    #[must_use]
    pub fn then_if(self, include: bool, step: impl Performable + 'static) -> Self {
        if include {
            self.then(step)
        } else {
            self
        }
    }

    /// Append a step if present
    #[must_use]
    pub fn then_optional<P: Performable + 'static>(self, step: Option<P>) -> Self {
        match step {
            Some(step) => self.then(step),
            None => self,
        }
    }

    /// Append every step of an iterator
    #[must_use]
    pub fn then_all<I, P>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Performable + 'static,
    {
        self.steps
            .extend(steps.into_iter().map(|s| Arc::new(s) as Arc<dyn Performable>));
        self
    }

    /// Freeze the task
    #[must_use]
    pub fn build(self) -> Task {
        Task {
            name: self.name,
            steps: self.steps.into(),
        }
    }
}
