//! Wait engine.
//!
//! Reconciles test timing with asynchronous rendering by polling a
//! condition until it holds or a timeout elapses:
//!
//! ```text
//! Pending ──check true──▶ Satisfied
//!    │  ▲
//!    │  └── sleep min(poll, remaining)
//!    └──elapsed ≥ timeout──▶ TimedOut
//! ```
//!
//! The condition is checked immediately, so a condition that already holds
//! costs no sleep. Waits are blocking and are cancelled only by their
//! timeout.

use crate::driver::{ElementHandle, WebSession};
use crate::result::{ScreenplayError, ScreenplayResult};
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (15 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 15_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Smallest poll interval the engine will sleep for
pub const MIN_POLL_INTERVAL_MS: u64 = 1;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Per-call wait configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create default wait options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get polling interval as Duration, never below [`MIN_POLL_INTERVAL_MS`]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }
}

// =============================================================================
// WAIT CONDITION
// =============================================================================

/// A condition that can be polled
pub trait WaitCondition {
    /// Check if the condition holds now
    fn check(&self) -> bool;

    /// Human-readable description, used in timeout errors
    fn description(&self) -> String;
}

/// Condition backed by a closure
pub struct FnCondition<F: Fn() -> bool> {
    func: F,
    description: String,
}

impl<F: Fn() -> bool> fmt::Debug for FnCondition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<F: Fn() -> bool> FnCondition<F> {
    /// Create a new function condition
    pub fn new(func: F, description: impl Into<String>) -> Self {
        Self {
            func,
            description: description.into(),
        }
    }
}

impl<F: Fn() -> bool> WaitCondition for FnCondition<F> {
    fn check(&self) -> bool {
        (self.func)()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

// =============================================================================
// ELEMENT STATES
// =============================================================================

/// Observable state of a target's elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementState {
    /// At least one element is in the DOM
    Present,
    /// At least one element is visible
    Visible,
    /// At least one element is visible and enabled
    Clickable,
    /// No element matches
    Absent,
    /// No matching element is visible
    Hidden,
}

impl ElementState {
    /// Whether the target is in this state right now
    #[must_use]
    pub fn holds(self, session: &dyn WebSession, target: &Target) -> bool {
        let elements = target.resolve(session);
        let visible = |e: &ElementHandle| session.is_visible(e).unwrap_or(false);
        match self {
            Self::Present => !elements.is_empty(),
            Self::Absent => elements.is_empty(),
            Self::Visible => elements.iter().any(visible),
            Self::Hidden => !elements.iter().any(visible),
            Self::Clickable => elements
                .iter()
                .any(|e| visible(e) && session.is_enabled(e).unwrap_or(false)),
        }
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
            Self::Absent => "absent",
            Self::Hidden => "hidden",
        })
    }
}

/// Condition that a target reaches an [`ElementState`]
#[derive(Debug)]
pub struct TargetCondition<'a> {
    session: &'a dyn WebSession,
    target: &'a Target,
    state: ElementState,
}

impl<'a> TargetCondition<'a> {
    /// Create a new target condition
    #[must_use]
    pub fn new(session: &'a dyn WebSession, target: &'a Target, state: ElementState) -> Self {
        Self {
            session,
            target,
            state,
        }
    }
}

impl WaitCondition for TargetCondition<'_> {
    fn check(&self) -> bool {
        self.state.holds(self.session, self.target)
    }

    fn description(&self) -> String {
        format!("{} to be {}", self.target.name(), self.state)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// State of a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// Still polling
    Pending,
    /// Condition held
    Satisfied,
    /// Timeout elapsed first
    TimedOut,
}

/// Outcome of a finished wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Terminal state
    pub state: WaitState,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of condition checks
    pub attempts: u32,
    /// What was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Whether the condition held
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.state == WaitState::Satisfied
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Polling wait engine
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter;

impl Waiter {
    /// Create a new waiter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Poll a condition to a terminal state without failing
    pub fn poll<C: WaitCondition + ?Sized>(
        &self,
        condition: &C,
        options: &WaitOptions,
    ) -> WaitResult {
        let start = Instant::now();
        let timeout = options.timeout();
        let poll_interval = options.poll_interval();
        let mut state = WaitState::Pending;
        let mut attempts = 0;

        while state == WaitState::Pending {
            attempts += 1;
            if condition.check() {
                state = WaitState::Satisfied;
                continue;
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                state = WaitState::TimedOut;
                continue;
            }
            std::thread::sleep(poll_interval.min(timeout - elapsed));
        }

        let result = WaitResult {
            state,
            elapsed: start.elapsed(),
            attempts,
            waited_for: condition.description(),
        };
        debug!(
            condition = %result.waited_for,
            state = ?result.state,
            attempts,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "wait finished"
        );
        result
    }

    /// Wait for a condition, failing with `WaitTimeout` if it never holds
    pub fn wait_for<C: WaitCondition + ?Sized>(
        &self,
        condition: &C,
        options: &WaitOptions,
    ) -> ScreenplayResult<WaitResult> {
        let result = self.poll(condition, options);
        match result.state {
            WaitState::Satisfied => Ok(result),
            WaitState::Pending | WaitState::TimedOut => Err(ScreenplayError::WaitTimeout {
                condition: result.waited_for,
                elapsed: result.elapsed,
                timeout: options.timeout(),
            }),
        }
    }
}

/// Wait until a predicate holds
pub fn wait_until<F>(
    predicate: F,
    description: impl Into<String>,
    options: &WaitOptions,
) -> ScreenplayResult<WaitResult>
where
    F: Fn() -> bool,
{
    Waiter::new().wait_for(&FnCondition::new(predicate, description), options)
}
