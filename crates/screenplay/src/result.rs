//! Result and error types for Screenplay.

use std::time::Duration;
use thiserror::Error;

/// Result type for Screenplay operations
pub type ScreenplayResult<T> = Result<T, ScreenplayError>;

/// Errors that can occur while performing tasks and answering questions
#[derive(Debug, Error)]
pub enum ScreenplayError {
    /// No element matched when an action was attempted
    #[error("Element not found: {target} ({query})")]
    ElementNotFound {
        /// Target display name (or element handle when raised by a session)
        target: String,
        /// Rendered locator query
        query: String,
    },

    /// Element exists but cannot be acted on
    #[error("Element not interactable: {target}: {reason}")]
    ElementNotInteractable {
        /// Target display name (or element handle when raised by a session)
        target: String,
        /// Why the action was refused
        reason: String,
    },

    /// A wait condition was not satisfied in time
    #[error("Timed out after {elapsed:?} (limit {timeout:?}) waiting for {condition}")]
    WaitTimeout {
        /// Description of the awaited condition
        condition: String,
        /// Time actually spent waiting
        elapsed: Duration,
        /// Configured timeout
        timeout: Duration,
    },

    /// A question's answer did not match the expectation
    #[error("Assertion failed: expected {question} {expected}, but was {actual}")]
    AssertionFailed {
        /// Question description
        question: String,
        /// Expectation description
        expected: String,
        /// Observed answer
        actual: String,
    },

    /// Locator template or parameters are malformed
    #[error("Invalid locator: {message}")]
    InvalidLocator {
        /// Error message
        message: String,
    },

    /// Actor lacks the ability required by an activity
    #[error("{actor} does not have the ability to {ability}")]
    MissingAbility {
        /// Actor name
        actor: String,
        /// Ability name
        ability: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser session error
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScreenplayError {
    /// Create a not-found error for a target
    #[must_use]
    pub fn not_found(target: impl Into<String>, query: impl Into<String>) -> Self {
        Self::ElementNotFound {
            target: target.into(),
            query: query.into(),
        }
    }

    /// Create a not-interactable error for a target
    #[must_use]
    pub fn not_interactable(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ElementNotInteractable {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a session error
    #[must_use]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid locator error
    #[must_use]
    pub fn invalid_locator(message: impl Into<String>) -> Self {
        Self::InvalidLocator {
            message: message.into(),
        }
    }

    /// Replace a session-level element reference with the target's display name.
    ///
    /// Sessions only know element handles; the interaction that raised the
    /// error knows which target it was acting on.
    #[must_use]
    pub fn for_target(self, name: &str) -> Self {
        match self {
            Self::ElementNotFound { query, .. } => Self::ElementNotFound {
                target: name.to_string(),
                query,
            },
            Self::ElementNotInteractable { reason, .. } => Self::ElementNotInteractable {
                target: name.to_string(),
                reason,
            },
            other => other,
        }
    }

    /// Whether the error means the element could not be located
    #[must_use]
    pub const fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. } | Self::WaitTimeout { .. })
    }
}
