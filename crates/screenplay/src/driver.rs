//! WebSession - the driver boundary.
//!
//! Everything the engine does to a page goes through [`WebSession`]:
//! resolving locators to element handles and acting on those handles.
//!
//! # Implementations
//!
//! - [`MockSession`] - scripted elements and call history, for unit testing
//! - `ChromiumSession` - chromiumoxide over CDP (feature `browser`)
//!
//! Resolution never fails: a locator matching nothing resolves to an empty
//! list. Element operations fail with `ElementNotFound` when the handle no
//! longer refers to a live element and with `ElementNotInteractable` when
//! the element refuses the action.

use crate::locator::{Locator, LocatorStrategy};
use crate::result::{ScreenplayError, ScreenplayResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Handle to a live element, valid until the page changes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Session-assigned identifier
    pub id: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Blocking browser session owned by a single actor
pub trait WebSession: Send + fmt::Debug {
    /// Navigate to an absolute URL
    fn open(&mut self, url: &str) -> ScreenplayResult<()>;

    /// Find all elements matching a locator, in document order
    fn resolve(&self, locator: &Locator) -> Vec<ElementHandle>;

    /// Click an element
    fn click(&mut self, element: &ElementHandle) -> ScreenplayResult<()>;

    /// Type text into an element, appending to its value
    fn type_text(&mut self, element: &ElementHandle, text: &str) -> ScreenplayResult<()>;

    /// Clear an input element
    fn clear(&mut self, element: &ElementHandle) -> ScreenplayResult<()>;

    /// Choose the option whose label is `text`
    fn select_by_visible_text(&mut self, element: &ElementHandle, text: &str)
        -> ScreenplayResult<()>;

    /// Choose the option whose value is `value`
    fn select_by_value(&mut self, element: &ElementHandle, value: &str) -> ScreenplayResult<()>;

    /// Visible text of an element
    fn text(&self, element: &ElementHandle) -> ScreenplayResult<String>;

    /// Whether the element is rendered and visible
    fn is_visible(&self, element: &ElementHandle) -> ScreenplayResult<bool>;

    /// Whether the element accepts input
    fn is_enabled(&self, element: &ElementHandle) -> ScreenplayResult<bool>;

    /// URL of the current page
    fn current_url(&self) -> ScreenplayResult<String>;

    /// Release the underlying browser resources
    fn close(&mut self) -> ScreenplayResult<()> {
        Ok(())
    }
}

// ============================================================================
// MockSession
// ============================================================================

/// Scripted element for [`MockSession`]
#[derive(Debug, Clone)]
pub struct MockElement {
    id: String,
    matches: Vec<(LocatorStrategy, String)>,
    text: String,
    visible: bool,
    enabled: bool,
    appears_after: Duration,
    options: Vec<(String, String)>,
    reveals: Vec<String>,
}

impl MockElement {
    /// Element with an id, matched by a locator
    #[must_use]
    pub fn matching(id: impl Into<String>, locator: &Locator) -> Self {
        Self {
            id: id.into(),
            matches: vec![(locator.strategy(), locator.query().to_string())],
            text: String::new(),
            visible: true,
            enabled: true,
            appears_after: Duration::ZERO,
            options: Vec::new(),
            reveals: Vec::new(),
        }
    }

    /// Also match another locator
    #[must_use]
    pub fn also_matching(mut self, locator: &Locator) -> Self {
        self.matches
            .push((locator.strategy(), locator.query().to_string()));
        self
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Present in the DOM but not visible
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Visible but not accepting input
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Only resolvable once this long has passed since it was added
    #[must_use]
    pub const fn appearing_after(mut self, delay: Duration) -> Self {
        self.appears_after = delay;
        self
    }

    /// Make the element a select with `(label, value)` options
    #[must_use]
    pub fn with_options<I, L, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|(l, v)| (l.into(), v.into()))
            .collect();
        self
    }

    /// Clicking this element makes the element with `id` visible
    #[must_use]
    pub fn revealing(mut self, id: impl Into<String>) -> Self {
        self.reveals.push(id.into());
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    elements: Vec<(MockElement, Instant)>,
    values: HashMap<String, String>,
    history: Vec<String>,
    closed: bool,
}

impl MockState {
    fn live(&self, id: &str) -> ScreenplayResult<&MockElement> {
        let now = Instant::now();
        self.elements
            .iter()
            .find(|(el, since)| el.id == id && now >= *since)
            .map(|(el, _)| el)
            .ok_or_else(|| ScreenplayError::not_found(id, "stale element handle"))
    }

    fn interactable(&self, id: &str) -> ScreenplayResult<&MockElement> {
        let el = self.live(id)?;
        if !el.visible {
            return Err(ScreenplayError::not_interactable(id, "element is not visible"));
        }
        if !el.enabled {
            return Err(ScreenplayError::not_interactable(id, "element is disabled"));
        }
        Ok(el)
    }
}

/// Recording session double for unit tests.
///
/// Clones share state, so a test can keep a handle for inspecting the call
/// history after the session has been given to an actor.
#[derive(Debug, Clone, Default)]
pub struct MockSession {
    state: Arc<Mutex<MockState>>,
}

impl MockSession {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a scripted element; its appearance delay starts now
    pub fn add_element(&self, element: MockElement) {
        let since = Instant::now() + element.appears_after;
        self.state().elements.push((element, since));
    }

    /// Remove an element
    pub fn remove_element(&self, id: &str) {
        self.state().elements.retain(|(el, _)| el.id != id);
    }

    /// Change an element's text
    pub fn set_text(&self, id: &str, text: impl Into<String>) {
        let text = text.into();
        if let Some((el, _)) = self.state().elements.iter_mut().find(|(el, _)| el.id == id) {
            el.text = text;
        }
    }

    /// Full call history, queries included
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Call history restricted to state-changing calls
    #[must_use]
    pub fn action_history(&self) -> Vec<String> {
        const QUERIES: [&str; 5] = [
            "resolve:",
            "text:",
            "is_visible:",
            "is_enabled:",
            "current_url",
        ];
        self.state()
            .history
            .iter()
            .filter(|c| !QUERIES.iter().any(|q| c.starts_with(q)))
            .cloned()
            .collect()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().history.iter().any(|c| c.starts_with(method))
    }

    /// Value typed or selected into an element
    #[must_use]
    pub fn value_of(&self, id: &str) -> Option<String> {
        self.state().values.get(id).cloned()
    }

    /// Whether `close` was called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

impl WebSession for MockSession {
    fn open(&mut self, url: &str) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.history.push(format!("open:{url}"));
        state.url = url.to_string();
        Ok(())
    }

    fn resolve(&self, locator: &Locator) -> Vec<ElementHandle> {
        let mut state = self.state();
        state.history.push(format!("resolve:{locator}"));
        let now = Instant::now();
        state
            .elements
            .iter()
            .filter(|(el, since)| {
                now >= *since
                    && el
                        .matches
                        .iter()
                        .any(|(s, q)| *s == locator.strategy() && q == locator.query())
            })
            .map(|(el, _)| ElementHandle::new(el.id.clone()))
            .collect()
    }

    fn click(&mut self, element: &ElementHandle) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.history.push(format!("click:{element}"));
        let reveals = state.interactable(&element.id)?.reveals.clone();
        for (el, _) in &mut state.elements {
            if reveals.contains(&el.id) {
                el.visible = true;
            }
        }
        Ok(())
    }

    fn type_text(&mut self, element: &ElementHandle, text: &str) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.history.push(format!("type:{element}:{text}"));
        state.interactable(&element.id)?;
        state
            .values
            .entry(element.id.clone())
            .or_default()
            .push_str(text);
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.history.push(format!("clear:{element}"));
        state.interactable(&element.id)?;
        state.values.insert(element.id.clone(), String::new());
        Ok(())
    }

    fn select_by_visible_text(
        &mut self,
        element: &ElementHandle,
        text: &str,
    ) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.history.push(format!("select_text:{element}:{text}"));
        let value = state
            .interactable(&element.id)?
            .options
            .iter()
            .find(|(label, _)| label == text)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| {
                ScreenplayError::not_interactable(
                    &element.id,
                    format!("no option labelled {text:?}"),
                )
            })?;
        state.values.insert(element.id.clone(), value);
        Ok(())
    }

    fn select_by_value(&mut self, element: &ElementHandle, value: &str) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.history.push(format!("select_value:{element}:{value}"));
        let known = state
            .interactable(&element.id)?
            .options
            .iter()
            .any(|(_, v)| v == value);
        if !known {
            return Err(ScreenplayError::not_interactable(
                &element.id,
                format!("no option with value {value:?}"),
            ));
        }
        state.values.insert(element.id.clone(), value.to_string());
        Ok(())
    }

    fn text(&self, element: &ElementHandle) -> ScreenplayResult<String> {
        let mut state = self.state();
        state.history.push(format!("text:{element}"));
        Ok(state.live(&element.id)?.text.clone())
    }

    fn is_visible(&self, element: &ElementHandle) -> ScreenplayResult<bool> {
        let mut state = self.state();
        state.history.push(format!("is_visible:{element}"));
        Ok(state.live(&element.id)?.visible)
    }

    fn is_enabled(&self, element: &ElementHandle) -> ScreenplayResult<bool> {
        let mut state = self.state();
        state.history.push(format!("is_enabled:{element}"));
        Ok(state.live(&element.id)?.enabled)
    }

    fn current_url(&self) -> ScreenplayResult<String> {
        let mut state = self.state();
        state.history.push("current_url".to_string());
        Ok(state.url.clone())
    }

    fn close(&mut self) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.history.push("close".to_string());
        state.closed = true;
        Ok(())
    }
}
