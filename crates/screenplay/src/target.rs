//! Targets: named, reusable element definitions.
//!
//! A [`Target`] pairs a display name with an ordered chain of locators. The
//! chain is the declarative "try A, else B": resolution returns the
//! elements of the first locator that matches anything.
//!
//! A [`TargetTemplate`] is a parameterized target. Binding it is a pure
//! function of its parameters; the same parameters always give the same
//! target.
//!
//! ```
//! use screenplay::{LocatorTemplate, TargetTemplate};
//!
//! let patient = TargetTemplate::the("patient {0} in the list")
//!     .located_by(LocatorTemplate::xpath("//h3[contains(text(), {0})]"))
//!     .or_else_located_by(LocatorTemplate::css("[data-patient={0}]"));
//!
//! let target = patient.of(&["Juan Pérez"]).unwrap();
//! assert_eq!(target.name(), "patient Juan Pérez in the list");
//! assert_eq!(target.locators().len(), 2);
//! ```

use crate::driver::{ElementHandle, WebSession};
use crate::locator::{Locator, LocatorTemplate};
use crate::result::ScreenplayResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A named element definition with a locator fallback chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    name: String,
    locators: Vec<Locator>,
}

impl Target {
    /// Start a target with a display name
    #[must_use]
    pub fn the(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locators: Vec::new(),
        }
    }

    /// Set the primary locator
    #[must_use]
    pub fn located_by(mut self, locator: Locator) -> Self {
        self.locators.insert(0, locator);
        self
    }

    /// Append a fallback locator, tried when the earlier ones match nothing
    #[must_use]
    pub fn or_else_located_by(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locator chain, primary first
    #[must_use]
    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    /// Primary locator
    #[must_use]
    pub fn locator(&self) -> Option<&Locator> {
        self.locators.first()
    }

    /// Elements of the first locator in the chain that matches anything
    ///
    /// A locator that matches counts even when none of its elements are
    /// visible: the chain stops there and later locators are not consulted.
    /// Order the chain so that a present primary is the intended element.
    #[must_use]
    pub fn resolve(&self, session: &dyn WebSession) -> Vec<ElementHandle> {
        self.resolve_with_locator(session)
            .map(|(_, elements)| elements)
            .unwrap_or_default()
    }

    /// Like [`Target::resolve`], also reporting which locator matched
    #[must_use]
    pub fn resolve_with_locator(
        &self,
        session: &dyn WebSession,
    ) -> Option<(&Locator, Vec<ElementHandle>)> {
        for (position, locator) in self.locators.iter().enumerate() {
            let elements = session.resolve(locator);
            if !elements.is_empty() {
                if position > 0 {
                    debug!(
                        target_name = %self.name,
                        %locator,
                        position,
                        "resolved by fallback locator"
                    );
                }
                return Some((locator, elements));
            }
        }
        None
    }

    /// Rendered queries of the whole chain, for diagnostics
    #[must_use]
    pub fn describe_locators(&self) -> String {
        self.locators
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" else ")
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A parameterized target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetTemplate {
    name: String,
    templates: Vec<LocatorTemplate>,
}

impl TargetTemplate {
    /// Start a template; the name may use the same placeholders as the locators
    #[must_use]
    pub fn the(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: Vec::new(),
        }
    }

    /// Set the primary locator template
    #[must_use]
    pub fn located_by(mut self, template: LocatorTemplate) -> Self {
        self.templates.insert(0, template);
        self
    }

    /// Append a fallback locator template
    #[must_use]
    pub fn or_else_located_by(mut self, template: LocatorTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// Unbound display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locator templates, primary first
    #[must_use]
    pub fn templates(&self) -> &[LocatorTemplate] {
        &self.templates
    }

    /// Bind parameters into a target
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if a template needs more parameters than
    /// given or a parameter cannot be escaped.
    pub fn of(&self, params: &[&str]) -> ScreenplayResult<Target> {
        let name = LocatorTemplate::text(self.name.as_str())
            .bind(params)?
            .query()
            .to_string();
        let locators = self
            .templates
            .iter()
            .map(|t| t.bind(params))
            .collect::<ScreenplayResult<Vec<_>>>()?;
        Ok(Target { name, locators })
    }

    /// Primary locator for the given parameters
    ///
    /// # Errors
    ///
    /// Same as [`TargetTemplate::of`].
    pub fn locator_for(&self, params: &[&str]) -> ScreenplayResult<Option<Locator>> {
        Ok(self.of(params)?.locators.into_iter().next())
    }
}
