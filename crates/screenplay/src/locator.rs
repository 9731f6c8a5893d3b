//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a fully bound query: a strategy, the template it came
//! from and the parameters substituted into it. Templates use positional
//! placeholders (`{0}`, `{1}`, ...) and `{{` / `}}` for literal braces.
//!
//! # Parameter escaping
//!
//! Parameters are never interpolated raw. Each strategy turns a parameter
//! into a complete literal of its query language:
//!
//! - **XPath**: a string literal, using `concat()` when the value contains
//!   both quote characters
//! - **CSS**: a double-quoted string with backslash escapes
//! - **Text / TestId**: the value itself (these strategies are not query
//!   languages, the session matches them verbatim)
//!
//! So a template is written `//h3[contains(text(), {0})]`, never
//! `//h3[contains(text(), '{0}')]`.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::result::{ScreenplayError, ScreenplayResult};

/// Query language used to locate elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocatorStrategy {
    /// XPath 1.0 expression
    XPath,
    /// CSS selector
    Css,
    /// Visible text content
    Text,
    /// Test ID selector (data-testid attribute)
    TestId,
}

impl LocatorStrategy {
    /// Short name used in diagnostics
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::XPath => "xpath",
            Self::Css => "css",
            Self::Text => "text",
            Self::TestId => "test-id",
        }
    }

    /// Operator joining alternative queries into one union query
    #[must_use]
    pub const fn union_separator(self) -> Option<&'static str> {
        match self {
            Self::XPath => Some(" | "),
            Self::Css => Some(", "),
            Self::Text | Self::TestId => None,
        }
    }

    /// Turn a raw parameter into a literal of this query language
    ///
    /// # Errors
    ///
    /// Returns error if the parameter contains a NUL character, which no
    /// strategy can express.
    pub fn escape(self, raw: &str) -> ScreenplayResult<String> {
        if raw.contains('\0') {
            return Err(ScreenplayError::invalid_locator(format!(
                "{} parameter contains a NUL character",
                self.name()
            )));
        }
        Ok(match self {
            Self::XPath => xpath_literal(raw),
            Self::Css => css_string(raw),
            Self::Text | Self::TestId => raw.to_string(),
        })
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn xpath_literal(raw: &str) -> String {
    if !raw.contains('\'') {
        format!("'{raw}'")
    } else if !raw.contains('"') {
        format!("\"{raw}\"")
    } else {
        let parts: Vec<String> = raw.split('\'').map(|p| format!("'{p}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

fn css_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => out.push_str(&format!("\\{:x} ", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{(\d+)\}").unwrap_or_else(|e| panic!("placeholder regex: {e}"))
    })
}

/// An unbound query with positional placeholders
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatorTemplate {
    strategy: LocatorStrategy,
    template: String,
}

impl LocatorTemplate {
    /// Create a template for a strategy
    #[must_use]
    pub fn new(strategy: LocatorStrategy, template: impl Into<String>) -> Self {
        Self {
            strategy,
            template: template.into(),
        }
    }

    /// XPath template
    #[must_use]
    pub fn xpath(template: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::XPath, template)
    }

    /// CSS template
    #[must_use]
    pub fn css(template: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Css, template)
    }

    /// Text template
    #[must_use]
    pub fn text(template: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Text, template)
    }

    /// Test ID template
    #[must_use]
    pub fn test_id(template: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::TestId, template)
    }

    /// Join alternative templates into one union query.
    ///
    /// Only XPath (`|`) and CSS (`,`) have a union operator; for the other
    /// strategies use a target with several locators instead.
    ///
    /// # Errors
    ///
    /// Returns error for strategies without a union operator or when no
    /// alternatives are given.
    pub fn any_of<I, S>(strategy: LocatorStrategy, alternatives: I) -> ScreenplayResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let separator = strategy.union_separator().ok_or_else(|| {
            ScreenplayError::invalid_locator(format!("{strategy} queries cannot be joined"))
        })?;
        let parts: Vec<String> = alternatives.into_iter().map(Into::into).collect();
        if parts.is_empty() {
            return Err(ScreenplayError::invalid_locator(
                "a union needs at least one alternative",
            ));
        }
        Ok(Self::new(strategy, parts.join(separator)))
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> LocatorStrategy {
        self.strategy
    }

    /// Get the raw template
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Number of parameters the template needs (highest placeholder + 1)
    #[must_use]
    pub fn arity(&self) -> usize {
        placeholder_pattern()
            .captures_iter(&self.template)
            .filter_map(|c| c.get(1))
            .filter_map(|m| m.as_str().parse::<usize>().ok())
            .map(|i| i + 1)
            .max()
            .unwrap_or(0)
    }

    /// Substitute escaped parameters into the template
    ///
    /// # Errors
    ///
    /// Returns error if a placeholder index does not fit in `usize`, if
    /// fewer parameters are given than the template uses, or if a parameter
    /// cannot be escaped.
    pub fn bind(&self, params: &[&str]) -> ScreenplayResult<Locator> {
        if let Some(index) = placeholder_pattern()
            .captures_iter(&self.template)
            .filter_map(|c| c.get(1))
            .find(|m| m.as_str().parse::<usize>().is_err())
        {
            return Err(ScreenplayError::invalid_locator(format!(
                "placeholder {{{}}} in template {:?} is out of range",
                index.as_str(),
                self.template
            )));
        }
        let arity = self.arity();
        if params.len() < arity {
            return Err(ScreenplayError::invalid_locator(format!(
                "template {:?} needs {arity} parameter(s), got {}",
                self.template,
                params.len()
            )));
        }
        let escaped = params
            .iter()
            .map(|p| self.strategy.escape(p))
            .collect::<ScreenplayResult<Vec<_>>>()?;

        let query = placeholder_pattern()
            .replace_all(&self.template, |caps: &Captures<'_>| {
                match caps.get(1) {
                    Some(index) => index
                        .as_str()
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| escaped.get(i).cloned())
                        .unwrap_or_default(),
                    None if &caps[0] == "{{" => "{".to_string(),
                    None => "}".to_string(),
                }
            })
            .into_owned();

        Ok(Locator {
            strategy: self.strategy,
            template: self.template.clone(),
            parameters: params.iter().map(|p| (*p).to_string()).collect(),
            query,
        })
    }
}

/// A bound query identifying zero or more elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: LocatorStrategy,
    template: String,
    parameters: Vec<String>,
    query: String,
}

impl Locator {
    /// Static locator; the query is taken verbatim
    #[must_use]
    pub fn new(strategy: LocatorStrategy, query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            strategy,
            template: query.clone(),
            parameters: Vec::new(),
            query,
        }
    }

    /// Static XPath locator
    #[must_use]
    pub fn xpath(query: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::XPath, query)
    }

    /// Static CSS locator
    #[must_use]
    pub fn css(query: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Css, query)
    }

    /// Text locator
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Text, text)
    }

    /// Test ID locator
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::TestId, id)
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> LocatorStrategy {
        self.strategy
    }

    /// Template this locator was bound from
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Raw (unescaped) parameters
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Rendered query handed to the session
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy, self.query)
    }
}
