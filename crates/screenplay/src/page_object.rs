//! Page objects.
//!
//! A page object names a page of the application: the path it lives at and
//! a landmark element whose visibility means the page has rendered. Page
//! objects hold targets as data; they do not act.

use crate::actor::Actor;
use crate::question::Question;
use crate::result::ScreenplayResult;
use crate::target::Target;
use crate::wait::ElementState;
use std::collections::HashMap;

/// A page of the application under test
pub trait PageObject: Send + Sync {
    /// Path pattern relative to the base URL (e.g. `/nurse`, `/patients/:id`)
    fn path(&self) -> &str;

    /// Element that is visible once the page has rendered
    fn landmark(&self) -> &Target;

    /// Page name for logging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Matcher for the page's path pattern
    fn url_matcher(&self) -> UrlMatcher {
        UrlMatcher::new(self.path())
    }
}

// =============================================================================
// URL MATCHING
// =============================================================================

/// Matches URL paths against a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

/// Path component of a URL, without query or fragment
fn path_of(url: &str) -> &str {
    let without_origin = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => url,
    };
    let end = without_origin
        .find(|c| c == '?' || c == '#')
        .unwrap_or(without_origin.len());
    &without_origin[..end]
}

fn segments_of(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/login`
    /// - Wildcards: `/patients/*`
    /// - Named parameters: `/patients/:id`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = segments_of(pattern)
            .into_iter()
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a URL (absolute or path-only) matches the pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let actual = segments_of(path_of(url));
        actual.len() == self.segments.len()
            && self.segments.iter().zip(&actual).all(|(segment, value)| match segment {
                UrlSegment::Literal(lit) => lit == value,
                UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
            })
    }

    /// Extract named parameters from a matching URL
    #[must_use]
    pub fn extract_params(&self, url: &str) -> HashMap<String, String> {
        if !self.matches(url) {
            return HashMap::new();
        }
        self.segments
            .iter()
            .zip(segments_of(path_of(url)))
            .filter_map(|(segment, value)| match segment {
                UrlSegment::Parameter(name) => Some((name.clone(), value.to_string())),
                UrlSegment::Literal(_) | UrlSegment::Wildcard => None,
            })
            .collect()
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

// =============================================================================
// CURRENT PAGE QUESTION
// =============================================================================

/// Whether the actor is on a page: URL matches and landmark visible
#[derive(Debug, Clone)]
pub struct TheCurrentPage {
    name: String,
    matcher: UrlMatcher,
    landmark: Target,
}

impl TheCurrentPage {
    /// Whether the current page is `page`
    #[must_use]
    pub fn is<P: PageObject + ?Sized>(page: &P) -> Self {
        Self {
            name: page.page_name().to_string(),
            matcher: page.url_matcher(),
            landmark: page.landmark().clone(),
        }
    }
}

impl Question for TheCurrentPage {
    type Answer = bool;

    fn describe(&self) -> String {
        format!("whether the current page is the {}", self.name)
    }

    fn evaluate(&self, actor: &Actor) -> ScreenplayResult<bool> {
        let session = actor.session()?;
        Ok(self.matcher.matches(&session.current_url()?)
            && ElementState::Visible.holds(session, &self.landmark))
    }

    fn fallback(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ability::BrowseTheWeb;
    use crate::driver::{MockElement, MockSession, WebSession};
    use crate::locator::Locator;

    mod url_matcher_tests {
        use super::*;

        #[test]
        fn test_literal_match() {
            let matcher = UrlMatcher::new("/login");
            assert!(matcher.matches("/login"));
            assert!(matcher.matches("http://localhost:3003/login"));
            assert!(matcher.matches("http://localhost:3003/login?next=/nurse#top"));
            assert!(!matcher.matches("http://localhost:3003/nurse"));
            assert!(!matcher.matches("/login/extra"));
        }

        #[test]
        fn test_root_pattern() {
            let matcher = UrlMatcher::new("/");
            assert!(matcher.matches("http://localhost:3003"));
            assert!(matcher.matches("http://localhost:3003/"));
            assert!(!matcher.matches("http://localhost:3003/login"));
        }

        #[test]
        fn test_wildcard_and_parameters() {
            let matcher = UrlMatcher::new("/patients/:id/*");
            assert!(matcher.matches("https://triage.test/patients/42/history"));
            assert!(!matcher.matches("https://triage.test/patients/42"));
            let params = matcher.extract_params("https://triage.test/patients/42/history");
            assert_eq!(params.get("id").map(String::as_str), Some("42"));
            assert!(matcher.extract_params("/other").is_empty());
            assert_eq!(matcher.pattern(), "/patients/:id/*");
        }
    }

    mod page_tests {
        use super::*;

        #[derive(Debug)]
        struct NursePage {
            landmark: Target,
        }

        impl PageObject for NursePage {
            fn path(&self) -> &str {
                "/nurse"
            }

            fn landmark(&self) -> &Target {
                &self.landmark
            }

            fn page_name(&self) -> &str {
                "nurse dashboard"
            }
        }

        fn page() -> NursePage {
            NursePage {
                landmark: Target::the("the nurse heading").located_by(Locator::css("h1.nurse")),
            }
        }

        #[test]
        fn test_current_page_needs_url_and_landmark() {
            let mut session = MockSession::new();
            let actor = Actor::named("Nurse").who_can(BrowseTheWeb::with(session.clone()));
            let question = TheCurrentPage::is(&page());

            session.open("http://localhost:3003/nurse").unwrap();
            assert!(!actor.asks_for(&question));

            session.add_element(MockElement::matching("h", &Locator::css("h1.nurse")));
            assert!(actor.asks_for(&question));

            session.open("http://localhost:3003/login").unwrap();
            assert!(!actor.asks_for(&question));
        }

        #[test]
        fn test_description() {
            assert_eq!(
                TheCurrentPage::is(&page()).describe(),
                "whether the current page is the nurse dashboard"
            );
        }
    }
}
