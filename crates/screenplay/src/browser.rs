//! Chromium-backed session over CDP.
//!
//! [`ChromiumSession`] drives a real browser through chromiumoxide. The
//! engine is blocking, so the session owns a private tokio runtime and
//! blocks on each CDP call; it must not be used from inside another async
//! runtime.
//!
//! Element handles are `data-screenplay-id` attributes stamped onto matched
//! nodes during resolution. All element operations run as page scripts,
//! with locator queries and typed text embedded as JSON string literals.

use crate::config::ScenarioConfig;
use crate::driver::{ElementHandle, WebSession};
use crate::locator::{Locator, LocatorStrategy};
use crate::result::{ScreenplayError, ScreenplayResult};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Attribute holding element handle ids
pub const HANDLE_ATTRIBUTE: &str = "data-screenplay-id";

/// Launch options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromiumOptions {
    /// Run without a window
    pub headless: bool,
    /// Keep Chromium's sandbox enabled (disable in containers)
    pub sandbox: bool,
    /// Browser binary; chromiumoxide searches the usual locations otherwise
    pub chrome_executable: Option<PathBuf>,
}

impl Default for ChromiumOptions {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            chrome_executable: None,
        }
    }
}

impl ChromiumOptions {
    /// Options matching a scenario configuration
    #[must_use]
    pub fn from_config(config: &ScenarioConfig) -> Self {
        Self {
            headless: config.headless,
            ..Self::default()
        }
    }

    /// Disable the sandbox
    #[must_use]
    pub const fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Use a specific browser binary
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct ScriptOutcome {
    status: String,
    #[serde(default)]
    value: serde_json::Value,
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn resolve_script(locator: &Locator) -> String {
    format!(
        r"(() => {{
  const strategy = {strategy};
  const query = {query};
  let nodes = [];
  if (strategy === 'xpath') {{
    const found = document.evaluate(query, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
    for (let i = 0; i < found.snapshotLength; i++) nodes.push(found.snapshotItem(i));
  }} else if (strategy === 'css') {{
    nodes = Array.from(document.querySelectorAll(query));
  }} else if (strategy === 'test-id') {{
    nodes = Array.from(document.querySelectorAll('[data-testid]'))
      .filter(n => n.getAttribute('data-testid') === query);
  }} else {{
    nodes = Array.from(document.querySelectorAll('body *')).filter(n =>
      Array.from(n.childNodes).some(c => c.nodeType === 3 && c.textContent.trim() === query));
  }}
  window.__screenplaySeq = window.__screenplaySeq || 0;
  return nodes.filter(n => n.nodeType === 1).map(n => {{
    if (!n.hasAttribute({attr})) n.setAttribute({attr}, 'sp-' + (++window.__screenplaySeq));
    return n.getAttribute({attr});
  }});
}})()",
        strategy = js_string(locator.strategy().name()),
        query = js_string(locator.query()),
        attr = js_string(HANDLE_ATTRIBUTE),
    )
}

fn element_script(element: &ElementHandle, body: &str) -> String {
    let selector = format!("[{HANDLE_ATTRIBUTE}=\"{}\"]", element.id);
    format!(
        r"(() => {{
  const el = document.querySelector({selector});
  if (!el) return {{ status: 'missing' }};
  const visible = () => {{
    const r = el.getBoundingClientRect();
    const s = getComputedStyle(el);
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none';
  }};
  {body}
}})()",
        selector = js_string(&selector),
    )
}

const ACTIONABLE: &str = r"
  if (!visible()) return { status: 'hidden' };
  if (el.disabled) return { status: 'disabled' };";

fn set_value_script(value_expr: &str) -> String {
    format!(
        r"{ACTIONABLE}
  el.focus();
  const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
  Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, {value_expr});
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  return {{ status: 'ok' }};"
    )
}

fn select_script(predicate: &str) -> String {
    format!(
        r"{ACTIONABLE}
  const option = Array.from(el.options || []).find(o => {predicate});
  if (!option) return {{ status: 'no-option' }};
  el.value = option.value;
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  return {{ status: 'ok' }};"
    )
}

/// Browser session driving Chromium
pub struct ChromiumSession {
    runtime: Runtime,
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    closed: bool,
}

impl fmt::Debug for ChromiumSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromiumSession")
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl ChromiumSession {
    /// Launch a browser with a blank page
    ///
    /// # Errors
    ///
    /// Returns error if the runtime or browser cannot be started.
    pub fn launch(options: &ChromiumOptions) -> ScreenplayResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let mut builder = BrowserConfig::builder();
        if !options.headless {
            builder = builder.with_head();
        }
        if !options.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &options.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ScreenplayError::session)?;

        let (browser, page, handler) = runtime.block_on(async {
            let (browser, mut events) = Browser::launch(config)
                .await
                .map_err(|e| ScreenplayError::session(format!("launch failed: {e}")))?;
            let handler = tokio::spawn(async move {
                while let Some(event) = events.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ScreenplayError::session(format!("new page failed: {e}")))?;
            Ok::<_, ScreenplayError>((browser, page, handler))
        })?;
        debug!(headless = options.headless, "chromium launched");

        Ok(Self {
            runtime,
            browser,
            page,
            handler,
            closed: false,
        })
    }

    fn evaluate<T: DeserializeOwned>(&self, script: String) -> ScreenplayResult<T> {
        self.runtime.block_on(async {
            let result = self
                .page
                .evaluate(script)
                .await
                .map_err(|e| ScreenplayError::session(format!("script failed: {e}")))?;
            result
                .into_value::<T>()
                .map_err(|e| ScreenplayError::session(format!("unexpected script result: {e}")))
        })
    }

    fn run_on(&self, element: &ElementHandle, body: &str) -> ScreenplayResult<serde_json::Value> {
        let outcome: ScriptOutcome = self.evaluate(element_script(element, body))?;
        match outcome.status.as_str() {
            "ok" => Ok(outcome.value),
            "missing" => Err(ScreenplayError::not_found(&element.id, "detached element")),
            "hidden" => Err(ScreenplayError::not_interactable(
                &element.id,
                "element is not visible",
            )),
            "disabled" => Err(ScreenplayError::not_interactable(
                &element.id,
                "element is disabled",
            )),
            "no-option" => Err(ScreenplayError::not_interactable(&element.id, "no such option")),
            other => Err(ScreenplayError::session(format!("unknown script status {other:?}"))),
        }
    }

    fn run_bool(&self, element: &ElementHandle, body: &str) -> ScreenplayResult<bool> {
        Ok(self.run_on(element, body)?.as_bool().unwrap_or(false))
    }
}

impl WebSession for ChromiumSession {
    fn open(&mut self, url: &str) -> ScreenplayResult<()> {
        self.runtime.block_on(async {
            self.page
                .goto(url)
                .await
                .map(|_| ())
                .map_err(|e| ScreenplayError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
        })
    }

    fn resolve(&self, locator: &Locator) -> Vec<ElementHandle> {
        match self.evaluate::<Vec<String>>(resolve_script(locator)) {
            Ok(ids) => ids.into_iter().map(ElementHandle::new).collect(),
            Err(e) => {
                warn!(%locator, error = %e, "resolution failed, treating as no match");
                Vec::new()
            }
        }
    }

    fn click(&mut self, element: &ElementHandle) -> ScreenplayResult<()> {
        let body = format!(
            r"{ACTIONABLE}
  el.scrollIntoView({{ block: 'center' }});
  el.click();
  return {{ status: 'ok' }};"
        );
        self.run_on(element, &body).map(|_| ())
    }

    fn type_text(&mut self, element: &ElementHandle, text: &str) -> ScreenplayResult<()> {
        let body = set_value_script(&format!("el.value + {}", js_string(text)));
        self.run_on(element, &body).map(|_| ())
    }

    fn clear(&mut self, element: &ElementHandle) -> ScreenplayResult<()> {
        self.run_on(element, &set_value_script("''")).map(|_| ())
    }

    fn select_by_visible_text(
        &mut self,
        element: &ElementHandle,
        text: &str,
    ) -> ScreenplayResult<()> {
        let body = select_script(&format!("o.text.trim() === {}", js_string(text)));
        self.run_on(element, &body).map(|_| ())
    }

    fn select_by_value(&mut self, element: &ElementHandle, value: &str) -> ScreenplayResult<()> {
        let body = select_script(&format!("o.value === {}", js_string(value)));
        self.run_on(element, &body).map(|_| ())
    }

    fn text(&self, element: &ElementHandle) -> ScreenplayResult<String> {
        let value = self.run_on(
            element,
            "return { status: 'ok', value: (el.innerText || el.textContent || '').trim() };",
        )?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn is_visible(&self, element: &ElementHandle) -> ScreenplayResult<bool> {
        self.run_bool(element, "return { status: 'ok', value: visible() };")
    }

    fn is_enabled(&self, element: &ElementHandle) -> ScreenplayResult<bool> {
        self.run_bool(element, "return { status: 'ok', value: !el.disabled };")
    }

    fn current_url(&self) -> ScreenplayResult<String> {
        self.runtime.block_on(async {
            self.page
                .url()
                .await
                .map(Option::unwrap_or_default)
                .map_err(|e| ScreenplayError::session(e.to_string()))
        })
    }

    fn close(&mut self) -> ScreenplayResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let result = self.runtime.block_on(async {
            self.browser
                .close()
                .await
                .map_err(|e| ScreenplayError::session(format!("close failed: {e}")))?;
            let _ = self.browser.wait().await;
            Ok(())
        });
        self.handler.abort();
        result
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "closing chromium on drop failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_script_embeds_query_as_literal() {
        let locator = Locator::xpath("//h3[contains(text(), \"O'Brien\")]");
        let script = resolve_script(&locator);
        assert!(script.contains(r#"const query = "//h3[contains(text(), \"O'Brien\")]";"#));
        assert!(script.contains("const strategy = \"xpath\";"));
    }

    #[test]
    fn test_strategy_names_match_script_branches() {
        let script = resolve_script(&Locator::test_id("submit"));
        for strategy in [LocatorStrategy::XPath, LocatorStrategy::Css, LocatorStrategy::TestId] {
            assert!(script.contains(&format!("strategy === '{}'", strategy.name())));
        }
    }

    #[test]
    fn test_typed_text_is_escaped() {
        let body = set_value_script(&format!("el.value + {}", js_string("a'\"\n")));
        assert!(body.contains(r#"el.value + "a'\"\n""#));
    }

    #[test]
    fn test_options_from_config() {
        let config = ScenarioConfig::new().with_headless(false);
        let options = ChromiumOptions::from_config(&config).no_sandbox();
        assert!(!options.headless);
        assert!(!options.sandbox);
    }

    #[test]
    #[ignore = "requires a Chromium installation"]
    fn test_launch_and_resolve() {
        let mut session = ChromiumSession::launch(&ChromiumOptions::default().no_sandbox())
            .unwrap_or_else(|e| panic!("launch: {e}"));
        session
            .open("data:text/html,<button id=go>Go</button>")
            .unwrap_or_else(|e| panic!("open: {e}"));
        let found = session.resolve(&Locator::css("#go"));
        assert_eq!(found.len(), 1);
        assert_eq!(session.text(&found[0]).unwrap_or_default(), "Go");
        assert!(session.resolve(&Locator::css("#missing")).is_empty());
    }
}
