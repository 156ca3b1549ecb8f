//! Headless Chromium renderer over the DevTools protocol.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use reviewsync_core::AppConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{RenderError, ScraperError};
use crate::renderer::{Locator, PageRenderer};

const WINDOW_WIDTH: u32 = 1200;
const WINDOW_HEIGHT: u32 = 1000;

/// Attribute used to hand scoped XPath matches back to a CSS lookup.
const PROBE_ATTR: &str = "data-reviewsync-probe";

/// Launch options for [`ChromiumRenderer`].
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
}

impl BrowserSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            headless: config.headless,
            chrome_path: config.chrome_path.clone(),
        }
    }
}

/// One browser process with one page. Dropped or shut down after a single
/// harvest.
pub struct ChromiumRenderer {
    browser: Mutex<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    page: Page,
    probe_seq: AtomicU64,
}

impl ChromiumRenderer {
    /// Starts a browser and opens a blank page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Launch`] if the config is rejected, the
    /// process cannot be started, or the first page cannot be opened.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .no_sandbox()
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage");
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &settings.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ScraperError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(ScraperError::Launch(format!("failed to open page: {e}")));
            }
        };

        tracing::info!(headless = settings.headless, "browser launched");
        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handler_task)),
            page,
            probe_seq: AtomicU64::new(0),
        })
    }

    /// Calls `function` with `element` bound to `this` and returns its
    /// result value, if any.
    async fn call_on(
        &self,
        element: &Element,
        function: &str,
    ) -> Result<Option<serde_json::Value>, RenderError> {
        let returns = element.call_js_fn(function, false).await?;
        if let Some(details) = returns.exception_details {
            return Err(RenderError::Script(details.text));
        }
        Ok(returns.result.value)
    }

    /// XPath lookup relative to `scope`. Matches are tagged with a one-off
    /// probe value in page script, then collected with a CSS attribute
    /// selector so real element handles come back.
    async fn find_xpath(
        &self,
        scope: Option<&Element>,
        xpath: &str,
    ) -> Result<Vec<Element>, RenderError> {
        let root;
        let scope = match scope {
            Some(scope) => scope,
            None => {
                root = self.page.find_element("html").await?;
                &root
            }
        };

        let probe = format!("p{}", self.probe_seq.fetch_add(1, Ordering::Relaxed));
        let function = format!(
            "function() {{ \
               const found = document.evaluate({xpath}, this, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
               for (let i = 0; i < found.snapshotLength; i++) {{ \
                 const node = found.snapshotItem(i); \
                 if (node.nodeType === 1) node.setAttribute('{PROBE_ATTR}', {probe}); \
               }} \
               return found.snapshotLength; \
             }}",
            xpath = serde_json::to_string(xpath)?,
            probe = serde_json::to_string(&probe)?,
        );
        self.call_on(scope, &function).await?;
        Ok(scope
            .find_elements(format!("[{PROBE_ATTR}=\"{probe}\"]"))
            .await?)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn as_extent(value: Option<serde_json::Value>) -> Result<i64, RenderError> {
    let value = value.ok_or_else(|| RenderError::UnexpectedValue("no extent".to_string()))?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|v| v.round() as i64))
        .ok_or_else(|| RenderError::UnexpectedValue(value.to_string()))
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<(), RenderError> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn find_all(
        &self,
        scope: Option<&Element>,
        locator: &Locator,
    ) -> Result<Vec<Element>, RenderError> {
        match (locator, scope) {
            (Locator::Css(css), Some(scope)) => Ok(scope.find_elements(*css).await?),
            (Locator::Css(css), None) => Ok(self.page.find_elements(*css).await?),
            (Locator::XPath(xpath), scope) => self.find_xpath(scope, xpath).await,
        }
    }

    async fn text(&self, element: &Element) -> Result<String, RenderError> {
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>, RenderError> {
        Ok(element.attribute(name).await?)
    }

    async fn scroll_by_viewport(&self, scope: Option<&Element>) -> Result<(), RenderError> {
        match scope {
            Some(scope) => {
                self.call_on(scope, "function() { this.scrollBy(0, this.clientHeight); }")
                    .await?;
            }
            None => {
                self.page
                    .evaluate("window.scrollBy(0, window.innerHeight)")
                    .await?;
            }
        }
        Ok(())
    }

    async fn scroll_extent(&self, scope: Option<&Element>) -> Result<i64, RenderError> {
        let value = match scope {
            Some(scope) => {
                self.call_on(scope, "function() { return this.scrollHeight; }")
                    .await?
            }
            None => self
                .page
                .evaluate("document.body.scrollHeight")
                .await?
                .value()
                .cloned(),
        };
        as_extent(value)
    }

    async fn scroll_into_view(&self, element: &Element) -> Result<(), RenderError> {
        self.call_on(
            element,
            "function() { this.scrollIntoView({ block: 'end' }); }",
        )
        .await?;
        Ok(())
    }

    async fn click(&self, element: &Element) -> Result<(), RenderError> {
        self.call_on(element, "function() { this.click(); }").await?;
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };
        let closed = browser.close().await;
        let waited = browser.wait().await;
        if let Some(handler) = self.handler.lock().await.take() {
            handler.abort();
        }
        closed?;
        waited?;
        tracing::info!("browser closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_accepts_integer_and_float() {
        assert_eq!(as_extent(Some(serde_json::json!(2400))).unwrap(), 2400);
        assert_eq!(as_extent(Some(serde_json::json!(2400.6))).unwrap(), 2401);
    }

    #[test]
    fn extent_rejects_missing_or_non_numeric() {
        assert!(matches!(as_extent(None), Err(RenderError::UnexpectedValue(_))));
        assert!(matches!(
            as_extent(Some(serde_json::json!("tall"))),
            Err(RenderError::UnexpectedValue(_))
        ));
    }
}
