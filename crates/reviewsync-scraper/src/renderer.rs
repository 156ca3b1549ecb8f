//! The page-renderer seam.
//!
//! Everything above this trait (scrolling, extraction, enrichment) is
//! written against [`PageRenderer`] so it can run against a real browser or
//! an in-memory fake.

use async_trait::async_trait;

use crate::error::RenderError;

/// One element-locating expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    /// A CSS selector, matched against descendants of the scope.
    Css(&'static str),
    /// An XPath expression evaluated with the scope element as context node.
    XPath(&'static str),
}

impl Locator {
    #[must_use]
    pub fn expr(&self) -> &'static str {
        match self {
            Locator::Css(expr) | Locator::XPath(expr) => expr,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(expr) => write!(f, "css:{expr}"),
            Locator::XPath(expr) => write!(f, "xpath:{expr}"),
        }
    }
}

/// A live page that can be navigated, queried and scripted.
///
/// `scope: None` means "the whole document" for lookups, scrolling and
/// extent reads.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    type Element: Send + Sync;

    async fn navigate(&self, url: &str) -> Result<(), RenderError>;

    /// All matches of `locator` under `scope`, in document order. No match
    /// is `Ok(vec![])`, not an error.
    async fn find_all(
        &self,
        scope: Option<&Self::Element>,
        locator: &Locator,
    ) -> Result<Vec<Self::Element>, RenderError>;

    /// Rendered text of `element`, untrimmed.
    async fn text(&self, element: &Self::Element) -> Result<String, RenderError>;

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, RenderError>;

    /// Scrolls `scope` (or the window) down by one visible height.
    async fn scroll_by_viewport(&self, scope: Option<&Self::Element>) -> Result<(), RenderError>;

    /// Scrollable height of `scope` (or of the document body).
    async fn scroll_extent(&self, scope: Option<&Self::Element>) -> Result<i64, RenderError>;

    async fn scroll_into_view(&self, element: &Self::Element) -> Result<(), RenderError>;

    /// Programmatic click, dispatched from page script.
    async fn click(&self, element: &Self::Element) -> Result<(), RenderError>;

    /// Releases the session. Must be safe to call more than once.
    async fn shutdown(&self) -> Result<(), RenderError>;
}
