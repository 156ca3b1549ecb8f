//! Selector resolver: first locator that matches wins.

use crate::renderer::PageRenderer;
use crate::selectors::LocatorSet;
use crate::step::Step;

/// Every match of the first locator in `set` that matches anything.
///
/// Matches are never merged across locators. A lookup error on one locator
/// counts as a miss; `Failed` is returned only when nothing matched and at
/// least one lookup errored.
pub async fn resolve_all<R>(
    renderer: &R,
    scope: Option<&R::Element>,
    set: &LocatorSet,
) -> Step<Vec<R::Element>>
where
    R: PageRenderer + ?Sized,
{
    let mut first_error = None;
    for locator in set.locators {
        match renderer.find_all(scope, locator).await {
            Ok(found) if !found.is_empty() => return Step::Found(found),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(locator_set = set.name, %locator, error = %e, "locator lookup failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    match first_error {
        Some(e) => Step::Failed(e),
        None => Step::Absent,
    }
}

/// First element matched by the first matching locator in `set`.
pub async fn resolve<R>(
    renderer: &R,
    scope: Option<&R::Element>,
    set: &LocatorSet,
) -> Step<R::Element>
where
    R: PageRenderer + ?Sized,
{
    match resolve_all(renderer, scope, set).await {
        Step::Found(found) => found.into_iter().next().map_or(Step::Absent, Step::Found),
        Step::Absent => Step::Absent,
        Step::Failed(e) => Step::Failed(e),
    }
}

/// Trimmed text of the first element, trying locators in order until one
/// yields non-empty text.
///
/// Lookup errors and text read errors both fall through like misses.
/// `Failed` is returned only when no locator yielded text and at least one
/// lookup or read errored.
pub async fn first_text<R>(
    renderer: &R,
    scope: Option<&R::Element>,
    set: &LocatorSet,
) -> Step<String>
where
    R: PageRenderer + ?Sized,
{
    let mut first_error = None;
    for locator in set.locators {
        let read = match renderer.find_all(scope, locator).await {
            Ok(found) => match found.first() {
                Some(element) => renderer.text(element).await,
                None => continue,
            },
            Err(e) => Err(e),
        };
        match read {
            Ok(text) if !text.trim().is_empty() => return Step::Found(text.trim().to_string()),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(locator_set = set.name, %locator, error = %e, "locator read failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    match first_error {
        Some(e) => Step::Failed(e),
        None => Step::Absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Locator;
    use crate::testing::FakeDom;

    const SET: LocatorSet = LocatorSet::new(
        "test",
        &[Locator::Css("div.primary"), Locator::Css("div.secondary")],
    );

    #[tokio::test]
    async fn first_matching_locator_wins() {
        let mut dom = FakeDom::new();
        let secondary = dom.node(None, &["div.secondary"], "second");
        let primary = dom.node(None, &["div.primary"], "first");
        let found = resolve(&dom, None, &SET).await.found();
        assert_eq!(found, Some(primary));
        assert_ne!(found, Some(secondary));
    }

    #[tokio::test]
    async fn resolve_all_does_not_merge_locators() {
        let mut dom = FakeDom::new();
        let p1 = dom.node(None, &["div.primary"], "");
        let _s1 = dom.node(None, &["div.secondary"], "");
        let p2 = dom.node(None, &["div.primary"], "");
        let found = resolve_all(&dom, None, &SET).await.found();
        assert_eq!(found, Some(vec![p1, p2]));
    }

    #[tokio::test]
    async fn resolve_is_absent_when_nothing_matches() {
        let dom = FakeDom::new();
        assert!(matches!(resolve(&dom, None, &SET).await, Step::Absent));
    }

    #[tokio::test]
    async fn lookup_error_falls_through_to_next_locator() {
        let mut dom = FakeDom::new();
        dom.fail_lookup("div.primary");
        let s = dom.node(None, &["div.secondary"], "");
        assert_eq!(resolve(&dom, None, &SET).await.found(), Some(s));
    }

    #[tokio::test]
    async fn resolve_fails_only_when_nothing_matched() {
        let mut dom = FakeDom::new();
        dom.fail_lookup("div.primary");
        assert!(matches!(resolve(&dom, None, &SET).await, Step::Failed(_)));
    }

    #[tokio::test]
    async fn lookup_is_scoped() {
        let mut dom = FakeDom::new();
        let outer = dom.node(None, &["section"], "");
        let _elsewhere = dom.node(None, &["div.primary"], "");
        let inner = dom.node(Some(outer), &["div.primary"], "");
        let found = resolve_all(&dom, Some(&outer), &SET).await.found();
        assert_eq!(found, Some(vec![inner]));
    }

    #[tokio::test]
    async fn first_text_skips_empty_values() {
        let mut dom = FakeDom::new();
        dom.node(None, &["div.primary"], "   ");
        dom.node(None, &["div.secondary"], "  hello ");
        let text = first_text(&dom, None, &SET).await.found();
        assert_eq!(text.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn first_text_absent_when_all_empty() {
        let mut dom = FakeDom::new();
        dom.node(None, &["div.primary"], "");
        assert!(matches!(first_text(&dom, None, &SET).await, Step::Absent));
    }

    #[tokio::test]
    async fn first_text_read_error_falls_through() {
        let mut dom = FakeDom::new();
        let stale = dom.node(None, &["div.primary"], "gone");
        dom.node(None, &["div.secondary"], "fresh");
        dom.fail_text(stale);
        let text = first_text(&dom, None, &SET).await.found();
        assert_eq!(text.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn first_text_fails_when_only_reads_errored() {
        let mut dom = FakeDom::new();
        let stale = dom.node(None, &["div.primary"], "gone");
        dom.fail_text(stale);
        assert!(matches!(first_text(&dom, None, &SET).await, Step::Failed(_)));
    }
}
