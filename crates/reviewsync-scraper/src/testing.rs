//! In-memory renderers for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reviewsync_store::{RecordStore, StoreError, StoredRecord};
use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::renderer::{Locator, PageRenderer};
use crate::selectors;

/// A static document. Each node declares which locator expressions it
/// matches, so no selector engine is needed.
#[derive(Default)]
pub struct FakeDom {
    nodes: Vec<FakeNode>,
    failing_lookups: HashSet<&'static str>,
    failing_text: HashSet<usize>,
    failing_attributes: HashSet<usize>,
    failing_clicks: HashSet<usize>,
    fail_navigation: bool,
    fail_shutdown: bool,
    navigations: Mutex<Vec<String>>,
    clicks: Mutex<Vec<usize>>,
    shutdowns: AtomicUsize,
}

struct FakeNode {
    parent: Option<usize>,
    matches: Vec<&'static str>,
    text: String,
    attributes: HashMap<String, String>,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, parent: Option<usize>, matches: &[&'static str], text: &str) -> usize {
        self.nodes.push(FakeNode {
            parent,
            matches: matches.to_vec(),
            text: text.to_string(),
            attributes: HashMap::new(),
        });
        self.nodes.len() - 1
    }

    pub fn set_attribute(&mut self, node: usize, name: &str, value: &str) {
        self.nodes[node]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn fail_lookup(&mut self, expr: &'static str) {
        self.failing_lookups.insert(expr);
    }

    pub fn fail_text(&mut self, node: usize) {
        self.failing_text.insert(node);
    }

    pub fn fail_attribute(&mut self, node: usize) {
        self.failing_attributes.insert(node);
    }

    pub fn fail_click(&mut self, node: usize) {
        self.failing_clicks.insert(node);
    }

    pub fn fail_navigation(&mut self) {
        self.fail_navigation = true;
    }

    pub fn fail_shutdown(&mut self) {
        self.fail_shutdown = true;
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn clicks(&self) -> Vec<usize> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    /// Adds the standard review container and returns its id.
    pub fn container(&mut self) -> usize {
        self.node(None, &[selectors::CONTAINER.locators[0].expr()], "")
    }

    pub fn profile_label(&mut self, text: &str) -> usize {
        self.node(None, &["h1"], text)
    }

    /// Adds a review card with the primary subject, score and body
    /// markup. Empty `body` or `score` leaves that element out.
    pub fn review_card(&mut self, container: usize, subject: &str, body: &str, score: &str) -> usize {
        let card = self.node(Some(container), &["div.jftiEf"], "");
        self.node(Some(card), &["div.d4r55"], subject);
        if !body.is_empty() {
            self.node(Some(card), &["span.wiI7pd"], body);
        }
        if !score.is_empty() {
            let stars = self.node(Some(card), &["span.kvMYJc"], "");
            self.set_attribute(stars, "aria-label", &format!("{score} stars"));
        }
        card
    }

    fn is_within(&self, node: usize, scope: usize) -> bool {
        let mut current = self.nodes[node].parent;
        while let Some(parent) = current {
            if parent == scope {
                return true;
            }
            current = self.nodes[parent].parent;
        }
        false
    }
}

#[async_trait]
impl PageRenderer for FakeDom {
    type Element = usize;

    async fn navigate(&self, url: &str) -> Result<(), RenderError> {
        self.navigations.lock().unwrap().push(url.to_string());
        if self.fail_navigation {
            return Err(RenderError::Script("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }
        Ok(())
    }

    async fn find_all(
        &self,
        scope: Option<&usize>,
        locator: &Locator,
    ) -> Result<Vec<usize>, RenderError> {
        let expr = locator.expr();
        if self.failing_lookups.contains(expr) {
            return Err(RenderError::Script(format!("lookup failed: {expr}")));
        }
        Ok((0..self.nodes.len())
            .filter(|&id| self.nodes[id].matches.contains(&expr))
            .filter(|&id| scope.map_or(true, |&s| self.is_within(id, s)))
            .collect())
    }

    async fn text(&self, element: &usize) -> Result<String, RenderError> {
        if self.failing_text.contains(element) {
            return Err(RenderError::Script("stale element".to_string()));
        }
        Ok(self.nodes[*element].text.clone())
    }

    async fn attribute(&self, element: &usize, name: &str) -> Result<Option<String>, RenderError> {
        if self.failing_attributes.contains(element) {
            return Err(RenderError::Script("stale element".to_string()));
        }
        Ok(self.nodes[*element].attributes.get(name).cloned())
    }

    async fn scroll_by_viewport(&self, _scope: Option<&usize>) -> Result<(), RenderError> {
        Ok(())
    }

    async fn scroll_extent(&self, _scope: Option<&usize>) -> Result<i64, RenderError> {
        Ok(1000)
    }

    async fn scroll_into_view(&self, _element: &usize) -> Result<(), RenderError> {
        Ok(())
    }

    async fn click(&self, element: &usize) -> Result<(), RenderError> {
        if self.failing_clicks.contains(element) {
            return Err(RenderError::Script("element detached".to_string()));
        }
        self.clicks.lock().unwrap().push(*element);
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        if self.fail_shutdown {
            return Err(RenderError::Closed);
        }
        Ok(())
    }
}

/// A lazily-loaded feed that grows on every scroll until `growth_rounds`
/// scrolls have happened, then stops changing.
pub struct FakeFeed {
    initial_cards: usize,
    cards_per_scroll: usize,
    growth_rounds: usize,
    fail_scope_scroll: bool,
    fail_scope_extent: bool,
    scrolls: AtomicUsize,
    document_scrolls: AtomicUsize,
    into_view: Mutex<Vec<usize>>,
}

/// Element id of the feed container; cards are `0..count`.
pub const FEED_CONTAINER: usize = usize::MAX;

impl FakeFeed {
    pub fn new(initial_cards: usize, cards_per_scroll: usize, growth_rounds: usize) -> Self {
        Self {
            initial_cards,
            cards_per_scroll,
            growth_rounds,
            fail_scope_scroll: false,
            fail_scope_extent: false,
            scrolls: AtomicUsize::new(0),
            document_scrolls: AtomicUsize::new(0),
            into_view: Mutex::new(Vec::new()),
        }
    }

    pub fn with_failing_scope(mut self) -> Self {
        self.fail_scope_scroll = true;
        self.fail_scope_extent = true;
        self
    }

    pub fn card_count(&self) -> usize {
        let grown = self.scrolls.load(Ordering::SeqCst).min(self.growth_rounds);
        self.initial_cards + grown * self.cards_per_scroll
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    pub fn document_scrolls(&self) -> usize {
        self.document_scrolls.load(Ordering::SeqCst)
    }

    pub fn scrolled_into_view(&self) -> Vec<usize> {
        self.into_view.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageRenderer for FakeFeed {
    type Element = usize;

    async fn navigate(&self, _url: &str) -> Result<(), RenderError> {
        Ok(())
    }

    async fn find_all(
        &self,
        _scope: Option<&usize>,
        locator: &Locator,
    ) -> Result<Vec<usize>, RenderError> {
        if *locator == selectors::CARD.locators[0] {
            Ok((0..self.card_count()).collect())
        } else {
            Ok(Vec::new())
        }
    }

    async fn text(&self, _element: &usize) -> Result<String, RenderError> {
        Ok(String::new())
    }

    async fn attribute(&self, _element: &usize, _name: &str) -> Result<Option<String>, RenderError> {
        Ok(None)
    }

    async fn scroll_by_viewport(&self, scope: Option<&usize>) -> Result<(), RenderError> {
        if scope.is_some() && self.fail_scope_scroll {
            return Err(RenderError::Script("scope detached".to_string()));
        }
        if scope.is_none() {
            self.document_scrolls.fetch_add(1, Ordering::SeqCst);
        }
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn scroll_extent(&self, scope: Option<&usize>) -> Result<i64, RenderError> {
        if scope.is_some() && self.fail_scope_extent {
            return Err(RenderError::Script("scope detached".to_string()));
        }
        Ok(i64::try_from(self.card_count() * 120).unwrap_or(i64::MAX))
    }

    async fn scroll_into_view(&self, element: &usize) -> Result<(), RenderError> {
        self.into_view.lock().unwrap().push(*element);
        Ok(())
    }

    async fn click(&self, _element: &usize) -> Result<(), RenderError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// A record store holding rows in memory, matching filters exactly.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Map<String, Value>>>,
}

impl MemoryStore {
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_matching(
        &self,
        filter: &[(&str, &str)],
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                filter
                    .iter()
                    .all(|(field, value)| row.get(*field).and_then(Value::as_str) == Some(*value))
            })
            .map(|(i, row)| StoredRecord {
                id: format!("rec{i}"),
                fields: row.clone(),
                created_time: None,
            })
            .collect())
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<StoredRecord, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        rows.push(fields.clone());
        Ok(StoredRecord {
            id: format!("rec{}", rows.len() - 1),
            fields,
            created_time: None,
        })
    }
}
