//! The seam between the engine and its host's live document.
//!
//! The engine never touches host content directly: it reads geometry and
//! requests scrolls through [`Surface`], and the host decides what a
//! selector means. [`StaticSurface`] is the in-memory implementation used by
//! the test suite and the terminal demo, where selectors are matched against
//! the exact tokens an element was registered under.

use crate::error::SelectorError;
use crate::geometry::{Rect, Size};

/// Opaque handle to a host element. The host owns the element's lifetime;
/// the engine only ever uses the id for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Host document abstraction: element query, geometry, and scrolling.
pub trait Surface {
    /// Current viewport size.
    fn viewport(&self) -> Size;

    /// Finds the first element matching `selector`, or `None`.
    ///
    /// A malformed selector is an `Err`; callers in this crate log it and
    /// treat it as a non-match.
    fn query(&self, selector: &str) -> Result<Option<ElementId>, SelectorError>;

    /// The element's current rendered bounding box, or `None` if the element
    /// no longer exists.
    fn bounding_rect(&self, id: ElementId) -> Option<Rect>;

    /// Requests that the element be scrolled into view, centered. Hosts
    /// without scrolling may ignore this.
    fn scroll_into_view(&mut self, id: ElementId);
}

/// Cheap syntax check for authored selectors: non-empty, no leading
/// combinator, balanced brackets/parens/quotes. This is deliberately not a
/// full CSS grammar; it exists so typos in authored data surface as
/// [`SelectorError`] instead of silently matching nothing.
pub fn validate_selector(selector: &str) -> Result<(), SelectorError> {
    let s = selector.trim();
    if s.is_empty() {
        return Err(SelectorError::Empty);
    }
    if let Some(first) = s.chars().next() {
        if matches!(first, '>' | '+' | '~' | ',') {
            return Err(SelectorError::invalid(s, "leading combinator"));
        }
    }
    let mut brackets = 0i32;
    let mut parens = 0i32;
    let mut quote: Option<char> = None;
    for c in s.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '[' => brackets += 1,
                ']' => {
                    brackets -= 1;
                    if brackets < 0 {
                        return Err(SelectorError::invalid(s, "unbalanced `]`"));
                    }
                }
                '(' => parens += 1,
                ')' => {
                    parens -= 1;
                    if parens < 0 {
                        return Err(SelectorError::invalid(s, "unbalanced `)`"));
                    }
                }
                _ => {}
            },
        }
    }
    if brackets != 0 || parens != 0 {
        return Err(SelectorError::invalid(s, "unclosed bracket"));
    }
    if quote.is_some() {
        return Err(SelectorError::invalid(s, "unclosed quote"));
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct StaticElement {
    id: ElementId,
    tokens: Vec<String>,
    rect: Rect,
}

/// In-memory [`Surface`]: elements are registered under one or more selector
/// tokens ("#species-table", ".filter-panel") and matched by exact token.
/// Ids are stable across [`StaticSurface::upsert`] calls so a host can
/// refresh geometry every frame without invalidating tracked elements.
#[derive(Debug, Default)]
pub struct StaticSurface {
    viewport: Size,
    next_id: u64,
    elements: Vec<StaticElement>,
    scroll_requests: Vec<ElementId>,
}

impl StaticSurface {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Registers a new element and returns its id.
    pub fn insert(&mut self, tokens: &[&str], rect: Rect) -> ElementId {
        self.next_id += 1;
        let id = ElementId::new(self.next_id);
        self.elements.push(StaticElement {
            id,
            tokens: tokens.iter().map(ToString::to_string).collect(),
            rect,
        });
        id
    }

    /// Updates the element registered under the same primary token, or
    /// inserts it. This is what a per-frame host uses to keep ids stable.
    pub fn upsert(&mut self, tokens: &[&str], rect: Rect) -> ElementId {
        let primary = tokens.first().copied();
        if let Some(el) = self
            .elements
            .iter_mut()
            .find(|e| e.tokens.first().map(String::as_str) == primary)
        {
            el.rect = rect;
            el.tokens = tokens.iter().map(ToString::to_string).collect();
            return el.id;
        }
        self.insert(tokens, rect)
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(el) = self.elements.iter_mut().find(|e| e.id == id) {
            el.rect = rect;
        }
    }

    pub fn remove(&mut self, id: ElementId) {
        self.elements.retain(|e| e.id != id);
    }

    /// Removes the element registered under `token`, if any.
    pub fn remove_by_token(&mut self, token: &str) {
        self.elements
            .retain(|e| !e.tokens.iter().any(|t| t == token));
    }

    /// Drops every element while keeping the id counter, so ids are never
    /// reused across a page switch.
    pub fn clear_elements(&mut self) {
        self.elements.clear();
    }

    /// Scroll-into-view requests received so far, oldest first.
    #[must_use]
    pub fn scroll_requests(&self) -> &[ElementId] {
        &self.scroll_requests
    }

    /// Drains the pending scroll requests. A long-lived host calls this
    /// every frame; requests it cannot act on are simply dropped.
    pub fn take_scroll_requests(&mut self) -> Vec<ElementId> {
        std::mem::take(&mut self.scroll_requests)
    }
}

impl Surface for StaticSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn query(&self, selector: &str) -> Result<Option<ElementId>, SelectorError> {
        validate_selector(selector)?;
        let wanted = selector.trim();
        Ok(self
            .elements
            .iter()
            .find(|e| e.tokens.iter().any(|t| t == wanted))
            .map(|e| e.id))
    }

    fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        self.elements.iter().find(|e| e.id == id).map(|e| e.rect)
    }

    fn scroll_into_view(&mut self, id: ElementId) {
        self.scroll_requests.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_selector_accepts_common_forms() {
        for sel in ["#map-panel", ".filter-panel", "button", "div.row[data-id='3']", "li:nth-child(2)"] {
            assert!(validate_selector(sel).is_ok(), "{sel} should be valid");
        }
    }

    #[test]
    fn test_validate_selector_rejects_malformed() {
        assert_eq!(validate_selector("   "), Err(SelectorError::Empty));
        assert!(validate_selector("> .child").is_err());
        assert!(validate_selector(".btn[").is_err());
        assert!(validate_selector(".btn]").is_err());
        assert!(validate_selector("a[href='x]").is_err());
        assert!(validate_selector(":nth-child(2").is_err());
    }

    #[test]
    fn test_query_matches_any_registered_token() {
        let mut surface = StaticSurface::new(Size::new(800.0, 600.0));
        let id = surface.insert(&["#export", ".toolbar-button"], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(surface.query("#export").unwrap(), Some(id));
        assert_eq!(surface.query(".toolbar-button").unwrap(), Some(id));
        assert_eq!(surface.query("#missing").unwrap(), None);
    }

    #[test]
    fn test_query_rejects_bad_selector() {
        let surface = StaticSurface::new(Size::new(800.0, 600.0));
        assert!(surface.query(".btn[").is_err());
    }

    #[test]
    fn test_upsert_keeps_ids_stable() {
        let mut surface = StaticSurface::new(Size::new(800.0, 600.0));
        let a = surface.upsert(&["#a"], Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = surface.upsert(&["#b"], Rect::new(20.0, 0.0, 10.0, 10.0));
        let a2 = surface.upsert(&["#a"], Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(surface.bounding_rect(a).unwrap().top, 5.0);
    }

    #[test]
    fn test_removed_element_has_no_rect() {
        let mut surface = StaticSurface::new(Size::new(800.0, 600.0));
        let id = surface.insert(&["#gone"], Rect::new(0.0, 0.0, 10.0, 10.0));
        surface.remove(id);
        assert_eq!(surface.bounding_rect(id), None);
        assert_eq!(surface.query("#gone").unwrap(), None);
    }

    #[test]
    fn test_scroll_requests_recorded() {
        let mut surface = StaticSurface::new(Size::new(800.0, 600.0));
        let id = surface.insert(&["#a"], Rect::new(0.0, 0.0, 10.0, 10.0));
        surface.scroll_into_view(id);
        assert_eq!(surface.scroll_requests(), &[id]);
    }

    #[test]
    fn test_take_scroll_requests_drains() {
        let mut surface = StaticSurface::new(Size::new(800.0, 600.0));
        let id = surface.insert(&["#a"], Rect::new(0.0, 0.0, 10.0, 10.0));
        surface.scroll_into_view(id);
        surface.scroll_into_view(id);
        assert_eq!(surface.take_scroll_requests(), vec![id, id]);
        // drained: nothing accumulates across frames
        assert!(surface.scroll_requests().is_empty());
        assert!(surface.take_scroll_requests().is_empty());
    }
}
