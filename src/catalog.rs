//! Authored step catalog: static tour content keyed by page and, for pages
//! with sub-tabs, by the active tab.
//!
//! The built-in catalog ships as embedded JSON parsed once at first use,
//! but the catalog itself is an ordinary injectable value: controllers take
//! their own copy, so multiple guide instances never share hidden state.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Advisory placement hint for a step's tooltip. The layout engine may
/// override it when the hinted side does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionHint {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
    Center,
}

/// One authored unit of a guided tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Comma-separated selector list tried in order; absent means a
    /// centered, targetless message step.
    #[serde(default)]
    pub target: Option<String>,
    /// Selector that must match a visibly rendered element for this step to
    /// be eligible at all, independent of `target`.
    #[serde(default)]
    pub conditional_target: Option<String>,
    pub title: String,
    /// Body text; literal newlines are preserved as line breaks.
    pub content: String,
    #[serde(default)]
    pub position: PositionHint,
}

impl StepDescriptor {
    /// The target selector list, split on commas and trimmed.
    #[must_use]
    pub fn selectors(&self) -> Vec<&str> {
        self.target
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A step with no target renders as a centered message.
    #[must_use]
    pub fn is_informational(&self) -> bool {
        self.target.is_none()
    }
}

/// The host context a catalog lookup is made against: the current page and
/// the active tab for each independently tracked tab dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuideContext {
    pub page: String,
    pub tabs: HashMap<String, String>,
}

impl GuideContext {
    #[must_use]
    pub fn page(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            tabs: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_tab(mut self, dimension: impl Into<String>, active: impl Into<String>) -> Self {
        self.tabs.insert(dimension.into(), active.into());
        self
    }
}

/// Steps for one page. Pages with sub-tabs name their tab dimension in
/// `tab_key` and key their steps under `tabs`; flat pages use `steps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Display title, used by the synthetic welcome fallback.
    pub title: String,
    #[serde(default)]
    pub tab_key: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepDescriptor>,
    #[serde(default)]
    pub tabs: HashMap<String, Vec<StepDescriptor>>,
}

/// Immutable page/tab-keyed table of step descriptors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepCatalog {
    pages: HashMap<String, PageEntry>,
}

static BUILTIN: Lazy<StepCatalog> = Lazy::new(|| {
    StepCatalog::from_json(include_str!("catalog/builtin.json"))
        .expect("embedded step catalog must parse")
});

impl StepCatalog {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The catalog compiled into this crate (the terminal demo's content).
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    #[must_use]
    pub fn with_page(mut self, id: impl Into<String>, entry: PageEntry) -> Self {
        self.pages.insert(id.into(), entry);
        self
    }

    /// Raw ordered steps for the given context; empty when the context is
    /// unknown or the page's tab dimension has no entry for the active tab.
    #[must_use]
    pub fn steps_for(&self, context: &GuideContext) -> &[StepDescriptor] {
        let Some(entry) = self.pages.get(&context.page) else {
            return &[];
        };
        match &entry.tab_key {
            Some(dimension) => context
                .tabs
                .get(dimension)
                .and_then(|active| entry.tabs.get(active))
                .map_or(&entry.steps[..], Vec::as_slice),
            None => &entry.steps,
        }
    }

    /// Display title for a page, falling back to the raw page id.
    #[must_use]
    pub fn page_title<'a>(&'a self, page: &'a str) -> &'a str {
        self.pages.get(page).map_or(page, |entry| entry.title.as_str())
    }

    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> StepCatalog {
        StepCatalog::from_json(
            r##"{
                "pages": {
                    "overview": {
                        "title": "Overview",
                        "tab_key": "overview_tab",
                        "tabs": {
                            "map": [
                                {"title": "Welcome", "content": "Hi", "position": "center"},
                                {"target": "#map-panel", "title": "Map", "content": "The map"}
                            ],
                            "species": [
                                {"target": ".species-table", "title": "Table", "content": "Rows"}
                            ]
                        }
                    },
                    "settings": {
                        "title": "Settings",
                        "steps": [
                            {"target": "#settings-form", "title": "Form", "content": "Edit"}
                        ]
                    }
                }
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_flat_page_lookup() {
        let catalog = sample_catalog();
        let steps = catalog.steps_for(&GuideContext::page("settings"));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].target.as_deref(), Some("#settings-form"));
    }

    #[test]
    fn test_tabbed_page_lookup() {
        let catalog = sample_catalog();
        let ctx = GuideContext::page("overview").with_tab("overview_tab", "species");
        let steps = catalog.steps_for(&ctx);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].title, "Table");
    }

    #[test]
    fn test_unknown_context_is_empty() {
        let catalog = sample_catalog();
        assert!(catalog.steps_for(&GuideContext::page("nope")).is_empty());
        // tabbed page with an unknown active tab
        let ctx = GuideContext::page("overview").with_tab("overview_tab", "nope");
        assert!(catalog.steps_for(&ctx).is_empty());
        // tabbed page with no tab context at all falls back to page steps
        assert!(catalog.steps_for(&GuideContext::page("overview")).is_empty());
    }

    #[test]
    fn test_page_title_falls_back_to_id() {
        let catalog = sample_catalog();
        assert_eq!(catalog.page_title("overview"), "Overview");
        assert_eq!(catalog.page_title("mystery"), "mystery");
    }

    #[test]
    fn test_selector_list_splits_and_trims() {
        let step = StepDescriptor {
            target: Some(" .btn-a , .btn-b,, #fallback ".to_string()),
            conditional_target: None,
            title: String::new(),
            content: String::new(),
            position: PositionHint::default(),
        };
        assert_eq!(step.selectors(), vec![".btn-a", ".btn-b", "#fallback"]);
    }

    #[test]
    fn test_default_position_is_bottom() {
        let step: StepDescriptor =
            serde_json::from_str(r#"{"title": "t", "content": "c"}"#).unwrap();
        assert_eq!(step.position, PositionHint::Bottom);
        assert!(step.is_informational());
        assert!(step.selectors().is_empty());
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = StepCatalog::builtin();
        assert!(catalog.pages().count() >= 3);
        let ctx = GuideContext::page("overview").with_tab("overview_tab", "map");
        assert!(!catalog.steps_for(&ctx).is_empty());
    }
}
