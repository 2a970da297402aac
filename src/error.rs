//! Error types for the tour engine.
//!
//! Nothing here is fatal to a host: selector errors are swallowed (and
//! logged) at each query site, and catalog errors only surface when loading
//! authored content.

use thiserror::Error;

/// A selector string that the surface refused to parse.
///
/// Authored step data can contain typos; these are caught per selector
/// attempt and treated as "no match" so a tour never crashes its host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("invalid selector `{selector}`: {reason}")]
    Invalid { selector: String, reason: String },
}

impl SelectorError {
    pub fn invalid(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to load an authored step catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse step catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
