//! Step eligibility: filters authored steps down to the ones whose targets
//! currently exist and are visibly rendered.
//!
//! Authored steps reference UI that is conditionally rendered (empty states,
//! tab-specific panels), so eligibility is re-checked every time the host's
//! page or tab context changes. Showing a tooltip that points at nothing is
//! a broken experience; a step whose requirements are not met is dropped.

use tracing::{debug, warn};

use crate::catalog::{PositionHint, StepDescriptor};
use crate::surface::{ElementId, Surface};

/// Filters `raw` down to the steps whose targets are currently present and
/// visible, preserving catalog order.
pub fn resolve_steps<S: Surface + ?Sized>(raw: &[StepDescriptor], surface: &S) -> Vec<StepDescriptor> {
    raw.iter()
        .filter(|step| is_eligible(step, surface))
        .cloned()
        .collect()
}

/// Like [`resolve_steps`], but never returns an empty list: when nothing is
/// eligible a single synthetic welcome step is substituted, so the tour
/// controller always has something to show.
pub fn resolve_or_fallback<S: Surface + ?Sized>(
    raw: &[StepDescriptor],
    surface: &S,
    page_title: &str,
) -> Vec<StepDescriptor> {
    let eligible = resolve_steps(raw, surface);
    if eligible.is_empty() {
        debug!(page_title, "no eligible steps, substituting welcome step");
        vec![fallback_step(page_title)]
    } else {
        eligible
    }
}

fn is_eligible<S: Surface + ?Sized>(step: &StepDescriptor, surface: &S) -> bool {
    // The conditional gate is independent of the target's own visibility.
    if let Some(conditional) = step.conditional_target.as_deref() {
        if visible_match(surface, conditional).is_none() {
            debug!(conditional, title = %step.title, "step dropped: conditional target not visible");
            return false;
        }
    }
    if step.target.is_none() {
        return true;
    }
    let kept = step
        .selectors()
        .iter()
        .any(|selector| visible_match(surface, selector).is_some());
    if !kept {
        debug!(title = %step.title, "step dropped: no visible target");
    }
    kept
}

/// Queries one selector and keeps the match only if it has non-zero rendered
/// area. Malformed selectors are logged and treated as non-matching.
pub(crate) fn visible_match<S: Surface + ?Sized>(surface: &S, selector: &str) -> Option<ElementId> {
    let id = match surface.query(selector) {
        Ok(found) => found?,
        Err(err) => {
            warn!(selector, %err, "skipping unparsable selector");
            return None;
        }
    };
    let rect = surface.bounding_rect(id)?;
    if rect.is_zero_area() {
        None
    } else {
        Some(id)
    }
}

/// The synthetic step used when a context has no eligible steps.
#[must_use]
pub fn fallback_step(page_title: &str) -> StepDescriptor {
    StepDescriptor {
        target: None,
        conditional_target: None,
        title: format!("Welcome to {page_title}"),
        content: "This short tour points out the main areas of the screen.\nUse Next and Previous to move between steps, or Skip to leave the tour.".to_string(),
        position: PositionHint::Center,
    }
}
