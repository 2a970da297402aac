//! Viewport-aware tooltip placement.
//!
//! Given the target's bounding box and the viewport, picks which side the
//! tooltip goes on and where its pointer arrow attaches. The preference
//! order is below, above, right-of, left-of, centered: users expect
//! explanatory text under or next to what they are looking at, and the
//! final clamp pass guarantees the tooltip is never partially off-screen
//! whatever branch was taken.

use crate::catalog::PositionHint;
use crate::config::TooltipConfig;
use crate::geometry::{clamp_span, Rect, Size};

/// Which tooltip edge the pointer arrow attaches to. `Top` means the arrow
/// is on the tooltip's top edge, pointing up at a target above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowSide {
    Top,
    Bottom,
    Left,
    Right,
    #[default]
    None,
}

/// A resolved tooltip position. `arrow_offset` is measured along the arrow's
/// edge from the tooltip's top-left corner and is already clamped inside the
/// tooltip body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub top: f64,
    pub left: f64,
    pub arrow: ArrowSide,
    pub arrow_offset: f64,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Below,
    Above,
    RightOf,
    LeftOf,
}

struct Candidate {
    top: f64,
    left: f64,
    arrow: ArrowSide,
}

/// Computes tooltip position for the current target.
///
/// No target means a centered tooltip with no arrow. The authored `hint` is
/// advisory: it promotes its side to the front of the preference order
/// (`center` short-circuits), but never overrides the fit checks or the
/// final clamp.
#[must_use]
pub fn compute_position(
    target: Option<Rect>,
    viewport: Size,
    tooltip: Size,
    hint: PositionHint,
    cfg: &TooltipConfig,
) -> Placement {
    let Some(target) = target else {
        return finish(centered(viewport, tooltip), None, viewport, tooltip, cfg);
    };
    if hint == PositionHint::Center {
        return finish(centered(viewport, tooltip), None, viewport, tooltip, cfg);
    }

    for side in preference_order(hint) {
        let candidate = match side {
            Side::Below => try_below(target, viewport, tooltip, cfg),
            Side::Above => try_above(target, tooltip, cfg),
            Side::RightOf => try_right_of(target, viewport, tooltip, cfg),
            Side::LeftOf => try_left_of(target, tooltip, cfg),
        };
        if let Some(candidate) = candidate {
            return finish(candidate, Some(target), viewport, tooltip, cfg);
        }
    }

    // Nothing fits around the target (e.g. the target is larger than the
    // viewport): center with no arrow.
    finish(centered(viewport, tooltip), Some(target), viewport, tooltip, cfg)
}

fn preference_order(hint: PositionHint) -> [Side; 4] {
    match hint {
        PositionHint::Top => [Side::Above, Side::Below, Side::RightOf, Side::LeftOf],
        PositionHint::Right => [Side::RightOf, Side::LeftOf, Side::Below, Side::Above],
        PositionHint::Left => [Side::LeftOf, Side::RightOf, Side::Below, Side::Above],
        // `Center` is handled before the loop; default reading-flow order.
        PositionHint::Bottom | PositionHint::Center => {
            [Side::Below, Side::Above, Side::RightOf, Side::LeftOf]
        }
    }
}

fn try_below(target: Rect, viewport: Size, tooltip: Size, cfg: &TooltipConfig) -> Option<Candidate> {
    let space_below = viewport.height - target.bottom();
    if space_below < tooltip.height + cfg.screen_padding + cfg.arrow_clearance {
        return None;
    }
    Some(Candidate {
        top: target.bottom() + cfg.arrow_clearance,
        left: target.center().x - tooltip.width / 2.0,
        arrow: ArrowSide::Top,
    })
}

fn try_above(target: Rect, tooltip: Size, cfg: &TooltipConfig) -> Option<Candidate> {
    let space_above = target.top;
    if space_above < tooltip.height + cfg.screen_padding + cfg.arrow_clearance {
        return None;
    }
    Some(Candidate {
        top: target.top - cfg.arrow_clearance - tooltip.height,
        left: target.center().x - tooltip.width / 2.0,
        arrow: ArrowSide::Bottom,
    })
}

fn try_right_of(target: Rect, viewport: Size, tooltip: Size, cfg: &TooltipConfig) -> Option<Candidate> {
    let space_right = viewport.width - target.right();
    if space_right < tooltip.width + cfg.screen_padding + cfg.arrow_clearance {
        return None;
    }
    Some(Candidate {
        top: target.center().y - tooltip.height / 2.0,
        left: target.right() + cfg.arrow_clearance,
        arrow: ArrowSide::Left,
    })
}

fn try_left_of(target: Rect, tooltip: Size, cfg: &TooltipConfig) -> Option<Candidate> {
    let space_left = target.left;
    if space_left < tooltip.width + cfg.screen_padding + cfg.arrow_clearance {
        return None;
    }
    Some(Candidate {
        top: target.center().y - tooltip.height / 2.0,
        left: target.left - cfg.arrow_clearance - tooltip.width,
        arrow: ArrowSide::Right,
    })
}

fn centered(viewport: Size, tooltip: Size) -> Candidate {
    Candidate {
        top: (viewport.height - tooltip.height) / 2.0,
        left: (viewport.width - tooltip.width) / 2.0,
        arrow: ArrowSide::None,
    }
}

/// Final clamp pass plus arrow offset. Runs for every branch so the tooltip
/// always lands fully inside the padded viewport; the arrow offset is then
/// derived from the target's center relative to the clamped position and
/// kept off the tooltip's rounded corners by `arrow_inset`.
fn finish(
    candidate: Candidate,
    target: Option<Rect>,
    viewport: Size,
    tooltip: Size,
    cfg: &TooltipConfig,
) -> Placement {
    let pad = cfg.screen_padding;
    let top = clamp_span(candidate.top, pad, viewport.height - tooltip.height - pad);
    let left = clamp_span(candidate.left, pad, viewport.width - tooltip.width - pad);
    let arrow_offset = match (candidate.arrow, target) {
        (ArrowSide::Top | ArrowSide::Bottom, Some(t)) => clamp_span(
            t.center().x - left,
            cfg.arrow_inset,
            tooltip.width - cfg.arrow_inset,
        ),
        (ArrowSide::Left | ArrowSide::Right, Some(t)) => clamp_span(
            t.center().y - top,
            cfg.arrow_inset,
            tooltip.height - cfg.arrow_inset,
        ),
        _ => 0.0,
    };
    Placement {
        top,
        left,
        arrow: candidate.arrow,
        arrow_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> TooltipConfig {
        TooltipConfig::default()
    }

    fn tooltip() -> Size {
        cfg().size()
    }

    #[test]
    fn test_no_target_centers_with_no_arrow() {
        let viewport = Size::new(800.0, 600.0);
        let p = compute_position(None, viewport, tooltip(), PositionHint::Bottom, &cfg());
        assert_eq!(p.arrow, ArrowSide::None);
        assert_eq!(p.left, (800.0 - tooltip().width) / 2.0);
        assert_eq!(p.top, (600.0 - tooltip().height) / 2.0);
    }

    #[test]
    fn test_prefers_below_when_space_allows() {
        // Target high in a 1920x1080 viewport: plenty of space below.
        let target = Rect::new(100.0, 100.0, 200.0, 50.0);
        let viewport = Size::new(1920.0, 1080.0);
        let p = compute_position(Some(target), viewport, tooltip(), PositionHint::Bottom, &cfg());
        assert_eq!(p.arrow, ArrowSide::Top);
        assert_eq!(p.top, target.bottom() + cfg().arrow_clearance);
    }

    #[test]
    fn test_near_bottom_edge_places_above() {
        // 800x600 viewport, target near the bottom edge.
        let target = Rect::new(550.0, 400.0, 100.0, 40.0);
        let viewport = Size::new(800.0, 600.0);
        let p = compute_position(Some(target), viewport, tooltip(), PositionHint::Bottom, &cfg());
        assert_eq!(p.arrow, ArrowSide::Bottom);
        assert_eq!(p.top, 550.0 - cfg().arrow_clearance - tooltip().height);
    }

    #[test]
    fn test_side_placement_when_neither_vertical_fits() {
        // A tall target filling the viewport's height, hugging the left
        // edge: only right-of fits.
        let target = Rect::new(0.0, 0.0, 200.0, 600.0);
        let viewport = Size::new(1200.0, 600.0);
        let p = compute_position(Some(target), viewport, tooltip(), PositionHint::Bottom, &cfg());
        assert_eq!(p.arrow, ArrowSide::Left);
        assert_eq!(p.left, target.right() + cfg().arrow_clearance);
    }

    #[test]
    fn test_centered_fallback_when_nothing_fits() {
        // Target larger than the viewport on both axes.
        let target = Rect::new(-100.0, -100.0, 2000.0, 2000.0);
        let viewport = Size::new(800.0, 600.0);
        let p = compute_position(Some(target), viewport, tooltip(), PositionHint::Bottom, &cfg());
        assert_eq!(p.arrow, ArrowSide::None);
    }

    #[test]
    fn test_always_clamped_inside_padded_viewport() {
        let c = cfg();
        let t = tooltip();
        for &viewport in &[Size::new(800.0, 600.0), Size::new(1920.0, 1080.0)] {
            let targets = [
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Rect::new(550.0, 700.0, 100.0, 40.0),
                Rect::new(-50.0, -50.0, 30.0, 30.0),
                Rect::new(1070.0, 1900.0, 200.0, 200.0),
                Rect::new(-100.0, -100.0, 4000.0, 4000.0),
                Rect::new(300.0, 390.0, 1.0, 1.0),
            ];
            for &target in &targets {
                for hint in [
                    PositionHint::Top,
                    PositionHint::Bottom,
                    PositionHint::Left,
                    PositionHint::Right,
                    PositionHint::Center,
                ] {
                    let p = compute_position(Some(target), viewport, t, hint, &c);
                    assert!(p.top >= c.screen_padding, "top {} under-clamped", p.top);
                    assert!(
                        p.top <= viewport.height - t.height - c.screen_padding,
                        "top {} over-clamped for {viewport:?}",
                        p.top
                    );
                    assert!(p.left >= c.screen_padding);
                    assert!(p.left <= viewport.width - t.width - c.screen_padding);
                }
            }
        }
    }

    #[test]
    fn test_arrow_offset_clamped_inside_tooltip_body() {
        let c = cfg();
        let t = tooltip();
        // Target hugging the far left: horizontal centering clamps the
        // tooltip right-ward, pushing the arrow toward the corner.
        let target = Rect::new(100.0, 0.0, 10.0, 10.0);
        let viewport = Size::new(1920.0, 1080.0);
        let p = compute_position(Some(target), viewport, t, PositionHint::Bottom, &c);
        assert_eq!(p.arrow, ArrowSide::Top);
        assert!(p.arrow_offset >= c.arrow_inset);
        assert!(p.arrow_offset <= t.width - c.arrow_inset);
    }

    #[test]
    fn test_hint_promotes_side_but_never_overrides_fit() {
        let viewport = Size::new(1920.0, 1080.0);
        let c = cfg();
        let t = tooltip();
        // Room on every side: the hint wins.
        let target = Rect::new(500.0, 900.0, 120.0, 60.0);
        let p = compute_position(Some(target), viewport, t, PositionHint::Top, &c);
        assert_eq!(p.arrow, ArrowSide::Bottom);
        let p = compute_position(Some(target), viewport, t, PositionHint::Right, &c);
        assert_eq!(p.arrow, ArrowSide::Left);
        // Hinted side does not fit: falls through to one that does.
        let cramped = Rect::new(20.0, 900.0, 120.0, 60.0);
        let p = compute_position(Some(cramped), viewport, t, PositionHint::Top, &c);
        assert_eq!(p.arrow, ArrowSide::Top);
        // Center hint short-circuits even with a target.
        let p = compute_position(Some(target), viewport, t, PositionHint::Center, &c);
        assert_eq!(p.arrow, ArrowSide::None);
    }
}
