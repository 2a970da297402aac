//! The tour state machine: step sequencing, context changes, and the
//! overlay view the host renders.
//!
//! A session exists only while the tour is open; re-opening always restarts
//! at step 0. While open, pointer input belongs to the tour: anything that
//! does not land on one of the tooltip's own buttons is swallowed, so the
//! user cannot desynchronize the spotlighted page from the tour state.

use tracing::{debug, info};

use crate::catalog::{GuideContext, StepCatalog, StepDescriptor};
use crate::config::GuideConfig;
use crate::geometry::{Point, Rect};
use crate::layout::{compute_position, ArrowSide};
use crate::resolver::resolve_or_fallback;
use crate::surface::Surface;
use crate::tracker::{SettleTimer, SettleToken, TargetTracker};

/// Why a tour session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Next past the last step.
    Finished,
    /// Explicit skip.
    Skipped,
    /// External close signal from the host.
    Dismissed,
}

/// The tooltip's control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourButton {
    Previous,
    Next,
    Skip,
    Close,
}

/// What the controller did with a pointer event while deciding whether the
/// host may see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerResponse {
    /// Tour closed; the host handles the event.
    PassThrough,
    /// Tour open, pointer outside the tooltip controls: suppressed.
    Swallowed,
    /// A tooltip button was activated.
    Activated {
        button: TourButton,
        timer: Option<SettleTimer>,
    },
}

/// Everything the host needs to draw one overlay frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    /// Cut-out region of the dimming layer, or `None` for a centered step.
    pub spotlight: Option<Rect>,
    pub tooltip: Rect,
    pub arrow: ArrowSide,
    pub arrow_offset: f64,
    pub title: String,
    /// Body text; newlines are line breaks.
    pub content: String,
    /// Zero-based.
    pub step_index: usize,
    pub step_count: usize,
    pub has_previous: bool,
    pub is_last: bool,
    /// Hit-testable control rects, all inside `tooltip`.
    pub buttons: Vec<(TourButton, Rect)>,
}

struct TourSession {
    steps: Vec<StepDescriptor>,
    current: usize,
    tracker: TargetTracker,
}

type CloseCallback = Box<dyn FnMut(CloseReason)>;

/// Drives a guided tour over a host [`Surface`].
pub struct TourController {
    catalog: StepCatalog,
    config: GuideConfig,
    context: GuideContext,
    session: Option<TourSession>,
    on_close: Option<CloseCallback>,
}

impl TourController {
    #[must_use]
    pub fn new(catalog: StepCatalog, config: GuideConfig) -> Self {
        Self {
            catalog,
            config,
            context: GuideContext::default(),
            session: None,
            on_close: None,
        }
    }

    /// Host callback invoked when the tour ends (any [`CloseReason`]). The
    /// host owns "tour seen" persistence.
    pub fn set_on_close(&mut self, callback: impl FnMut(CloseReason) + 'static) {
        self.on_close = Some(Box::new(callback));
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn context(&self) -> &GuideContext {
        &self.context
    }

    #[must_use]
    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    /// Opens (or restarts) the tour at step 0 for the current context.
    pub fn open<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<SettleTimer> {
        if self.session.is_some() {
            debug!("open requested while already open; restarting at step 0");
        }
        info!(page = %self.context.page, "tour opened");
        self.start_session(surface)
    }

    /// Advances to the next step; on the last step this is Finish.
    pub fn next<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<SettleTimer> {
        let on_last = match &self.session {
            Some(session) => session.current + 1 >= session.steps.len(),
            None => return None,
        };
        if on_last {
            self.close(CloseReason::Finished);
            return None;
        }
        let session = self.session.as_mut()?;
        session.current += 1;
        debug!(step = session.current, "advanced to next step");
        Self::track_current(session, surface)
    }

    /// Steps back; no-op at step 0 (no wraparound).
    pub fn previous<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<SettleTimer> {
        let session = self.session.as_mut()?;
        if session.current == 0 {
            return None;
        }
        session.current -= 1;
        debug!(step = session.current, "stepped back");
        Self::track_current(session, surface)
    }

    /// Closes immediately, whatever the position.
    pub fn skip(&mut self) {
        self.close(CloseReason::Skipped);
    }

    /// External close signal (the tooltip's × button, or the host).
    pub fn dismiss(&mut self) {
        self.close(CloseReason::Dismissed);
    }

    /// Updates the host context (page, or any tab dimension). If the tour is
    /// open and the context actually changed, steps are re-resolved against
    /// the new context and the tour restarts at step 0.
    pub fn set_context<S: Surface + ?Sized>(
        &mut self,
        context: GuideContext,
        surface: &mut S,
    ) -> Option<SettleTimer> {
        if context == self.context {
            return None;
        }
        self.context = context;
        if self.session.is_some() {
            debug!(page = %self.context.page, "context changed while open; re-resolving steps");
            self.start_session(surface)
        } else {
            None
        }
    }

    /// Routes a pointer event. While open, everything outside the tooltip's
    /// buttons is swallowed.
    pub fn pointer_down<S: Surface + ?Sized>(
        &mut self,
        point: Point,
        surface: &mut S,
    ) -> PointerResponse {
        if !self.is_open() {
            return PointerResponse::PassThrough;
        }
        match self.hit_test(point, surface) {
            Some(button) => {
                let timer = self.activate(button, surface);
                PointerResponse::Activated { button, timer }
            }
            None => PointerResponse::Swallowed,
        }
    }

    /// Which tooltip button, if any, is under `point`.
    #[must_use]
    pub fn hit_test<S: Surface + ?Sized>(&self, point: Point, surface: &S) -> Option<TourButton> {
        let view = self.view(surface)?;
        view.buttons
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(button, _)| *button)
    }

    /// Performs a button's action.
    pub fn activate<S: Surface + ?Sized>(
        &mut self,
        button: TourButton,
        surface: &mut S,
    ) -> Option<SettleTimer> {
        match button {
            TourButton::Previous => self.previous(surface),
            TourButton::Next => self.next(surface),
            TourButton::Skip => {
                self.skip();
                None
            }
            TourButton::Close => {
                self.dismiss();
                None
            }
        }
    }

    /// Scroll happened somewhere in the host. Returns `true` when a frame
    /// callback is newly needed.
    pub fn note_scroll(&mut self) -> bool {
        self.session
            .as_mut()
            .is_some_and(|s| s.tracker.note_scroll())
    }

    /// Viewport resized; same coalescing as scroll.
    pub fn note_resize(&mut self) -> bool {
        self.session
            .as_mut()
            .is_some_and(|s| s.tracker.note_resize())
    }

    /// Runs the coalesced re-measure, at most once per rendered frame.
    pub fn on_frame<S: Surface + ?Sized>(&mut self, surface: &S) -> bool {
        self.session
            .as_mut()
            .is_some_and(|s| s.tracker.on_frame(surface))
    }

    /// A settle timer fired. Stale tokens are ignored.
    pub fn settle_elapsed<S: Surface + ?Sized>(&mut self, token: SettleToken, surface: &S) -> bool {
        self.session
            .as_mut()
            .is_some_and(|s| s.tracker.settle_elapsed(token, surface))
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&StepDescriptor> {
        let session = self.session.as_ref()?;
        session.steps.get(session.current)
    }

    /// `(zero-based index, total)` while open.
    #[must_use]
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.session
            .as_ref()
            .map(|s| (s.current, s.steps.len()))
    }

    #[must_use]
    pub fn target_rect(&self) -> Option<Rect> {
        self.session.as_ref().and_then(|s| s.tracker.rect())
    }

    /// The overlay to draw for the current step, or `None` while closed.
    #[must_use]
    pub fn view<S: Surface + ?Sized>(&self, surface: &S) -> Option<OverlayView> {
        let session = self.session.as_ref()?;
        let step = session.steps.get(session.current)?;
        let viewport = surface.viewport();
        let tooltip_size = self.config.tooltip.size();
        let target = session.tracker.rect();
        let placement = compute_position(
            target,
            viewport,
            tooltip_size,
            step.position,
            &self.config.tooltip,
        );
        let tooltip = Rect::new(
            placement.top,
            placement.left,
            tooltip_size.width,
            tooltip_size.height,
        );
        Some(OverlayView {
            spotlight: target.map(|r| r.inflate(self.config.tooltip.spotlight_margin)),
            tooltip,
            arrow: placement.arrow,
            arrow_offset: placement.arrow_offset,
            title: step.title.clone(),
            content: step.content.clone(),
            step_index: session.current,
            step_count: session.steps.len(),
            has_previous: session.current > 0,
            is_last: session.current + 1 == session.steps.len(),
            buttons: button_rects(tooltip, session.current > 0),
        })
    }

    fn start_session<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<SettleTimer> {
        let raw = self.catalog.steps_for(&self.context);
        let steps = resolve_or_fallback(raw, surface, self.catalog.page_title(&self.context.page));
        debug!(eligible = steps.len(), "steps resolved");
        let mut session = TourSession {
            steps,
            current: 0,
            tracker: TargetTracker::new(self.config.timing.settle_delay()),
        };
        let timer = Self::track_current(&mut session, surface);
        self.session = Some(session);
        timer
    }

    fn track_current<S: Surface + ?Sized>(
        session: &mut TourSession,
        surface: &mut S,
    ) -> Option<SettleTimer> {
        let TourSession {
            steps,
            current,
            tracker,
        } = session;
        steps
            .get(*current)
            .and_then(|step| tracker.begin_step(step, surface))
    }

    fn close(&mut self, reason: CloseReason) {
        if let Some(mut session) = self.session.take() {
            session.tracker.clear();
            info!(?reason, "tour closed");
            if let Some(on_close) = self.on_close.as_mut() {
                on_close(reason);
            }
        }
    }
}

/// Lays out the tooltip's control rects. Sizes are proportional with small
/// floors so both pixel hosts and cell hosts get usable hit areas.
fn button_rects(tooltip: Rect, has_previous: bool) -> Vec<(TourButton, Rect)> {
    let gutter = (tooltip.width * 0.04).max(1.0);
    let button_h = (tooltip.height * 0.18).max(1.0);
    let button_w = (tooltip.width * 0.24).max(6.0);
    let row_top = tooltip.bottom() - gutter - button_h;

    let mut buttons = vec![(
        TourButton::Skip,
        Rect::new(row_top, tooltip.left + gutter, button_w, button_h),
    )];
    let next_left = tooltip.right() - gutter - button_w;
    buttons.push((
        TourButton::Next,
        Rect::new(row_top, next_left, button_w, button_h),
    ));
    if has_previous {
        buttons.push((
            TourButton::Previous,
            Rect::new(row_top, next_left - gutter - button_w, button_w, button_h),
        ));
    }
    let close = button_h.min(button_w);
    buttons.push((
        TourButton::Close,
        Rect::new(tooltip.top, tooltip.right() - close, close, close),
    ));
    buttons
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::catalog::{PageEntry, PositionHint};
    use crate::geometry::Size;
    use crate::surface::StaticSurface;

    fn step(target: Option<&str>, title: &str) -> StepDescriptor {
        StepDescriptor {
            target: target.map(ToString::to_string),
            conditional_target: None,
            title: title.to_string(),
            content: "body".to_string(),
            position: PositionHint::default(),
        }
    }

    fn catalog() -> StepCatalog {
        StepCatalog::default()
            .with_page(
                "overview",
                PageEntry {
                    title: "Overview".to_string(),
                    tab_key: Some("overview_tab".to_string()),
                    steps: Vec::new(),
                    tabs: [
                        (
                            "map".to_string(),
                            vec![
                                step(None, "welcome"),
                                step(Some("#map-panel"), "map"),
                                step(Some("#filter-panel"), "filters"),
                            ],
                        ),
                        (
                            "species".to_string(),
                            vec![step(Some(".species-table"), "table")],
                        ),
                    ]
                    .into_iter()
                    .collect(),
                },
            )
            .with_page(
                "settings",
                PageEntry {
                    title: "Settings".to_string(),
                    tab_key: None,
                    steps: vec![step(Some("#settings-form"), "form")],
                    tabs: std::collections::HashMap::new(),
                },
            )
    }

    fn dashboard_surface() -> StaticSurface {
        let mut s = StaticSurface::new(Size::new(1920.0, 1080.0));
        s.insert(&["#map-panel"], Rect::new(100.0, 300.0, 1000.0, 600.0));
        s.insert(&["#filter-panel"], Rect::new(100.0, 20.0, 250.0, 600.0));
        s.insert(&[".species-table"], Rect::new(120.0, 300.0, 900.0, 500.0));
        s.insert(&["#settings-form"], Rect::new(200.0, 400.0, 600.0, 300.0));
        s
    }

    fn map_context() -> GuideContext {
        GuideContext::page("overview").with_tab("overview_tab", "map")
    }

    fn open_controller() -> (TourController, StaticSurface) {
        let mut controller = TourController::new(catalog(), GuideConfig::default());
        let mut surface = dashboard_surface();
        controller.set_context(map_context(), &mut surface);
        controller.open(&mut surface);
        (controller, surface)
    }

    #[test]
    fn test_open_starts_at_step_zero() {
        let (controller, _surface) = open_controller();
        assert!(controller.is_open());
        assert_eq!(controller.progress(), Some((0, 3)));
        assert_eq!(controller.current_step().unwrap().title, "welcome");
    }

    #[test]
    fn test_previous_at_zero_is_a_noop() {
        let (mut controller, mut surface) = open_controller();
        controller.previous(&mut surface);
        assert_eq!(controller.progress(), Some((0, 3)));
    }

    #[test]
    fn test_next_past_last_step_finishes() {
        let (mut controller, mut surface) = open_controller();
        let closed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&closed);
        controller.set_on_close(move |reason| sink.borrow_mut().push(reason));

        controller.next(&mut surface);
        controller.next(&mut surface);
        assert_eq!(controller.progress(), Some((2, 3)));
        controller.next(&mut surface);
        assert!(!controller.is_open());
        assert_eq!(*closed.borrow(), vec![CloseReason::Finished]);
    }

    #[test]
    fn test_skip_and_dismiss_reasons() {
        let closed = Rc::new(RefCell::new(Vec::new()));
        let (mut controller, mut surface) = open_controller();
        let sink = Rc::clone(&closed);
        controller.set_on_close(move |reason| sink.borrow_mut().push(reason));
        controller.skip();
        assert!(!controller.is_open());

        controller.open(&mut surface);
        controller.dismiss();
        assert_eq!(
            *closed.borrow(),
            vec![CloseReason::Skipped, CloseReason::Dismissed]
        );
    }

    #[test]
    fn test_tab_change_resets_index_and_re_resolves() {
        let (mut controller, mut surface) = open_controller();
        controller.next(&mut surface);
        controller.next(&mut surface);
        assert_eq!(controller.progress(), Some((2, 3)));

        let ctx = GuideContext::page("overview").with_tab("overview_tab", "species");
        controller.set_context(ctx, &mut surface);
        assert!(controller.is_open());
        assert_eq!(controller.progress(), Some((0, 1)));
        assert_eq!(controller.current_step().unwrap().title, "table");
    }

    #[test]
    fn test_unchanged_context_does_not_reset() {
        let (mut controller, mut surface) = open_controller();
        controller.next(&mut surface);
        controller.set_context(map_context(), &mut surface);
        assert_eq!(controller.progress(), Some((1, 3)));
    }

    #[test]
    fn test_reopen_restarts_at_zero() {
        let (mut controller, mut surface) = open_controller();
        controller.next(&mut surface);
        controller.skip();
        controller.open(&mut surface);
        assert_eq!(controller.progress(), Some((0, 3)));
    }

    #[test]
    fn test_unknown_page_gets_fallback_welcome() {
        let mut controller = TourController::new(catalog(), GuideConfig::default());
        let mut surface = dashboard_surface();
        controller.set_context(GuideContext::page("mystery"), &mut surface);
        controller.open(&mut surface);
        assert_eq!(controller.progress(), Some((0, 1)));
        let step = controller.current_step().unwrap();
        assert!(step.target.is_none());
        assert_eq!(step.title, "Welcome to mystery");
    }

    #[test]
    fn test_view_geometry() {
        let (mut controller, mut surface) = open_controller();
        // step 0 is targetless: centered, no spotlight
        let view = controller.view(&surface).unwrap();
        assert!(view.spotlight.is_none());
        assert_eq!(view.arrow, ArrowSide::None);
        assert!(!view.has_previous);
        assert!(!view.is_last);

        controller.next(&mut surface);
        let view = controller.view(&surface).unwrap();
        let target = surface.bounding_rect(controller.session.as_ref().unwrap().tracker.element().unwrap()).unwrap();
        let spotlight = view.spotlight.unwrap();
        assert!(spotlight.top < target.top && spotlight.bottom() > target.bottom());
        // every button rect sits inside the tooltip
        for (_, rect) in &view.buttons {
            assert!(rect.top >= view.tooltip.top);
            assert!(rect.bottom() <= view.tooltip.bottom() + 1e-9);
            assert!(rect.left >= view.tooltip.left);
            assert!(rect.right() <= view.tooltip.right() + 1e-9);
        }
        assert!(view.has_previous);
        assert_eq!(view.step_index, 1);
        assert_eq!(view.step_count, 3);
    }

    #[test]
    fn test_pointer_suppression_and_activation() {
        let (mut controller, mut surface) = open_controller();
        // outside the tooltip entirely: swallowed
        let response = controller.pointer_down(Point::new(0.5, 0.5), &mut surface);
        assert_eq!(response, PointerResponse::Swallowed);
        assert_eq!(controller.progress(), Some((0, 3)));

        // on the Next button: advances
        let view = controller.view(&surface).unwrap();
        let (_, next_rect) = *view
            .buttons
            .iter()
            .find(|(b, _)| *b == TourButton::Next)
            .unwrap();
        let response = controller.pointer_down(next_rect.center(), &mut surface);
        assert!(matches!(
            response,
            PointerResponse::Activated {
                button: TourButton::Next,
                ..
            }
        ));
        assert_eq!(controller.progress(), Some((1, 3)));

        // closed: passes through
        controller.skip();
        let response = controller.pointer_down(Point::new(0.5, 0.5), &mut surface);
        assert_eq!(response, PointerResponse::PassThrough);
    }

    #[test]
    fn test_degrades_to_centered_when_target_vanishes_before_tracking() {
        // The element passes resolution, then disappears before the next
        // step begins tracking it.
        let (mut controller, mut surface) = open_controller();
        surface.remove_by_token("#map-panel");
        controller.next(&mut surface);
        assert_eq!(controller.current_step().unwrap().title, "map");
        assert_eq!(controller.target_rect(), None);
        let view = controller.view(&surface).unwrap();
        assert!(view.spotlight.is_none());
        assert_eq!(view.arrow, ArrowSide::None);
    }

    #[test]
    fn test_settle_timer_flows_through_controller() {
        let (mut controller, mut surface) = open_controller();
        // advance to the map step, which has a target
        let timer = controller.next(&mut surface).unwrap();
        assert!(controller.settle_elapsed(timer.token, &surface));
        // after another navigation the old token is stale
        let _ = controller.previous(&mut surface);
        assert!(!controller.settle_elapsed(timer.token, &surface));
    }
}
