//! Target tracking for the current step: locate, scroll into view, and keep
//! the measured bounding box current while the guide is open.
//!
//! Two deferred mechanisms live here, both host-driven (the engine owns no
//! timers or threads):
//!
//! - the settle re-measure after a scroll-into-view request, carried by a
//!   [`SettleTimer`] the host schedules; a generation counter invalidates
//!   tokens from abandoned steps so a stale measurement can never land on a
//!   newer one;
//! - frame-coalesced recompute on scroll/resize: any number of raw
//!   notifications before the next frame collapse into a single pending
//!   flag, re-measured once when the host calls [`TargetTracker::on_frame`].

use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::StepDescriptor;
use crate::geometry::Rect;
use crate::surface::{ElementId, Surface};

/// Identifies one scheduled settle re-measure. Stale tokens are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleToken(u64);

/// A deferral request the host must schedule: call
/// [`TargetTracker::settle_elapsed`] with the token after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTimer {
    pub token: SettleToken,
    pub delay: Duration,
}

/// Tries each of the step's comma-separated selectors in order and returns
/// the first match. Malformed selectors are logged and skipped; a step with
/// no locatable target returns `None` (centered display, never an error).
pub fn locate<S: Surface + ?Sized>(step: &StepDescriptor, surface: &S) -> Option<ElementId> {
    for selector in step.selectors() {
        match surface.query(selector) {
            Ok(Some(id)) => return Some(id),
            Ok(None) => {}
            Err(err) => warn!(selector, %err, "skipping unparsable selector"),
        }
    }
    None
}

/// Tracks the current step's element and its last-measured bounding box.
#[derive(Debug)]
pub struct TargetTracker {
    settle_delay: Duration,
    element: Option<ElementId>,
    rect: Option<Rect>,
    /// Bumped on every step change/cancel; outstanding settle tokens carry
    /// the generation they were issued under.
    generation: u64,
    frame_pending: bool,
}

impl TargetTracker {
    #[must_use]
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            settle_delay,
            element: None,
            rect: None,
            generation: 0,
            frame_pending: false,
        }
    }

    /// Starts tracking `step`: cancels anything pending from the previous
    /// step, locates the target, requests a scroll-into-view, and takes a
    /// provisional measurement. Returns the settle timer the host must
    /// schedule, or `None` for a targetless/unlocatable step.
    pub fn begin_step<S: Surface + ?Sized>(
        &mut self,
        step: &StepDescriptor,
        surface: &mut S,
    ) -> Option<SettleTimer> {
        self.cancel_pending();
        self.element = None;
        self.rect = None;

        let id = locate(step, surface)?;
        self.element = Some(id);
        surface.scroll_into_view(id);
        // Provisional; the authoritative measurement happens post-settle.
        self.rect = surface.bounding_rect(id).filter(|r| !r.is_zero_area());
        debug!(element = id.raw(), "tracking target");
        Some(SettleTimer {
            token: SettleToken(self.generation),
            delay: self.settle_delay,
        })
    }

    /// The host's settle timer fired. Returns `false` (and does nothing) for
    /// a token from an abandoned step.
    pub fn settle_elapsed<S: Surface + ?Sized>(&mut self, token: SettleToken, surface: &S) -> bool {
        if token.0 != self.generation {
            debug!("ignoring stale settle timer");
            return false;
        }
        self.remeasure(surface);
        true
    }

    /// A scroll happened somewhere in the host. Returns `true` when a frame
    /// callback is newly needed (i.e. this is the first notification since
    /// the last frame).
    pub fn note_scroll(&mut self) -> bool {
        self.request_frame()
    }

    /// The viewport was resized. Same coalescing as [`Self::note_scroll`].
    pub fn note_resize(&mut self) -> bool {
        self.request_frame()
    }

    fn request_frame(&mut self) -> bool {
        if self.element.is_none() {
            return false;
        }
        let newly_needed = !self.frame_pending;
        self.frame_pending = true;
        newly_needed
    }

    /// Runs the coalesced recompute, at most once per rendered frame.
    /// Returns `true` if a re-measure actually happened.
    pub fn on_frame<S: Surface + ?Sized>(&mut self, surface: &S) -> bool {
        if !self.frame_pending {
            return false;
        }
        self.frame_pending = false;
        self.remeasure(surface);
        true
    }

    fn remeasure<S: Surface + ?Sized>(&mut self, surface: &S) {
        // A zero-area box mid-transition means "no rect", not a guess.
        self.rect = self
            .element
            .and_then(|id| surface.bounding_rect(id))
            .filter(|r| !r.is_zero_area());
    }

    /// Invalidates pending settle timers and frame requests.
    pub fn cancel_pending(&mut self) {
        self.generation += 1;
        self.frame_pending = false;
    }

    /// Stops tracking entirely.
    pub fn clear(&mut self) {
        self.cancel_pending();
        self.element = None;
        self.rect = None;
    }

    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Last-measured bounding box of the tracked element, if it is visibly
    /// rendered.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }
}
