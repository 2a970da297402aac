//! Fieldguide - an interactive on-screen guided-tour engine.
//!
//! The engine manages step sequencing, target resolution, viewport-aware
//! tooltip placement, and visibility-based step filtering over a host
//! document abstracted behind [`Surface`]. The host wires up events
//! (open/close, navigation, scroll, resize, context changes) and renders the
//! [`OverlayView`] the controller produces; the `fieldguide` binary is a
//! ratatui host doing exactly that over a small survey dashboard.
//!
//! Dataflow, leaves first: [`StepCatalog`] (authored content) →
//! [`resolver`] (visibility filtering) → [`tracker`] (locate + measure) →
//! [`layout`] (tooltip placement) → [`TourController`] (the state machine
//! composing them).

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod resolver;
pub mod surface;
pub mod tracker;

pub use catalog::{GuideContext, PageEntry, PositionHint, StepCatalog, StepDescriptor};
pub use config::{GuideConfig, TimingConfig, TooltipConfig};
pub use controller::{
    CloseReason, OverlayView, PointerResponse, TourButton, TourController,
};
pub use error::{CatalogError, SelectorError};
pub use geometry::{Point, Rect, Size};
pub use layout::{compute_position, ArrowSide, Placement};
pub use surface::{ElementId, StaticSurface, Surface};
pub use tracker::{SettleTimer, SettleToken, TargetTracker};
