//! Pixel-space geometry shared by the tracker, layout engine, and overlay.
//!
//! Everything is f64 so hosts with fractional coordinates (smooth-scrolled
//! documents) and hosts with integer cells (the terminal demo) both fit.

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a viewport or tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned bounding box in top/left/width/height form, matching the
/// shape a host reports for element geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// An element measuring 0 in either axis is not visibly rendered.
    #[must_use]
    pub fn is_zero_area(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }

    /// Grows the rect by `margin` on every side (used for the spotlight).
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            top: self.top - margin,
            left: self.left - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }
}

/// Clamps `value` into `[min, max]`. When the range is degenerate (a tooltip
/// wider than the viewport) the lower bound wins so the top-left stays
/// visible.
#[must_use]
pub fn clamp_span(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
