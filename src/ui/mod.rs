//! Terminal UI for the demo host: page rendering, the tour overlay, and
//! terminal lifecycle.

pub mod overlay;
pub mod pages;

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use fieldguide::geometry;

/// Widens a cell rect to the engine's f64 pixel space (1 cell = 1 unit).
#[must_use]
pub fn to_engine_rect(rect: ratatui::layout::Rect) -> geometry::Rect {
    geometry::Rect::new(
        f64::from(rect.y),
        f64::from(rect.x),
        f64::from(rect.width),
        f64::from(rect.height),
    )
}

/// Rounds an engine rect back to cells, clipped to `bounds`.
#[must_use]
pub fn to_cell_rect(rect: geometry::Rect, bounds: ratatui::layout::Rect) -> ratatui::layout::Rect {
    let left = rect.left.max(0.0) as u16;
    let top = rect.top.max(0.0) as u16;
    let width = rect.width.max(0.0).round() as u16;
    let height = rect.height.max(0.0).round() as u16;
    ratatui::layout::Rect::new(left, top, width, height).intersection(bounds)
}

/// RAII guard that puts the terminal into TUI mode and restores it on drop,
/// including through panics (a panic hook restores first so the message is
/// readable).
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            Self::restore();
            previous_hook(info);
        }));
        Ok(Self)
    }

    fn restore() {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
        let _ = io::stdout().flush();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Self::restore();
    }
}
