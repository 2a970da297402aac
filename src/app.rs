//! The terminal demo host: a small wildlife-survey dashboard with the
//! guided tour wired over it.
//!
//! Each frame the app re-lays-out the page, mirrors the visible regions into
//! a [`StaticSurface`], and lets the controller re-resolve geometry. Settle
//! timers come back from the controller as tokens; the app schedules them on
//! its own clock and fires them between frames.

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use fieldguide::{
    GuideConfig, GuideContext, PointerResponse, SettleToken, Size, StaticSurface, StepCatalog,
    TimingConfig, TooltipConfig, TourController,
};

use crate::ui::pages::{self, DemoState, OverviewTab, Page, Region};
use crate::ui::{self, overlay, TerminalGuard};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct App {
    controller: TourController,
    surface: StaticSurface,
    page: Page,
    overview_tab: OverviewTab,
    selected_survey: Option<usize>,
    trend_has_data: bool,
    tour_seen: Rc<Cell<bool>>,
    pending_settle: Option<(SettleToken, Instant)>,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(config: GuideConfig, start_page: &str) -> Self {
        let mut controller = TourController::new(StepCatalog::builtin().clone(), config);
        let tour_seen = Rc::new(Cell::new(false));
        let seen = Rc::clone(&tour_seen);
        controller.set_on_close(move |reason| {
            info!(?reason, "tour ended");
            seen.set(true);
        });
        Self {
            controller,
            surface: StaticSurface::default(),
            page: Page::from_id(start_page).unwrap_or(Page::Overview),
            overview_tab: OverviewTab::Map,
            selected_survey: None,
            trend_has_data: false,
            tour_seen,
            pending_settle: None,
            should_quit: false,
        }
    }

    /// Cell-sized tunables: in the terminal 1 unit = 1 cell, so the pixel
    /// defaults are three sizes too big.
    #[must_use]
    pub fn terminal_config() -> GuideConfig {
        GuideConfig {
            tooltip: TooltipConfig {
                width: 44.0,
                height: 12.0,
                screen_padding: 1.0,
                arrow_clearance: 1.0,
                arrow_inset: 4.0,
                spotlight_margin: 1.0,
            },
            timing: TimingConfig {
                settle_delay_ms: 150,
            },
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let _guard = TerminalGuard::new()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        while !self.should_quit {
            self.fire_due_settle();

            let area = terminal.get_frame().area();
            let state = self.demo_state();
            let regions = pages::layout(area, &state);
            self.sync_surface(area, &regions);
            self.push_context();
            self.controller.on_frame(&self.surface);

            terminal.draw(|frame| {
                pages::render(frame, &regions, &state);
                if let Some(view) = self.controller.view(&self.surface) {
                    overlay::render(frame, &view);
                }
            })?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(..) => {
                        self.controller.note_resize();
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn demo_state(&self) -> DemoState {
        DemoState {
            page: self.page,
            overview_tab: self.overview_tab,
            selected_survey: self.selected_survey,
            trend_has_data: self.trend_has_data,
            tour_seen: self.tour_seen.get(),
        }
    }

    /// Mirrors this frame's visible regions into the surface. Regions that
    /// disappeared are removed, so the tracker sees them as gone rather than
    /// frozen at their last rect.
    fn sync_surface(&mut self, area: ratatui::layout::Rect, regions: &[(Region, ratatui::layout::Rect)]) {
        self.surface
            .set_viewport(Size::new(f64::from(area.width), f64::from(area.height)));
        for candidate in Region::ALL {
            if !regions.iter().any(|(r, _)| *r == candidate) {
                for token in candidate.tokens() {
                    self.surface.remove_by_token(token);
                }
            }
        }
        for &(region, rect) in regions {
            self.surface
                .upsert(region.tokens(), ui::to_engine_rect(rect));
        }
        // Regions are always fully on screen, so scroll requests are moot;
        // drain them rather than letting them pile up over the session.
        self.surface.take_scroll_requests();
    }

    fn push_context(&mut self) {
        let mut context = GuideContext::page(self.page.id());
        if self.page == Page::Overview {
            context = context.with_tab("overview_tab", self.overview_tab.id());
        }
        let timer = self.controller.set_context(context, &mut self.surface);
        self.schedule_settle(timer);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.controller.is_open() {
            // The tour owns the keyboard; only tour navigation gets through.
            let timer = match key.code {
                KeyCode::Char('n') | KeyCode::Right | KeyCode::Enter => {
                    self.controller.next(&mut self.surface)
                }
                KeyCode::Char('p') | KeyCode::Left => self.controller.previous(&mut self.surface),
                KeyCode::Char('s') => {
                    self.controller.skip();
                    None
                }
                KeyCode::Esc => {
                    self.controller.dismiss();
                    None
                }
                _ => None,
            };
            self.schedule_settle(timer);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('g') => {
                let timer = self.controller.open(&mut self.surface);
                self.schedule_settle(timer);
            }
            KeyCode::Char('1') => self.page = Page::Overview,
            KeyCode::Char('2') => self.page = Page::Surveys,
            KeyCode::Char('3') => self.page = Page::Settings,
            KeyCode::Tab if self.page == Page::Overview => {
                self.overview_tab = self.overview_tab.next();
            }
            KeyCode::Enter if self.page == Page::Surveys => {
                let next = match self.selected_survey {
                    Some(i) => (i + 1) % pages::SURVEYS.len(),
                    None => 0,
                };
                self.selected_survey = Some(next);
            }
            KeyCode::Char('d') => self.trend_has_data = !self.trend_has_data,
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            if matches!(mouse.kind, MouseEventKind::ScrollUp | MouseEventKind::ScrollDown) {
                self.controller.note_scroll();
            }
            return;
        }
        let point = fieldguide::Point::new(f64::from(mouse.column), f64::from(mouse.row));
        match self.controller.pointer_down(point, &mut self.surface) {
            PointerResponse::Activated { timer, .. } => self.schedule_settle(timer),
            PointerResponse::Swallowed | PointerResponse::PassThrough => {}
        }
    }

    fn schedule_settle(&mut self, timer: Option<fieldguide::SettleTimer>) {
        if let Some(timer) = timer {
            self.pending_settle = Some((timer.token, Instant::now() + timer.delay));
        }
    }

    fn fire_due_settle(&mut self) {
        if let Some((token, due)) = self.pending_settle {
            if Instant::now() >= due {
                self.pending_settle = None;
                self.controller.settle_elapsed(token, &self.surface);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_config_is_cell_sized() {
        let config = App::terminal_config();
        assert!(config.tooltip.width < 80.0);
        assert!(config.tooltip.height < 24.0);
        assert_eq!(config.timing.settle_delay_ms, 150);
    }

    #[test]
    fn test_start_page_parsing_falls_back_to_overview() {
        let app = App::new(App::terminal_config(), "surveys");
        assert_eq!(app.page, Page::Surveys);
        let app = App::new(App::terminal_config(), "nonsense");
        assert_eq!(app.page, Page::Overview);
    }

    #[test]
    fn test_sync_surface_drains_scroll_requests() {
        let mut app = App::new(App::terminal_config(), "overview");
        let area = ratatui::layout::Rect::new(0, 0, 80, 24);
        let regions = pages::layout(area, &app.demo_state());
        app.sync_surface(area, &regions);
        app.push_context();
        app.controller.open(&mut app.surface);
        // advancing to a targeted step issues a scroll-into-view request
        app.controller.next(&mut app.surface);
        assert!(!app.surface.scroll_requests().is_empty());
        app.sync_surface(area, &regions);
        assert!(app.surface.scroll_requests().is_empty());
    }

    #[test]
    fn test_tour_seen_flips_on_close() {
        let mut app = App::new(App::terminal_config(), "overview");
        app.push_context();
        app.controller.open(&mut app.surface);
        assert!(!app.tour_seen.get());
        app.controller.skip();
        assert!(app.tour_seen.get());
    }
}
