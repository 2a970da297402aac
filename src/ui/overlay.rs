//! Draws the tour overlay on top of a rendered page: dimming layer,
//! spotlight cut-out, tooltip, controls, and the arrow glyph.

use ratatui::{
    layout::Rect as CellRect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use fieldguide::{ArrowSide, OverlayView, TourButton};

use super::to_cell_rect;

pub fn render(frame: &mut Frame, view: &OverlayView) {
    let area = frame.area();
    let spotlight = view.spotlight.map(|r| to_cell_rect(r, area));
    dim_background(frame, spotlight);

    if let Some(spot) = spotlight {
        if spot.width > 1 && spot.height > 1 {
            let ring = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow));
            frame.render_widget(ring, spot);
        }
    }

    let tooltip = to_cell_rect(view.tooltip, area);
    if tooltip.width < 8 || tooltip.height < 4 {
        return;
    }
    frame.render_widget(Clear, tooltip);
    let frame_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", view.title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    let inner = frame_block.inner(tooltip);
    frame.render_widget(frame_block, tooltip);

    render_body(frame, inner, view);
    render_buttons(frame, area, view);
    render_arrow(frame, area, tooltip, view);
}

/// Dims every cell outside the spotlight.
fn dim_background(frame: &mut Frame, spotlight: Option<CellRect>) {
    let area = frame.area();
    let buf = frame.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let in_spotlight = spotlight.is_some_and(|spot| {
                x >= spot.left() && x < spot.right() && y >= spot.top() && y < spot.bottom()
            });
            if !in_spotlight {
                buf[(x, y)].set_style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::DIM),
                );
            }
        }
    }
}

fn render_body(frame: &mut Frame, inner: CellRect, view: &OverlayView) {
    if inner.height < 2 {
        return;
    }
    // bottom row of the inner area belongs to the buttons
    let body = CellRect::new(
        inner.x,
        inner.y,
        inner.width,
        inner.height.saturating_sub(2),
    );
    let mut lines: Vec<Line> = view.content.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("step {} of {}", view.step_index + 1, view.step_count),
        Style::default().fg(Color::DarkGray),
    )));
    let text = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(text, body);
}

fn render_buttons(frame: &mut Frame, area: CellRect, view: &OverlayView) {
    for &(button, rect) in &view.buttons {
        let cell = to_cell_rect(rect, area);
        if cell.width == 0 || cell.height == 0 {
            continue;
        }
        let (label, color) = match button {
            TourButton::Skip => ("Skip", Color::DarkGray),
            TourButton::Previous => ("◀ Prev", Color::Gray),
            TourButton::Next => {
                if view.is_last {
                    ("Finish", Color::Green)
                } else {
                    ("Next ▶", Color::Cyan)
                }
            }
            TourButton::Close => ("✕", Color::Red),
        };
        let widget = Paragraph::new(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .centered();
        frame.render_widget(widget, cell);
    }
}

/// Places the arrow glyph one cell outside the tooltip edge, pointing at the
/// target.
fn render_arrow(frame: &mut Frame, area: CellRect, tooltip: CellRect, view: &OverlayView) {
    let offset = view.arrow_offset.round().max(0.0) as u16;
    let (glyph, x, y) = match view.arrow {
        ArrowSide::None => return,
        ArrowSide::Top => (
            "▲",
            tooltip.x + offset.min(tooltip.width.saturating_sub(1)),
            match tooltip.y.checked_sub(1) {
                Some(y) => y,
                None => return,
            },
        ),
        ArrowSide::Bottom => (
            "▼",
            tooltip.x + offset.min(tooltip.width.saturating_sub(1)),
            tooltip.bottom(),
        ),
        ArrowSide::Left => (
            "◀",
            match tooltip.x.checked_sub(1) {
                Some(x) => x,
                None => return,
            },
            tooltip.y + offset.min(tooltip.height.saturating_sub(1)),
        ),
        ArrowSide::Right => (
            "▶",
            tooltip.right(),
            tooltip.y + offset.min(tooltip.height.saturating_sub(1)),
        ),
    };
    if x >= area.right() || y >= area.bottom() {
        return;
    }
    let buf = frame.buffer_mut();
    buf[(x, y)]
        .set_symbol(glyph)
        .set_style(Style::default().fg(Color::Cyan));
}
