//! The demo dashboard's pages, and the region table that doubles as the
//! tour's addressable element registry.
//!
//! Every visible panel is a [`Region`] with selector tokens; the app upserts
//! the laid-out rects into its [`fieldguide::StaticSurface`] each frame, so
//! the authored catalog selectors resolve against what is actually on
//! screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Surveys,
    Settings,
}

impl Page {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Surveys => "surveys",
            Self::Settings => "settings",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "overview" => Some(Self::Overview),
            "surveys" => Some(Self::Surveys),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewTab {
    Map,
    Species,
    Trends,
}

impl OverviewTab {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Species => "species",
            Self::Trends => "trends",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Map => Self::Species,
            Self::Species => Self::Trends,
            Self::Trends => Self::Map,
        }
    }
}

/// Everything the page renderer and region layout need from the app.
#[derive(Debug, Clone, Copy)]
pub struct DemoState {
    pub page: Page,
    pub overview_tab: OverviewTab,
    pub selected_survey: Option<usize>,
    pub trend_has_data: bool,
    pub tour_seen: bool,
}

/// One addressable screen region. The first token is the primary selector
/// (id-stable across frames in the surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    PageTabs,
    FilterPanel,
    MapPanel,
    SpeciesToolbar,
    ExportButton,
    SpeciesTable,
    TrendChart,
    SurveyList,
    SurveyDetail,
    SettingsForm,
    SaveButton,
    StatusBar,
}

impl Region {
    pub const ALL: [Self; 12] = [
        Self::PageTabs,
        Self::FilterPanel,
        Self::MapPanel,
        Self::SpeciesToolbar,
        Self::ExportButton,
        Self::SpeciesTable,
        Self::TrendChart,
        Self::SurveyList,
        Self::SurveyDetail,
        Self::SettingsForm,
        Self::SaveButton,
        Self::StatusBar,
    ];

    #[must_use]
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            Self::PageTabs => &["#page-tabs"],
            Self::FilterPanel => &["#filter-panel", ".filter-panel"],
            Self::MapPanel => &["#map-panel"],
            Self::SpeciesToolbar => &["#species-toolbar"],
            Self::ExportButton => &["#export-button"],
            Self::SpeciesTable => &[".species-table"],
            Self::TrendChart => &["#trend-chart"],
            Self::SurveyList => &["#survey-list"],
            Self::SurveyDetail => &[".survey-detail"],
            Self::SettingsForm => &["#settings-form"],
            Self::SaveButton => &["#save-button"],
            Self::StatusBar => &["#status-bar"],
        }
    }
}

pub const SPECIES: &[(&str, u16, &str)] = &[
    ("Great Tit", 128, "2026-08-27"),
    ("Eurasian Blackbird", 97, "2026-08-28"),
    ("Common Chaffinch", 84, "2026-08-25"),
    ("European Robin", 61, "2026-08-28"),
    ("Barn Swallow", 44, "2026-08-21"),
    ("Common Kingfisher", 6, "2026-08-14"),
];

pub const SURVEYS: &[(&str, &str)] = &[
    (
        "Morning transect - riverbank",
        "Route: river path, 3.2 km\nWeather: clear, 14 C\nObserver: M. Kovacs\nObservations: 42",
    ),
    (
        "Evening point count - heath",
        "Route: 6 fixed points\nWeather: overcast, light wind\nObserver: A. Lindqvist\nObservations: 17",
    ),
    (
        "Wetland survey - north hide",
        "Route: stationary\nWeather: drizzle\nObserver: M. Kovacs\nObservations: 28",
    ),
];

/// Computes the rects for every region visible in the given state. Order is
/// stable per page so surface ids stay stable across frames.
#[must_use]
pub fn layout(area: Rect, state: &DemoState) -> Vec<(Region, Rect)> {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // page/tab bar
            Constraint::Min(5),    // page body
            Constraint::Length(1), // status bar
        ])
        .split(area);

    let mut regions = vec![(Region::PageTabs, rows[0])];
    let main = rows[1];

    match state.page {
        Page::Overview => match state.overview_tab {
            OverviewTab::Map => {
                let cols = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(28), Constraint::Min(20)])
                    .split(main);
                regions.push((Region::FilterPanel, cols[0]));
                regions.push((Region::MapPanel, cols[1]));
            }
            OverviewTab::Species => {
                let split = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(3), Constraint::Min(3)])
                    .split(main);
                let toolbar = split[0];
                regions.push((Region::SpeciesToolbar, toolbar));
                let export_w = 16u16.min(toolbar.width);
                let export = Rect::new(
                    toolbar.x + toolbar.width - export_w,
                    toolbar.y,
                    export_w,
                    toolbar.height,
                );
                regions.push((Region::ExportButton, export));
                regions.push((Region::SpeciesTable, split[1]));
            }
            OverviewTab::Trends => {
                if state.trend_has_data {
                    regions.push((Region::TrendChart, main));
                }
            }
        },
        Page::Surveys => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(main);
            regions.push((Region::SurveyList, cols[0]));
            if state.selected_survey.is_some() {
                regions.push((Region::SurveyDetail, cols[1]));
            }
        }
        Page::Settings => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(3)])
                .split(main);
            regions.push((Region::SettingsForm, split[0]));
            let save_w = 12u16.min(split[1].width);
            let save = Rect::new(
                split[1].x + (split[1].width - save_w) / 2,
                split[1].y,
                save_w,
                split[1].height,
            );
            regions.push((Region::SaveButton, save));
        }
    }

    regions.push((Region::StatusBar, rows[2]));
    regions
}

pub fn render(frame: &mut Frame, regions: &[(Region, Rect)], state: &DemoState) {
    for &(region, rect) in regions {
        render_region(frame, region, rect, state);
    }
    // Empty state for the trends tab: the chart region is absent entirely,
    // which is what the tour's conditional step keys off.
    if state.page == Page::Overview
        && state.overview_tab == OverviewTab::Trends
        && !state.trend_has_data
    {
        if let Some(&(_, tabs_rect)) = regions.iter().find(|(r, _)| *r == Region::PageTabs) {
            let body = Rect::new(
                tabs_rect.x,
                tabs_rect.y + tabs_rect.height,
                tabs_rect.width,
                frame.area().height.saturating_sub(tabs_rect.height + 1),
            );
            let hint = Paragraph::new("No trend data yet. Press d to load a demo season.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title("Trends"));
            frame.render_widget(hint, body);
        }
    }
}

fn render_region(frame: &mut Frame, region: Region, rect: Rect, state: &DemoState) {
    match region {
        Region::PageTabs => render_tabs(frame, rect, state),
        Region::StatusBar => render_status(frame, rect, state),
        Region::FilterPanel => {
            let lines = vec![
                Line::from("Species: all"),
                Line::from("From:    2026-05-01"),
                Line::from("To:      2026-08-30"),
                Line::from("Observer: any"),
            ];
            let panel = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Filters"));
            frame.render_widget(panel, rect);
        }
        Region::MapPanel => {
            let markers = vec![
                Line::from("       x        x       "),
                Line::from("   x        ~~~~~~      "),
                Line::from("       ~~~~~~   x   x   "),
                Line::from("  x   ~~~          x    "),
                Line::from("     x       x          "),
            ];
            let map = Paragraph::new(markers)
                .block(Block::default().borders(Borders::ALL).title("Observation map"));
            frame.render_widget(map, rect);
        }
        Region::SpeciesToolbar => {
            let toolbar = Block::default().borders(Borders::ALL).title("Species");
            frame.render_widget(toolbar, rect);
        }
        Region::ExportButton => {
            let button = Paragraph::new(Line::from(Span::styled(
                "[ Export CSV ]",
                Style::default().fg(Color::Cyan),
            )))
            .centered();
            let inner = Rect::new(rect.x, rect.y + rect.height / 2, rect.width, 1);
            frame.render_widget(button, inner);
        }
        Region::SpeciesTable => {
            let items: Vec<ListItem> = SPECIES
                .iter()
                .map(|(name, count, last_seen)| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{name:<22}"), Style::default().fg(Color::White)),
                        Span::styled(format!("{count:>5}  "), Style::default().fg(Color::Yellow)),
                        Span::styled(*last_seen, Style::default().fg(Color::DarkGray)),
                    ]))
                })
                .collect();
            let table = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Counts"));
            frame.render_widget(table, rect);
        }
        Region::TrendChart => {
            let chart = Paragraph::new(vec![
                Line::from("obs/week"),
                Line::from("  ▂▃▅▇▆▅▃▂▁▂▄▆▇▅▃"),
                Line::from("  May    Jun    Jul    Aug"),
            ])
            .block(Block::default().borders(Borders::ALL).title("Seasonal trends"));
            frame.render_widget(chart, rect);
        }
        Region::SurveyList => {
            let items: Vec<ListItem> = SURVEYS
                .iter()
                .enumerate()
                .map(|(i, (name, _))| {
                    let style = if state.selected_survey == Some(i) {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    ListItem::new(Span::styled(*name, style))
                })
                .collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Survey runs"));
            frame.render_widget(list, rect);
        }
        Region::SurveyDetail => {
            let detail = state
                .selected_survey
                .and_then(|i| SURVEYS.get(i))
                .map_or("", |(_, detail)| *detail);
            let panel = Paragraph::new(detail)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title("Run detail"));
            frame.render_widget(panel, rect);
        }
        Region::SettingsForm => {
            let lines = vec![
                Line::from("Region:         Uppland"),
                Line::from("Units:          metric"),
                Line::from("Notifications:  weekly digest"),
                Line::from("Map layer:      terrain"),
            ];
            let form = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Preferences"));
            frame.render_widget(form, rect);
        }
        Region::SaveButton => {
            let button = Paragraph::new(Line::from(Span::styled(
                "[ Save ]",
                Style::default().fg(Color::Green),
            )))
            .centered();
            let inner = Rect::new(rect.x, rect.y + rect.height / 2, rect.width, 1);
            frame.render_widget(button, inner);
        }
    }
}

fn render_tabs(frame: &mut Frame, rect: Rect, state: &DemoState) {
    let page_span = |page: Page, key: &'static str, label: &'static str| {
        let style = if state.page == page {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        vec![
            Span::styled(format!("{key} "), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{label}  "), style),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(page_span(Page::Overview, "1", "Overview"));
    spans.extend(page_span(Page::Surveys, "2", "Surveys"));
    spans.extend(page_span(Page::Settings, "3", "Settings"));

    if state.page == Page::Overview {
        spans.push(Span::styled("| ", Style::default().fg(Color::DarkGray)));
        for tab in [OverviewTab::Map, OverviewTab::Species, OverviewTab::Trends] {
            let style = if state.overview_tab == tab {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!("{}  ", tab.id()), style));
        }
    }

    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Field Survey"));
    frame.render_widget(bar, rect);
}

fn render_status(frame: &mut Frame, rect: Rect, state: &DemoState) {
    let seen = if state.tour_seen { "tour seen" } else { "g starts the tour" };
    let status = Line::from(vec![
        Span::styled(
            "q quit  1/2/3 pages  Tab views  Enter select  d demo data  ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(seen, Style::default().fg(Color::Green)),
    ]);
    frame.render_widget(Paragraph::new(status), rect);
}
