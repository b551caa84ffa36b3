//! UI components module.
//!
//! Contains ratatui widgets for both screens plus the shared screen layout
//! used to map mouse positions back onto cards and stars.

pub mod cards;
pub mod categories;
pub mod demo;
pub mod search;
pub mod summary;
pub mod tabs;

pub use cards::render_cards;
pub use categories::render_categories;
pub use demo::render_demo;
pub use search::render_search;
pub use summary::render_summary;
pub use tabs::render_tabs;

use crate::app::{App, Tab, UiMode};
use crate::ratings::MAX_STARS;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Label of the per-card submit button.
pub const SUBMIT_LABEL: &str = "[ Submit ]";

/// Areas of one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Tab bar
    pub tabs: Rect,
    /// Search bar (catalogue only)
    pub search: Rect,
    /// Category buttons (catalogue only)
    pub categories: Rect,
    /// Card list or demo grid
    pub body: Rect,
    /// Ratings summary
    pub summary: Rect,
    /// Status line
    pub status: Rect,
}

impl ScreenLayout {
    /// Split `area` for the given screen.
    pub fn new(area: Rect, tab: Tab) -> Self {
        match tab {
            Tab::Catalogue => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3), // Tabs
                        Constraint::Length(3), // Search bar
                        Constraint::Length(3), // Categories
                        Constraint::Min(0),    // Cards
                        Constraint::Length(3), // Summary
                        Constraint::Length(1), // Status bar
                    ])
                    .split(area);
                Self {
                    tabs: chunks[0],
                    search: chunks[1],
                    categories: chunks[2],
                    body: chunks[3],
                    summary: chunks[4],
                    status: chunks[5],
                }
            }
            Tab::Demo => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3), // Tabs
                        Constraint::Min(0),    // Card grid
                        Constraint::Length(5), // Summary
                        Constraint::Length(1), // Status bar
                    ])
                    .split(area);
                Self {
                    tabs: chunks[0],
                    body: chunks[1],
                    summary: chunks[2],
                    status: chunks[3],
                    ..Self::default()
                }
            }
        }
    }
}

/// Part of a card under the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Somewhere on the card
    Card,
    /// Star at this position (1..=5)
    Star(u8),
    /// The submit button
    Submit,
}

/// Card position (in the current screen's order) and the part that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHit {
    /// Card position
    pub position: usize,
    /// What was hit
    pub target: HitTarget,
}

/// Render the complete UI and return the layout that was used.
pub fn render_ui(f: &mut Frame, app: &App) -> ScreenLayout {
    let layout = ScreenLayout::new(f.area(), app.tab);

    render_tabs(app, layout.tabs, f.buffer_mut());
    match app.tab {
        Tab::Catalogue => {
            render_search(app, layout.search, f.buffer_mut());
            render_categories(app, layout.categories, f.buffer_mut());
            render_cards(app, layout.body, f.buffer_mut());
        }
        Tab::Demo => render_demo(app, layout.body, f.buffer_mut()),
    }
    render_summary(app, layout.summary, f.buffer_mut());

    let status_text = app.status_message.as_deref().unwrap_or(match app.mode {
        UiMode::List => {
            "q quit | Tab switch screen | ↑↓ select | 1-5/←→/Space rate | Enter submit | / search | c categories"
        }
        UiMode::Search => "Type to search | Enter/Esc done",
        UiMode::Categories => "←→ choose | Enter apply | Esc cancel",
    });
    let status = Paragraph::new(Line::from(status_text)).style(Style::default().fg(Color::Gray));
    f.render_widget(status, layout.status);

    layout
}

/// Map a mouse position onto a card of the active screen.
pub fn hit_test(app: &App, layout: &ScreenLayout, column: u16, row: u16) -> Option<CardHit> {
    match app.tab {
        Tab::Catalogue => cards::hit_test(app, layout.body, column, row),
        Tab::Demo => demo::hit_test(layout.body, column, row),
    }
}

/// Star row spans: filled stars yellow, empty ones gray, one column apart.
pub(crate) fn star_spans(active: u8) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(usize::from(MAX_STARS) * 2);
    for position in 1..=MAX_STARS {
        if position > 1 {
            spans.push(Span::raw(" "));
        }
        spans.push(if position <= active {
            Span::styled("★", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("☆", Style::default().fg(Color::Gray))
        });
    }
    spans
}

/// Star under a column offset from the start of a star row.
pub(crate) fn star_at(offset: u16) -> Option<u8> {
    let position = offset / 2 + 1;
    (offset < u16::from(MAX_STARS) * 2 - 1 && offset % 2 == 0).then_some(position as u8)
}

/// Whether `(column, row)` lies inside `area`.
pub(crate) fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
