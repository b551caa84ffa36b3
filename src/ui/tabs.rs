//! Tabs widget rendering.
//!
//! Displays tab headers for switching between the two screens.

use crate::app::{App, Tab};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the tabs widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Displays both screens horizontally and highlights the active one.
pub fn render_tabs(app: &App, area: Rect, buf: &mut Buffer) {
    let tabs = [("Catalogue", Tab::Catalogue), ("Rating Demo", Tab::Demo)];

    let mut spans = Vec::new();
    for (i, (label, tab)) in tabs.iter().enumerate() {
        let is_active = *tab == app.tab;
        let style = if is_active {
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }

        let tab_text = if is_active {
            format!("▶ {} ◀", label)
        } else {
            format!("  {}  ", label)
        };
        spans.push(Span::styled(tab_text, style));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title("Foody (Tab to switch)").borders(Borders::ALL))
        .alignment(Alignment::Center);

    Widget::render(paragraph, area, buf);
}
