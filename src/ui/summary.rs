//! Ratings summary rendering.

use crate::app::{App, Tab};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

fn stat(label: &str, value: String) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Cyan)),
        Span::styled(value, Style::default().fg(Color::White)),
    ]
}

/// Render the aggregate statistics of the active screen.
///
/// # Details
/// The catalogue shows everything on one line with a one-decimal average;
/// the demo lists its three figures with a two-decimal average.
pub fn render_summary(app: &App, area: Rect, buf: &mut Buffer) {
    let lines = match app.tab {
        Tab::Catalogue => {
            let summary = app.catalogue.summary();
            let mut spans = stat("Rated items", summary.rated_count.to_string());
            spans.push(Span::raw("  |  "));
            spans.extend(stat("Total stars", summary.total_stars.to_string()));
            spans.push(Span::raw("  |  "));
            spans.extend(stat("Average", format!("{} / 5", summary.average_rating())));
            vec![Line::from(spans)]
        }
        Tab::Demo => {
            let summary = app.demo.summary();
            vec![
                Line::from(stat("Total Stars Given", summary.total_stars.to_string())),
                Line::from(stat("Total Rated Cards", summary.rated_count.to_string())),
                Line::from(stat("Average Rating", format!("{} / 5", summary.average(2)))),
            ]
        }
    };

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title("Ratings Summary").borders(Borders::ALL));

    Widget::render(paragraph, area, buf);
}
