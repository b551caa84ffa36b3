//! Rating demo grid rendering.
//!
//! Four fixed cards in a 2x2 grid, each with a star row and a submit button.

use crate::app::App;
use crate::demo::{CARD_COUNT, CARD_TITLES};
use crate::ui::{CardHit, HitTarget, SUBMIT_LABEL, contains, star_at, star_spans};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Line of a cell holding the stars.
const STAR_LINE: u16 = 0;

/// Line of a cell holding the submit button.
const SUBMIT_LINE: u16 = 1;

/// Areas of the four cards, row by row.
pub fn card_cells(area: Rect) -> [Rect; CARD_COUNT] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut cells = [Rect::default(); CARD_COUNT];
    for (row_index, row) in rows.iter().enumerate() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);
        for (column_index, cell) in columns.iter().enumerate() {
            cells[row_index * 2 + column_index] = *cell;
        }
    }
    cells
}

/// Render the demo grid.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
pub fn render_demo(app: &App, area: Rect, buf: &mut Buffer) {
    for (card, cell) in card_cells(area).into_iter().enumerate() {
        let is_focused = card == app.focused_card;
        let saved = app.demo.saved(card);
        let pending = app
            .demo
            .control(card)
            .map(|control| control.selected())
            .filter(|&selected| selected > 0 && selected != saved);

        let mut lines = vec![
            Line::from(star_spans(app.demo.active_level(card))),
            Line::from(vec![
                Span::styled(SUBMIT_LABEL, Style::default().fg(Color::White).bg(Color::Blue)),
                Span::styled(format!("  Saved: {} / 5", saved), Style::default().fg(Color::Gray)),
            ]),
        ];
        if let Some(selected) = pending {
            lines.push(Line::from(Span::styled(
                format!("Selected {} (not submitted)", selected),
                Style::default().fg(Color::DarkGray),
            )));
        }

        let border_style = if is_focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(CARD_TITLES[card])
                .borders(Borders::ALL)
                .border_style(border_style),
        );

        Widget::render(paragraph, cell, buf);
    }
}

/// Map a mouse position inside the grid onto a card.
pub fn hit_test(area: Rect, column: u16, row: u16) -> Option<CardHit> {
    let (position, cell) = card_cells(area)
        .into_iter()
        .enumerate()
        .find(|(_, cell)| contains(*cell, column, row))?;

    let inner = Block::default().borders(Borders::ALL).inner(cell);
    if !contains(inner, column, row) {
        return Some(CardHit { position, target: HitTarget::Card });
    }

    let column_offset = column - inner.x;
    let target = match row - inner.y {
        STAR_LINE => star_at(column_offset).map_or(HitTarget::Card, HitTarget::Star),
        SUBMIT_LINE if usize::from(column_offset) < SUBMIT_LABEL.len() => HitTarget::Submit,
        _ => HitTarget::Card,
    };
    Some(CardHit { position, target })
}
