//! Category buttons rendering.

use crate::app::{ActiveFilter, App, UiMode};
use crate::catalogue::ALL_CATEGORIES;
use crate::ui::contains;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Columns between two buttons.
const GAP: u16 = 1;

fn button_label(category: &str) -> String {
    format!(" {} ", category)
}

/// Render the category buttons.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// The category that produced the current view is drawn red, the cursor is
/// highlighted while choosing.
pub fn render_categories(app: &App, area: Rect, buf: &mut Buffer) {
    let is_active = app.mode == UiMode::Categories;
    let applied = match &app.active_filter {
        ActiveFilter::Category(category) => Some(category.as_str()),
        ActiveFilter::None => Some(ALL_CATEGORIES),
        ActiveFilter::Search(_) => None,
    };

    let mut spans = Vec::new();
    for (index, category) in app.categories.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" ".repeat(GAP as usize)));
        }

        let mut style = if applied == Some(category.as_str()) {
            Style::default().fg(Color::White).bg(Color::Red)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };
        if is_active && index == app.category_cursor {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(button_label(category), style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(if is_active {
                "Categories (ACTIVE - ←→ choose, Enter apply)"
            } else {
                "Categories (press 'c')"
            })
            .borders(Borders::ALL)
            .style(if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );

    Widget::render(paragraph, area, buf);
}

/// Map a mouse position onto a category button.
pub fn hit_test(app: &App, area: Rect, column: u16, row: u16) -> Option<usize> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if !contains(inner, column, row) {
        return None;
    }

    let mut start = inner.x;
    for (index, category) in app.categories.iter().enumerate() {
        let width = button_label(category).chars().count() as u16;
        if column >= start && column < start + width {
            return Some(index);
        }
        start += width + GAP;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_label_padding() {
        assert_eq!(button_label("Lunch"), " Lunch ");
    }
}
