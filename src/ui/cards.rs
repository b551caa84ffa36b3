//! Catalogue card list rendering.
//!
//! Displays a scrollable list of food cards with star controls and a submit
//! button on each.

use crate::app::App;
use crate::ui::{CardHit, HitTarget, SUBMIT_LABEL, contains, star_at, star_spans};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

/// Lines per card: name, description, details, stars, submit row, separator.
pub const CARD_HEIGHT: u16 = 6;

/// Line of a card holding the stars.
const STAR_LINE: u16 = 3;

/// Line of a card holding the submit button.
const SUBMIT_LINE: u16 = 4;

/// First card shown so that the selection stays centered.
///
/// # Arguments
/// * `selected` - Selected card position
/// * `len` - Number of cards
/// * `visible` - Cards that fit in the list area
pub fn scroll_offset(selected: usize, len: usize, visible: usize) -> usize {
    let center_offset = visible / 2;
    let offset = selected.saturating_sub(center_offset);
    offset.min(len.saturating_sub(visible))
}

fn visible_cards(area: Rect) -> usize {
    // Account for borders
    (area.height.saturating_sub(2) / CARD_HEIGHT).max(1) as usize
}

/// Render the catalogue card list.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Each card shows:
/// - Line 1: name and price (bold), plus a marker when it cannot be rated
/// - Line 2: description
/// - Line 3: category and image URL
/// - Line 4: star control
/// - Line 5: submit button and saved rating
/// - Line 6: separator
pub fn render_cards(app: &App, area: Rect, buf: &mut Buffer) {
    let catalogue = &app.catalogue;
    let len = catalogue.filtered_len();
    let title = format!("Foods ({}/{})", len, catalogue.items().len());

    if len == 0 {
        let message = if app.loading {
            "Loading catalogue..."
        } else {
            "No foods to display"
        };
        let list = List::new(vec![ListItem::new(message)])
            .block(Block::default().title(title).borders(Borders::ALL));
        Widget::render(list, area, buf);
        return;
    }

    let selected_index = app.selected_index.min(len - 1);
    let visible = visible_cards(area);
    let offset = scroll_offset(selected_index, len, visible);

    let separator_width = area.width.saturating_sub(2).max(10) as usize;
    let separator_line = "─".repeat(separator_width);

    let items: Vec<ListItem> = catalogue
        .filtered()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(position, item)| {
            let is_selected = position == selected_index;
            let stars = catalogue.stars(position).copied().unwrap_or_default();
            let saved = catalogue.saved_rating(item);

            let name_style = Style::default()
                .fg(if is_selected { Color::Yellow } else { Color::White })
                .add_modifier(Modifier::BOLD);
            let mut line1 = vec![
                Span::styled(item.name.clone(), name_style),
                Span::styled(format!("  {}", item.price_label()), Style::default().fg(Color::Red)),
            ];
            if !item.has_identifier() {
                line1.push(Span::styled(" [unratable]", Style::default().fg(Color::DarkGray)));
            }

            let line2 = Line::from(Span::styled(item.text.clone(), Style::default().fg(Color::Gray)));
            let line3 = Line::from(vec![
                Span::styled(format!("{}  ", item.kind), Style::default().fg(Color::Cyan)),
                Span::styled(item.image_url(&app.base_url), Style::default().fg(Color::DarkGray)),
            ]);
            let line4 = Line::from(star_spans(stars.active()));
            let line5 = Line::from(vec![
                Span::styled(
                    SUBMIT_LABEL,
                    Style::default().fg(Color::White).bg(Color::Red),
                ),
                Span::styled(format!("  Saved: {} / 5", saved), Style::default().fg(Color::Gray)),
            ]);

            let separator_style = if is_selected {
                Style::default().fg(Color::Blue)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let separator = Line::from(Span::styled(separator_line.clone(), separator_style));

            ListItem::new(vec![Line::from(line1), line2, line3, line4, line5, separator])
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index - offset));

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::Black).add_modifier(Modifier::BOLD));

    StatefulWidget::render(list, area, buf, &mut list_state);
}

/// Map a mouse position inside the card list onto a card.
pub fn hit_test(app: &App, area: Rect, column: u16, row: u16) -> Option<CardHit> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if !contains(inner, column, row) {
        return None;
    }

    let len = app.catalogue.filtered_len();
    if len == 0 {
        return None;
    }
    let selected_index = app.selected_index.min(len - 1);
    let offset = scroll_offset(selected_index, len, visible_cards(area));

    let relative_row = row - inner.y;
    let position = offset + (relative_row / CARD_HEIGHT) as usize;
    if position >= len {
        return None;
    }

    let column_offset = column - inner.x;
    let target = match relative_row % CARD_HEIGHT {
        STAR_LINE => star_at(column_offset).map_or(HitTarget::Card, HitTarget::Star),
        SUBMIT_LINE if usize::from(column_offset) < SUBMIT_LABEL.len() => HitTarget::Submit,
        _ => HitTarget::Card,
    };

    Some(CardHit { position, target })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset_centers_selection() {
        assert_eq!(scroll_offset(0, 10, 4), 0);
        assert_eq!(scroll_offset(1, 10, 4), 0);
        assert_eq!(scroll_offset(5, 10, 4), 3);
        assert_eq!(scroll_offset(9, 10, 4), 6);
        assert_eq!(scroll_offset(2, 3, 4), 0);
    }

    #[test]
    fn test_hit_test_maps_stars_and_submit() {
        use crate::app::{Action, App};
        use crate::catalogue::{Catalogue, Item};
        use crate::demo::RatingDemo;
        use crate::ratings::{CARD_RATINGS_KEY, ITEM_RATINGS_KEY, RatingStore};
        use crate::storage::FileStore;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        let mut app = App::new(
            Catalogue::new(RatingStore::load(store.clone(), ITEM_RATINGS_KEY)),
            RatingDemo::new(RatingStore::load(store, CARD_RATINGS_KEY)),
            Vec::new(),
            "http://localhost:9000".to_string(),
        );
        let items = (1..=3)
            .map(|i| Item {
                id: i.to_string(),
                name: format!("Food {}", i),
                ..Item::default()
            })
            .collect();
        app.dispatch(Action::ItemsLoaded(items));

        // Room for three cards inside the border.
        let area = Rect::new(0, 10, 40, 2 + CARD_HEIGHT * 3);
        let second_card = 11 + CARD_HEIGHT;

        assert_eq!(hit_test(&app, area, 0, 12), None);
        assert_eq!(
            hit_test(&app, area, 1, second_card + STAR_LINE),
            Some(CardHit { position: 1, target: HitTarget::Star(1) })
        );
        assert_eq!(
            hit_test(&app, area, 5, second_card + STAR_LINE),
            Some(CardHit { position: 1, target: HitTarget::Star(3) })
        );
        assert_eq!(
            hit_test(&app, area, 3, 11 + SUBMIT_LINE),
            Some(CardHit { position: 0, target: HitTarget::Submit })
        );
        assert_eq!(
            hit_test(&app, area, 20, 11),
            Some(CardHit { position: 0, target: HitTarget::Card })
        );
    }

    #[test]
    fn test_hover_keeps_card_under_stationary_pointer() {
        use crate::app::{Action, App};
        use crate::catalogue::{Catalogue, Item};
        use crate::demo::RatingDemo;
        use crate::ratings::{CARD_RATINGS_KEY, ITEM_RATINGS_KEY, RatingStore};
        use crate::storage::FileStore;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        let mut app = App::new(
            Catalogue::new(RatingStore::load(store.clone(), ITEM_RATINGS_KEY)),
            RatingDemo::new(RatingStore::load(store, CARD_RATINGS_KEY)),
            Vec::new(),
            "http://localhost:9000".to_string(),
        );
        let items = (1..=10)
            .map(|i| Item {
                id: i.to_string(),
                name: format!("Food {}", i),
                ..Item::default()
            })
            .collect();
        app.dispatch(Action::ItemsLoaded(items));

        // Four cards fit; the pointer rests on the first star of the fourth.
        let area = Rect::new(0, 0, 40, 2 + CARD_HEIGHT * 4);
        let (column, row) = (1, 1 + CARD_HEIGHT * 3 + STAR_LINE);

        let mut positions = Vec::new();
        for _ in 0..4 {
            let hit = hit_test(&app, area, column, row).unwrap();
            let HitTarget::Star(star) = hit.target else {
                panic!("expected a star, got {:?}", hit.target);
            };
            positions.push(hit.position);
            app.dispatch(Action::HoverCardStar { position: hit.position, star });
        }

        assert_eq!(positions, vec![3, 3, 3, 3]);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.catalogue.stars(3).unwrap().hovered(), Some(1));
        assert_eq!(app.catalogue.stars(0).unwrap().hovered(), None);

        app.dispatch(Action::LeaveStars);
        assert_eq!(app.catalogue.stars(3).unwrap().hovered(), None);
    }

    #[test]
    fn test_visible_cards_at_least_one() {
        assert_eq!(visible_cards(Rect::new(0, 0, 40, 3)), 1);
        assert_eq!(visible_cards(Rect::new(0, 0, 40, 2 + CARD_HEIGHT * 3)), 3);
    }
}
