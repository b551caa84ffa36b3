//! Application state management.
//!
//! Holds both screens, selection, search and category state, and applies the
//! [`Action`]s produced by the event loop.

use crate::catalogue::{ALL_CATEGORIES, Catalogue, Item};
use crate::demo::{CARD_COUNT, RatingDemo};
use crate::error::Result;
use std::cmp;

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Navigate cards and rate
    List,
    /// Typing into the search bar
    Search,
    /// Choosing a category button
    Categories,
}

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Fetched food catalogue
    Catalogue,
    /// Static four-card rating demo
    Demo,
}

/// Which filter produced the current catalogue view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveFilter {
    /// Nothing applied since the last fetch
    None,
    /// Category button
    Category(String),
    /// Search text
    Search(String),
}

/// State transitions requested by the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Toggle between the catalogue and the demo
    SwitchTab,
    /// Select the previous card
    MoveUp,
    /// Select the next card
    MoveDown,
    /// Select the card at this position of the current screen
    Select(usize),
    /// Start typing a search
    EnterSearch,
    /// Stop typing a search
    ExitSearch,
    /// Append to the search text
    SearchInput(char),
    /// Delete the last search character
    SearchBackspace,
    /// Start choosing a category
    EnterCategories,
    /// Stop choosing a category
    ExitCategories,
    /// Move the category cursor right
    CategoryNext,
    /// Move the category cursor left
    CategoryPrev,
    /// Filter by the category under the cursor
    ApplyCategory,
    /// Move the cursor to this category and filter by it
    ChooseCategory(usize),
    /// Hover a star of the card at this position without selecting it
    HoverCardStar {
        /// Card position on the current screen
        position: usize,
        /// Star position (1..=5)
        star: u8,
    },
    /// Move the hover one star right
    HoverNext,
    /// Move the hover one star left
    HoverPrev,
    /// Clear the hover of every card
    LeaveStars,
    /// Click a star of the selected card
    ClickStar(u8),
    /// Click the hovered star of the selected card
    ClickHovered,
    /// Submit the selected card's rating
    Submit,
    /// Catalogue fetch finished
    ItemsLoaded(Vec<Item>),
    /// Catalogue fetch failed
    FetchFailed(String),
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Active screen
    pub tab: Tab,
    /// Current input mode
    pub mode: UiMode,
    /// Catalogue screen state
    pub catalogue: Catalogue,
    /// Demo screen state
    pub demo: RatingDemo,
    /// Selected position in the catalogue's filtered view
    pub selected_index: usize,
    /// Focused demo card
    pub focused_card: usize,
    /// Search text
    pub search_query: String,
    /// Category buttons
    pub categories: Vec<String>,
    /// Category button under the cursor
    pub category_cursor: usize,
    /// Filter that produced the current view
    pub active_filter: ActiveFilter,
    /// Catalogue base URL, for image links
    pub base_url: String,
    /// Whether the catalogue fetch is still running
    pub loading: bool,
    /// Status message to display
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application state.
    ///
    /// # Arguments
    /// * `catalogue` - Catalogue with its rating store loaded
    /// * `demo` - Demo with its rating store loaded
    /// * `categories` - Category buttons
    /// * `base_url` - Catalogue base URL
    pub fn new(
        catalogue: Catalogue,
        demo: RatingDemo,
        categories: Vec<String>,
        base_url: String,
    ) -> Self {
        Self {
            tab: Tab::Catalogue,
            mode: UiMode::List,
            catalogue,
            demo,
            selected_index: 0,
            focused_card: 0,
            search_query: String::new(),
            categories,
            category_cursor: 0,
            active_filter: ActiveFilter::None,
            base_url,
            loading: true,
            status_message: None,
        }
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SwitchTab => self.switch_tab(),
            Action::MoveUp => self.move_selection(false),
            Action::MoveDown => self.move_selection(true),
            Action::Select(position) => self.select(position),
            Action::EnterSearch => self.mode = UiMode::Search,
            Action::EnterCategories => self.mode = UiMode::Categories,
            Action::ExitSearch | Action::ExitCategories => self.mode = UiMode::List,
            Action::SearchInput(ch) => {
                self.search_query.push(ch);
                self.apply_search();
            }
            Action::SearchBackspace => {
                self.search_query.pop();
                self.apply_search();
            }
            Action::CategoryNext => self.move_category_cursor(true),
            Action::CategoryPrev => self.move_category_cursor(false),
            Action::ApplyCategory => self.apply_category(),
            Action::ChooseCategory(index) => {
                if index < self.categories.len() {
                    self.category_cursor = index;
                    self.apply_category();
                }
            }
            Action::HoverCardStar { position, star } => match self.tab {
                Tab::Catalogue => self.catalogue.hover(position, star),
                Tab::Demo => self.demo.hover(position, star),
            },
            Action::HoverNext => self.with_selected_stars(|stars| stars.hover_next()),
            Action::HoverPrev => self.with_selected_stars(|stars| stars.hover_prev()),
            Action::LeaveStars => self.leave_stars(),
            Action::ClickStar(position) => self.with_selected_stars(|stars| stars.click(position)),
            Action::ClickHovered => self.with_selected_stars(|stars| stars.click_hovered()),
            Action::Submit => self.submit(),
            Action::ItemsLoaded(items) => {
                self.loading = false;
                let count = items.len();
                self.catalogue.set_items(items);
                self.active_filter = ActiveFilter::None;
                self.selected_index = 0;
                self.set_status(if count == 0 {
                    "Catalogue is empty".to_string()
                } else {
                    format!("Loaded {} items", count)
                });
            }
            Action::FetchFailed(error) => {
                self.loading = false;
                self.set_status(format!("Could not load catalogue: {}", error));
            }
        }
    }

    /// Number of selectable cards on the active screen.
    pub fn card_count(&self) -> usize {
        match self.tab {
            Tab::Catalogue => self.catalogue.filtered_len(),
            Tab::Demo => CARD_COUNT,
        }
    }

    /// Currently selected catalogue item.
    pub fn selected_item(&self) -> Option<&Item> {
        self.catalogue.filtered_item(self.selected_index)
    }

    /// Set status message.
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    fn selected_position(&self) -> usize {
        match self.tab {
            Tab::Catalogue => self.selected_index,
            Tab::Demo => self.focused_card,
        }
    }

    fn switch_tab(&mut self) {
        self.leave_stars();
        self.tab = match self.tab {
            Tab::Catalogue => Tab::Demo,
            Tab::Demo => Tab::Catalogue,
        };
        self.mode = UiMode::List;
    }

    /// Move the selection, wrapping at both ends.
    fn move_selection(&mut self, forward: bool) {
        let count = self.card_count();
        if count == 0 {
            return;
        }
        let current = self.selected_position();
        let next = if forward {
            (current + 1) % count
        } else if current == 0 {
            count - 1
        } else {
            current - 1
        };
        self.select(next);
    }

    fn select(&mut self, position: usize) {
        if position >= self.card_count() || position == self.selected_position() {
            return;
        }
        self.leave_stars();
        match self.tab {
            Tab::Catalogue => self.selected_index = position,
            Tab::Demo => self.focused_card = position,
        }
    }

    fn with_selected_stars(&mut self, f: impl FnOnce(&mut crate::stars::StarControl)) {
        let control = match self.tab {
            Tab::Catalogue => self.catalogue.stars_mut(self.selected_index),
            Tab::Demo => self.demo.control_mut(self.focused_card),
        };
        if let Some(control) = control {
            f(control);
        }
    }

    fn leave_stars(&mut self) {
        match self.tab {
            Tab::Catalogue => self.catalogue.leave(),
            Tab::Demo => self.demo.leave(),
        }
    }

    fn apply_search(&mut self) {
        self.leave_stars();
        self.catalogue.filter_by_search(&self.search_query);
        self.active_filter = ActiveFilter::Search(self.search_query.clone());
        self.clamp_selection();
    }

    fn move_category_cursor(&mut self, forward: bool) {
        let count = self.categories.len();
        if count == 0 {
            return;
        }
        self.category_cursor = if forward {
            (self.category_cursor + 1) % count
        } else {
            (self.category_cursor + count - 1) % count
        };
    }

    fn apply_category(&mut self) {
        let Some(category) = self.categories.get(self.category_cursor).cloned() else {
            return;
        };
        self.leave_stars();
        self.catalogue.filter_by_category(&category);
        self.active_filter = if category == ALL_CATEGORIES {
            ActiveFilter::None
        } else {
            ActiveFilter::Category(category)
        };
        self.clamp_selection();
        self.mode = UiMode::List;
    }

    fn clamp_selection(&mut self) {
        self.selected_index = cmp::min(
            self.selected_index,
            self.catalogue.filtered_len().saturating_sub(1),
        );
    }

    fn submit(&mut self) {
        let result = match self.tab {
            Tab::Catalogue => self.submit_catalogue(),
            Tab::Demo => self
                .demo
                .submit(self.focused_card)
                .map(|saved| saved.then(|| format!("Saved {} / 5", self.demo.saved(self.focused_card)))),
        };

        match result {
            Ok(Some(message)) => self.set_status(message),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist ratings");
                self.set_status(format!("Failed to save rating: {}", e));
            }
        }
    }

    fn submit_catalogue(&mut self) -> Result<Option<String>> {
        let saved = self.catalogue.submit_selected(self.selected_index)?;
        Ok(saved
            .then(|| self.selected_item())
            .flatten()
            .map(|item| {
                format!("Saved {} / 5 for {}", self.catalogue.saved_rating(item), item.name)
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::{CARD_RATINGS_KEY, ITEM_RATINGS_KEY, RatingStore};
    use crate::storage::FileStore;
    use tempfile::TempDir;

    fn item(id: &str, kind: &str, name: &str) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            ..Item::default()
        }
    }

    fn new_app(dir: &TempDir) -> App {
        let store = FileStore::new(dir.path());
        let catalogue = Catalogue::new(RatingStore::load(store.clone(), ITEM_RATINGS_KEY));
        let demo = RatingDemo::new(RatingStore::load(store, CARD_RATINGS_KEY));
        let categories = ["All", "Breakfast", "Lunch", "Dinner"].map(String::from).to_vec();
        let mut app = App::new(catalogue, demo, categories, "http://localhost:9000".to_string());
        app.dispatch(Action::ItemsLoaded(vec![
            item("1", "Lunch", "Soup"),
            item("2", "Dinner", "Steak"),
            item("3", "Breakfast", "Eggs"),
        ]));
        app
    }

    #[test]
    fn test_items_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let app = new_app(&temp_dir);
        assert!(!app.loading);
        assert_eq!(app.card_count(), 3);
        assert_eq!(app.status_message.as_deref(), Some("Loaded 3 items"));
    }

    #[test]
    fn test_fetch_failed_leaves_catalogue_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        let mut app = App::new(
            Catalogue::new(RatingStore::load(store.clone(), ITEM_RATINGS_KEY)),
            RatingDemo::new(RatingStore::load(store, CARD_RATINGS_KEY)),
            Vec::new(),
            String::new(),
        );
        app.dispatch(Action::FetchFailed("connection refused".to_string()));
        assert!(!app.loading);
        assert_eq!(app.card_count(), 0);
        app.dispatch(Action::MoveDown);
        app.dispatch(Action::Submit);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_move_selection_wraps() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = new_app(&temp_dir);

        app.dispatch(Action::MoveDown);
        assert_eq!(app.selected_index, 1);
        app.dispatch(Action::MoveUp);
        app.dispatch(Action::MoveUp);
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_search_then_category_last_wins() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = new_app(&temp_dir);

        app.dispatch(Action::EnterSearch);
        for ch in "ste".chars() {
            app.dispatch(Action::SearchInput(ch));
        }
        assert_eq!(app.card_count(), 1);
        assert_eq!(app.active_filter, ActiveFilter::Search("ste".to_string()));

        app.dispatch(Action::ExitSearch);
        app.dispatch(Action::EnterCategories);
        app.dispatch(Action::CategoryNext);
        app.dispatch(Action::ApplyCategory);
        assert_eq!(app.mode, UiMode::List);
        assert_eq!(app.active_filter, ActiveFilter::Category("Breakfast".to_string()));
        assert_eq!(app.selected_item().unwrap().name, "Eggs");

        app.dispatch(Action::EnterCategories);
        app.dispatch(Action::CategoryPrev);
        app.dispatch(Action::ApplyCategory);
        assert_eq!(app.active_filter, ActiveFilter::None);
        assert_eq!(app.card_count(), 3);
    }

    #[test]
    fn test_choose_category() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = new_app(&temp_dir);

        app.dispatch(Action::ChooseCategory(3));
        assert_eq!(app.category_cursor, 3);
        assert_eq!(app.selected_item().unwrap().name, "Steak");

        app.dispatch(Action::ChooseCategory(42));
        assert_eq!(app.category_cursor, 3);
    }

    #[test]
    fn test_search_backspace_widens_results() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = new_app(&temp_dir);

        app.dispatch(Action::EnterSearch);
        app.dispatch(Action::SearchInput('x'));
        assert_eq!(app.card_count(), 0);
        app.dispatch(Action::SearchBackspace);
        assert_eq!(app.card_count(), 3);
    }

    #[test]
    fn test_click_and_submit_catalogue_rating() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = new_app(&temp_dir);

        app.dispatch(Action::Select(1));
        app.dispatch(Action::HoverCardStar { position: 1, star: 3 });
        app.dispatch(Action::ClickHovered);
        app.dispatch(Action::Submit);

        assert_eq!(app.catalogue.summary().total_stars, 3);
        assert_eq!(app.status_message.as_deref(), Some("Saved 3 / 5 for Steak"));
        assert_eq!(app.catalogue.stars(1).unwrap().hovered(), None);
    }

    #[test]
    fn test_selection_change_clears_hover() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = new_app(&temp_dir);

        app.dispatch(Action::HoverNext);
        assert_eq!(app.catalogue.stars(0).unwrap().hovered(), Some(1));
        app.dispatch(Action::MoveDown);
        assert_eq!(app.catalogue.stars(0).unwrap().hovered(), None);
    }

    #[test]
    fn test_demo_submit() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = new_app(&temp_dir);

        app.dispatch(Action::SwitchTab);
        assert_eq!(app.tab, Tab::Demo);
        assert_eq!(app.card_count(), CARD_COUNT);

        app.dispatch(Action::Select(2));
        app.dispatch(Action::ClickStar(5));
        assert_eq!(app.demo.saved(2), 0);
        app.dispatch(Action::Submit);
        assert_eq!(app.demo.ratings(), &[0, 0, 5, 0]);
        assert_eq!(app.status_message.as_deref(), Some("Saved 5 / 5"));
    }
}
