//! Food catalogue: fetching, filtering and per-item ratings.

pub mod client;
pub mod models;

pub use client::CatalogueClient;
pub use models::Item;

use crate::error::Result;
use crate::ratings::{ItemRatings, RatingStore, Summary, normalize_key};
use crate::stars::StarControl;

/// Category that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Indices of the items whose category case-insensitively equals `category`.
///
/// [`ALL_CATEGORIES`] selects every item.
pub fn filter_by_category(items: &[Item], category: &str) -> Vec<usize> {
    if category == ALL_CATEGORIES {
        return (0..items.len()).collect();
    }
    let category = category.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.kind.to_lowercase() == category)
        .map(|(index, _)| index)
        .collect()
}

/// Indices of the items whose name or category contains `text`, ignoring case.
pub fn filter_by_search(items: &[Item], text: &str) -> Vec<usize> {
    let needle = text.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.name.to_lowercase().contains(&needle) || item.kind.to_lowercase().contains(&needle)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Catalogue state: the fetched items, the current filtered view over them,
/// one star control per item and the persisted rating map.
#[derive(Debug)]
pub struct Catalogue {
    /// Items from the last successful fetch, never edited in place
    items: Vec<Item>,
    /// Indices into `items` currently shown
    filtered: Vec<usize>,
    /// Star control per item, index-aligned with `items`
    stars: Vec<StarControl>,
    /// Identifier → rating map synced to storage
    ratings: RatingStore<ItemRatings>,
}

impl Catalogue {
    /// Create an empty catalogue around an already loaded rating store.
    pub fn new(ratings: RatingStore<ItemRatings>) -> Self {
        Self {
            items: Vec::new(),
            filtered: Vec::new(),
            stars: Vec::new(),
            ratings,
        }
    }

    /// Replace the full and filtered lists with freshly fetched items.
    ///
    /// # Details
    /// Each item's star control starts at its saved rating.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.stars = items
            .iter()
            .map(|item| StarControl::new(self.ratings.get(item.id.as_str())))
            .collect();
        self.filtered = (0..items.len()).collect();
        self.items = items;
    }

    /// All fetched items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items in the filtered view.
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Items in the filtered view, in display order.
    pub fn filtered(&self) -> impl Iterator<Item = &Item> {
        self.filtered.iter().map(|&index| &self.items[index])
    }

    /// Item at `position` of the filtered view.
    pub fn filtered_item(&self, position: usize) -> Option<&Item> {
        self.filtered.get(position).map(|&index| &self.items[index])
    }

    /// Star control of the item at `position` of the filtered view.
    pub fn stars(&self, position: usize) -> Option<&StarControl> {
        self.filtered.get(position).map(|&index| &self.stars[index])
    }

    /// Mutable star control of the item at `position` of the filtered view.
    pub fn stars_mut(&mut self, position: usize) -> Option<&mut StarControl> {
        let index = *self.filtered.get(position)?;
        self.stars.get_mut(index)
    }

    /// Pointer entered star `star` of the card at `position` of the filtered
    /// view; every other card loses its hover.
    pub fn hover(&mut self, position: usize, star: u8) {
        let target = self.filtered.get(position).copied();
        for (index, control) in self.stars.iter_mut().enumerate() {
            if Some(index) == target {
                control.hover(star);
            } else {
                control.leave();
            }
        }
    }

    /// Pointer left the star rows.
    pub fn leave(&mut self) {
        self.stars.iter_mut().for_each(StarControl::leave);
    }

    /// Saved rating of `item`, 0 when unrated.
    pub fn saved_rating(&self, item: &Item) -> u8 {
        self.ratings.get(item.id.as_str())
    }

    /// Show the items of one category, or all of them for [`ALL_CATEGORIES`].
    ///
    /// Discards any active search filter.
    pub fn filter_by_category(&mut self, category: &str) {
        self.filtered = filter_by_category(&self.items, category);
        tracing::debug!(category, shown = self.filtered.len(), "category filter applied");
    }

    /// Show the items whose name or category contains `text`.
    ///
    /// Discards any active category filter.
    pub fn filter_by_search(&mut self, text: &str) {
        self.filtered = filter_by_search(&self.items, text);
    }

    /// Store `value` as the rating of item `id` and persist the map.
    ///
    /// # Returns
    /// * `Result<bool>` - `Ok(false)` when `id` is empty or a sentinel and
    ///   nothing changed
    ///
    /// # Details
    /// Star controls of items with that identifier are re-seeded with the
    /// stored value, even when writing it to storage fails.
    pub fn submit_rating(&mut self, id: &str, value: u8) -> Result<bool> {
        let Some(key) = normalize_key(id) else {
            tracing::debug!(id, "ignoring rating for item without identifier");
            return Ok(false);
        };

        let result = self.ratings.submit(key.as_str(), value);
        let saved = self.ratings.get(key.as_str());
        for (item, stars) in self.items.iter().zip(self.stars.iter_mut()) {
            if item.id == key {
                stars.reseed(saved);
            }
        }
        result
    }

    /// Submit the selected stars of the item at `position` of the filtered view.
    ///
    /// # Details
    /// Items without an identifier are ignored and keep their hover state.
    pub fn submit_selected(&mut self, position: usize) -> Result<bool> {
        let Some(&index) = self.filtered.get(position) else {
            return Ok(false);
        };
        if !self.items[index].has_identifier() {
            return Ok(false);
        }

        let value = self.stars[index].submit();
        let id = self.items[index].id.clone();
        self.submit_rating(&id, value)
    }

    /// Persisted rating map.
    pub fn ratings(&self) -> &ItemRatings {
        self.ratings.map()
    }

    /// Aggregate statistics over every stored rating.
    pub fn summary(&self) -> Summary {
        self.ratings.summary()
    }
}
