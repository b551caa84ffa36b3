//! Static rating demo: four fixed cards with submit-to-save star ratings.

use crate::error::Result;
use crate::ratings::{CardRatings, RatingStore, Summary};
use crate::stars::StarControl;

/// Number of demo cards.
pub const CARD_COUNT: usize = 4;

/// Card titles, index-aligned with the persisted ratings.
pub const CARD_TITLES: [&str; CARD_COUNT] = ["Card A", "Card B", "Card C", "Card D"];

/// Demo screen state.
///
/// `temp` holds the per-card selections that have not been submitted yet and
/// is never persisted; `ratings` holds the submitted values.
#[derive(Debug)]
pub struct RatingDemo {
    /// Unsubmitted selection and hover per card
    temp: [StarControl; CARD_COUNT],
    /// Submitted ratings, persisted as a fixed-length array
    ratings: RatingStore<CardRatings<CARD_COUNT>>,
}

impl RatingDemo {
    /// Create the demo around an already loaded rating store.
    pub fn new(ratings: RatingStore<CardRatings<CARD_COUNT>>) -> Self {
        Self {
            temp: [StarControl::default(); CARD_COUNT],
            ratings,
        }
    }

    /// Pointer entered star `position` of `card`; any other card loses its hover.
    pub fn hover(&mut self, card: usize, position: u8) {
        for (index, control) in self.temp.iter_mut().enumerate() {
            if index == card {
                control.hover(position);
            } else {
                control.leave();
            }
        }
    }

    /// Pointer left the star rows.
    pub fn leave(&mut self) {
        self.temp.iter_mut().for_each(StarControl::leave);
    }

    /// Star control of `card`.
    pub fn control(&self, card: usize) -> Option<&StarControl> {
        self.temp.get(card)
    }

    /// Mutable star control of `card`.
    pub fn control_mut(&mut self, card: usize) -> Option<&mut StarControl> {
        self.temp.get_mut(card)
    }

    /// Level drawn for `card`.
    ///
    /// # Details
    /// The hovered star if this card is hovered, else the unsubmitted
    /// selection if there is one, else the saved rating.
    pub fn active_level(&self, card: usize) -> u8 {
        let Some(control) = self.temp.get(card) else {
            return 0;
        };
        match control.hovered() {
            Some(position) => position,
            None if control.selected() > 0 => control.selected(),
            None => self.saved(card),
        }
    }

    /// Saved rating of `card`.
    pub fn saved(&self, card: usize) -> u8 {
        self.ratings.get(&card)
    }

    /// Copy the selection of `card` into the saved ratings and persist them.
    pub fn submit(&mut self, card: usize) -> Result<bool> {
        let Some(control) = self.temp.get(card) else {
            return Ok(false);
        };
        let value = control.selected();
        self.ratings.submit(&card, value)
    }

    /// Saved ratings, index-aligned with [`CARD_TITLES`].
    pub fn ratings(&self) -> &[u8] {
        self.ratings.map().as_slice()
    }

    /// Aggregate statistics over the saved ratings.
    pub fn summary(&self) -> Summary {
        self.ratings.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::CARD_RATINGS_KEY;
    use crate::storage::FileStore;
    use tempfile::TempDir;

    fn new_demo(dir: &TempDir) -> RatingDemo {
        RatingDemo::new(RatingStore::load(FileStore::new(dir.path()), CARD_RATINGS_KEY))
    }

    #[test]
    fn test_fresh_demo_is_unrated() {
        let temp_dir = TempDir::new().unwrap();
        let demo = new_demo(&temp_dir);
        assert_eq!(demo.ratings(), &[0, 0, 0, 0]);
        assert_eq!(demo.summary().average(2), "0.00");
    }

    #[test]
    fn test_selection_is_not_saved_until_submit() {
        let temp_dir = TempDir::new().unwrap();
        let mut demo = new_demo(&temp_dir);

        demo.control_mut(1).unwrap().click(3);
        assert_eq!(demo.saved(1), 0);
        assert_eq!(demo.active_level(1), 3);

        assert!(demo.submit(1).unwrap());
        assert_eq!(demo.saved(1), 3);
        assert_eq!(demo.ratings(), &[0, 3, 0, 0]);
    }

    #[test]
    fn test_active_level_falls_back_to_saved() {
        let temp_dir = TempDir::new().unwrap();
        FileStore::new(temp_dir.path())
            .set_item(CARD_RATINGS_KEY, "[0, 0, 4, 0]")
            .unwrap();
        let mut demo = new_demo(&temp_dir);

        assert_eq!(demo.active_level(2), 4);
        demo.hover(2, 1);
        assert_eq!(demo.active_level(2), 1);
        demo.leave();
        assert_eq!(demo.active_level(2), 4);
    }

    #[test]
    fn test_hover_is_exclusive() {
        let temp_dir = TempDir::new().unwrap();
        let mut demo = new_demo(&temp_dir);

        demo.hover(0, 5);
        demo.hover(3, 2);
        assert_eq!(demo.control(0).unwrap().hovered(), None);
        assert_eq!(demo.control(3).unwrap().hovered(), Some(2));
    }

    #[test]
    fn test_summary_uses_two_decimals() {
        let temp_dir = TempDir::new().unwrap();
        let mut demo = new_demo(&temp_dir);
        for (card, stars) in [(0, 5), (1, 4), (3, 4)] {
            demo.control_mut(card).unwrap().click(stars);
            demo.submit(card).unwrap();
        }

        let summary = demo.summary();
        assert_eq!(summary.total_stars, 13);
        assert_eq!(summary.rated_count, 3);
        assert_eq!(summary.average(2), "4.33");
    }

    #[test]
    fn test_ratings_survive_restart() {
        let temp_dir = TempDir::new().unwrap();
        let mut demo = new_demo(&temp_dir);
        demo.control_mut(0).unwrap().click(2);
        demo.submit(0).unwrap();

        let reloaded = new_demo(&temp_dir);
        assert_eq!(reloaded.ratings(), &[2, 0, 0, 0]);
        assert_eq!(reloaded.control(0).unwrap().selected(), 0);
    }

    #[test]
    fn test_malformed_storage_resets_to_zeros() {
        let temp_dir = TempDir::new().unwrap();
        FileStore::new(temp_dir.path())
            .set_item(CARD_RATINGS_KEY, "not json")
            .unwrap();
        assert_eq!(new_demo(&temp_dir).ratings(), &[0, 0, 0, 0]);
    }
}
