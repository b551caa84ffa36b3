//! Rating state management.
//!
//! Holds the persisted rating maps for both screens behind one
//! [`RatingStore`], generic over how the map is keyed and laid out on disk.

use crate::error::Result;
use crate::storage::FileStore;
use serde_json::Value;
use std::collections::BTreeMap;

/// Highest rating a user can give.
pub const MAX_STARS: u8 = 5;

/// Storage key of the catalogue's identifier → rating map.
pub const ITEM_RATINGS_KEY: &str = "foodRatings";

/// Storage key of the demo's per-card rating array.
pub const CARD_RATINGS_KEY: &str = "ratings";

/// Normalize a raw identifier into a usable map key.
///
/// # Returns
/// * `Option<String>` - Trimmed identifier, or `None` when it is empty or one
///   of the sentinel strings `"undefined"` / `"null"`
pub fn normalize_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    if key.is_empty() || key == "undefined" || key == "null" {
        None
    } else {
        Some(key.to_string())
    }
}

/// Clamp a numeric rating into `0..=MAX_STARS`.
///
/// Non-finite input counts as unrated. Fractions are rounded.
pub fn clamp_rating(value: f64) -> u8 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round().min(f64::from(MAX_STARS)) as u8
}

/// Coerce an arbitrary JSON value into a rating.
///
/// Numbers and numeric strings are accepted, booleans count as 0/1 and
/// anything else becomes 0.
pub fn coerce_rating(value: &Value) -> u8 {
    match value {
        Value::Number(n) => n.as_f64().map(clamp_rating).unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(clamp_rating).unwrap_or(0),
        Value::Bool(b) => u8::from(*b),
        _ => 0,
    }
}

/// A rating map layout that can be persisted under a single storage key.
pub trait RatingMap: Default {
    /// Key type addressing one rating
    type Key: ?Sized;

    /// Parse persisted text, `None` when it is not the expected shape.
    fn decode(raw: &str) -> Option<Self>;

    /// Serialize the whole map.
    fn encode(&self) -> Result<String>;

    /// Rating stored for `key`, 0 when unrated.
    fn get(&self, key: &Self::Key) -> u8;

    /// Store `value` for `key`.
    ///
    /// # Returns
    /// * `bool` - False when the key is rejected and the map is unchanged
    fn set(&mut self, key: &Self::Key, value: u8) -> bool;

    /// All stored rating values.
    fn values(&self) -> impl Iterator<Item = u8> + '_;
}

/// Catalogue ratings keyed by item identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRatings(BTreeMap<String, u8>);

impl ItemRatings {
    /// Number of stored entries (including explicit zeros).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl RatingMap for ItemRatings {
    type Key = str;

    fn decode(raw: &str) -> Option<Self> {
        let Value::Object(entries) = serde_json::from_str::<Value>(raw).ok()? else {
            return None;
        };

        let map = entries
            .iter()
            .filter_map(|(key, value)| Some((normalize_key(key)?, coerce_rating(value))))
            .collect();
        Some(Self(map))
    }

    fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    fn get(&self, key: &str) -> u8 {
        self.0.get(key.trim()).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u8) -> bool {
        let Some(key) = normalize_key(key) else {
            return false;
        };
        self.0.insert(key, value.min(MAX_STARS));
        true
    }

    fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.values().copied()
    }
}

/// Fixed-length ratings keyed by card index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRatings<const N: usize>([u8; N]);

impl<const N: usize> Default for CardRatings<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> CardRatings<N> {
    /// Ratings as a slice, index-aligned with the cards.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> RatingMap for CardRatings<N> {
    type Key = usize;

    fn decode(raw: &str) -> Option<Self> {
        let Value::Array(values) = serde_json::from_str::<Value>(raw).ok()? else {
            return None;
        };

        // Arrays of the wrong length are padded with zeros or truncated.
        let mut ratings = [0; N];
        for (slot, value) in ratings.iter_mut().zip(values.iter()) {
            *slot = coerce_rating(value);
        }
        Some(Self(ratings))
    }

    fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self.0.as_slice())?)
    }

    fn get(&self, key: &usize) -> u8 {
        self.0.get(*key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &usize, value: u8) -> bool {
        match self.0.get_mut(*key) {
            Some(slot) => {
                *slot = value.min(MAX_STARS);
                true
            }
            None => false,
        }
    }

    fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

/// Aggregate statistics over a set of ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Ratings greater than zero
    pub rated_count: usize,
    /// Sum of all ratings
    pub total_stars: u32,
}

impl Summary {
    /// Compute the summary of `values`.
    pub fn of(values: impl IntoIterator<Item = u8>) -> Self {
        values.into_iter().fold(Self::default(), |acc, value| Self {
            rated_count: acc.rated_count + usize::from(value > 0),
            total_stars: acc.total_stars + u32::from(value),
        })
    }

    /// Average rating with `decimals` digits, `"0.00"` when nothing is rated.
    pub fn average(&self, decimals: usize) -> String {
        if self.rated_count == 0 {
            return "0.00".to_string();
        }
        let average = f64::from(self.total_stars) / self.rated_count as f64;
        format!("{:.*}", decimals, average)
    }

    /// Catalogue average, one decimal.
    pub fn average_rating(&self) -> String {
        self.average(1)
    }
}

/// A rating map bound to its storage key.
///
/// Every accepted mutation rewrites the whole map to storage.
#[derive(Debug)]
pub struct RatingStore<M: RatingMap> {
    /// Backing key-value store
    store: FileStore,
    /// Storage key holding the serialized map
    key: &'static str,
    /// Authoritative in-memory map
    map: M,
}

impl<M: RatingMap> RatingStore<M> {
    /// Load the map persisted under `key`.
    ///
    /// # Details
    /// Missing, unreadable or malformed data yields an empty map. When the
    /// stored text differs from the cleaned map (dropped keys, padded
    /// arrays, malformed content) the cleaned map is written back.
    pub fn load(store: FileStore, key: &'static str) -> Self {
        let (map, stored) = match store.get_item(key) {
            Ok(Some(raw)) => {
                let map = M::decode(&raw).unwrap_or_else(|| {
                    tracing::debug!(key, "discarding malformed persisted ratings");
                    M::default()
                });
                (map, Some(raw))
            }
            Ok(None) => (M::default(), None),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read persisted ratings");
                (M::default(), None)
            }
        };

        let loaded = Self { store, key, map };
        if let Some(raw) = stored {
            loaded.rewrite_if_changed(&raw);
        }
        loaded
    }

    fn rewrite_if_changed(&self, raw: &str) {
        match self.map.encode() {
            Ok(cleaned) if cleaned == raw.trim() => {}
            Ok(_) => {
                if let Err(e) = self.persist() {
                    tracing::warn!(key = self.key, error = %e, "failed to rewrite cleaned ratings");
                }
            }
            Err(e) => tracing::warn!(key = self.key, error = %e, "failed to encode ratings"),
        }
    }

    /// The current map.
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Rating stored for `key`, 0 when unrated.
    pub fn get(&self, key: &M::Key) -> u8 {
        self.map.get(key)
    }

    /// Store a rating and persist the whole map.
    ///
    /// # Returns
    /// * `Result<bool>` - `Ok(false)` when the key was rejected (nothing changes);
    ///   `Err` when the map changed in memory but could not be written
    pub fn submit(&mut self, key: &M::Key, value: u8) -> Result<bool> {
        if !self.map.set(key, value) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Serialize the full map and overwrite the stored value.
    pub fn persist(&self) -> Result<()> {
        let raw = self.map.encode()?;
        self.store.set_item(self.key, &raw)
    }

    /// Aggregate statistics over the stored ratings.
    pub fn summary(&self) -> Summary {
        Summary::of(self.map.values())
    }
}
