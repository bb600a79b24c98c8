use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::show::{Show, ShowId};
use crate::storage::SlotStorage;

pub const DEFAULT_STORAGE_KEY: &str = "movieverse_favorites";

/// Favorites in the order they were added, unique by show id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Show>", into = "Vec<Show>")]
pub struct FavoriteSet {
    shows: Vec<Show>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ShowId) -> bool {
        self.shows.iter().any(|s| s.id == id)
    }

    pub fn get(&self, id: ShowId) -> Option<&Show> {
        self.shows.iter().find(|s| s.id == id)
    }

    /// Appends unless a show with the same id is already present.
    pub fn insert(&mut self, show: Show) -> bool {
        if self.contains(show.id) {
            return false;
        }
        self.shows.push(show);
        true
    }

    pub fn remove(&mut self, id: ShowId) -> Option<Show> {
        let pos = self.shows.iter().position(|s| s.id == id)?;
        Some(self.shows.remove(pos))
    }

    pub fn ids(&self) -> Vec<ShowId> {
        self.shows.iter().map(|s| s.id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Show> {
        self.shows.iter()
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }
}

impl From<Vec<Show>> for FavoriteSet {
    fn from(shows: Vec<Show>) -> Self {
        let mut set = FavoriteSet::new();
        for show in shows {
            set.insert(show);
        }
        set
    }
}

impl From<FavoriteSet> for Vec<Show> {
    fn from(set: FavoriteSet) -> Self {
        set.shows
    }
}

impl<'a> IntoIterator for &'a FavoriteSet {
    type Item = &'a Show;
    type IntoIter = std::slice::Iter<'a, Show>;

    fn into_iter(self) -> Self::IntoIter {
        self.shows.iter()
    }
}

/// Whether the last save reached the storage slot.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    Persisted,
    /// The write was rejected; the change lives only in memory for this session.
    Volatile,
}

/// The single slot holding the serialized favorites list.
#[derive(Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn SlotStorage>,
    key: String,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn SlotStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the slot. Missing, unreadable or malformed payloads yield an empty set.
    pub fn load(&self) -> FavoriteSet {
        match self.try_load() {
            Ok(set) => set,
            Err(e) => {
                warn!("Error loading favorites, starting empty: {}", e);
                FavoriteSet::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<FavoriteSet> {
        let Some(raw) = self.storage.read(&self.key)? else {
            return Ok(FavoriteSet::new());
        };
        let set: FavoriteSet =
            serde_json::from_str(&raw).map_err(|e| Error::StorageParse(e.to_string()))?;
        debug!(key = %self.key, count = set.len(), "Loaded favorites");
        Ok(set)
    }

    /// Overwrites the slot with the full set. Write failures are logged, not raised.
    pub fn save(&self, favorites: &FavoriteSet) -> Durability {
        match self.try_save(favorites) {
            Ok(()) => Durability::Persisted,
            Err(e) => {
                warn!("Error saving favorites: {}", e);
                Durability::Volatile
            }
        }
    }

    pub fn try_save(&self, favorites: &FavoriteSet) -> Result<()> {
        // Serialize fully before touching the slot so it never holds a partial list.
        let payload = serde_json::to_string(favorites).map_err(|e| Error::StorageWrite {
            key: self.key.clone(),
            message: e.to_string(),
        })?;
        self.storage.write(&self.key, &payload)?;
        debug!(key = %self.key, count = favorites.len(), "Saved favorites");
        Ok(())
    }
}
