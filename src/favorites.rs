//! Favorites reconciliation: toggle membership, persist, notify views.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::show::ShowId;
use crate::store::{Durability, FavoriteSet, FavoritesStore};
use crate::tvmaze::Catalog;

/// Anything that displays favorite state and must re-derive it after a change.
pub trait FavoritesListener: Send + Sync {
    fn favorites_changed(&self, favorites: &FavoriteSet);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    NotFavorite,
    Favorite,
}

#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub id: ShowId,
    /// State of `id` after the toggle.
    pub membership: Membership,
    /// The set as it stands in memory after the toggle.
    pub favorites: FavoriteSet,
    /// `Volatile` when the write was rejected and the change will not survive reload.
    pub durability: Durability,
}

pub struct Reconciler {
    store: FavoritesStore,
    listeners: RwLock<Vec<(u64, Arc<dyn FavoritesListener>)>>,
    next_listener: AtomicU64,
    // Serializes load -> mutate -> save within this process.
    gate: Mutex<()>,
}

impl Reconciler {
    pub fn new(store: FavoritesStore) -> Self {
        Self {
            store,
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    /// Registers `listener` until the returned subscription is dropped.
    pub fn subscribe(&self, listener: Arc<dyn FavoritesListener>) -> Subscription<'_> {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .push((id, listener));
        Subscription {
            reconciler: self,
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    fn unsubscribe(&self, id: u64) {
        self.listeners
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .retain(|(lid, _)| *lid != id);
    }

    /// Current membership, read from the store rather than any cached copy.
    pub fn membership(&self, id: ShowId) -> Membership {
        if self.store.load().contains(id) {
            Membership::Favorite
        } else {
            Membership::NotFavorite
        }
    }

    /// Flips `id` between favorite and not favorite.
    ///
    /// Adding requires the show to be in `catalog`; an id that is neither a
    /// favorite nor in the catalog is an integration error and is returned
    /// as [`Error::ItemNotFound`] without touching the store.
    pub fn toggle(&self, catalog: &Catalog, id: ShowId) -> Result<ToggleOutcome> {
        let (favorites, membership, durability) = {
            let _guard = self.gate.lock().unwrap_or_else(|p| p.into_inner());
            let mut favorites = self.store.load();
            let membership = if favorites.remove(id).is_some() {
                Membership::NotFavorite
            } else {
                let show = catalog.find(id).ok_or(Error::ItemNotFound(id))?;
                favorites.insert(show.clone());
                Membership::Favorite
            };
            let durability = self.store.save(&favorites);
            (favorites, membership, durability)
        };

        match membership {
            Membership::Favorite => info!("Added show {} to favorites", id),
            Membership::NotFavorite => info!("Removed show {} from favorites", id),
        }
        if durability == Durability::Volatile {
            warn!("Favorite change for show {} was not persisted", id);
        }
        self.notify(&favorites);

        Ok(ToggleOutcome {
            id,
            membership,
            favorites,
            durability,
        })
    }

    /// Removal path used where no catalog is loaded (the favorites page).
    /// Removing an id that is not a favorite still rewrites the slot.
    pub fn remove(&self, id: ShowId) -> ToggleOutcome {
        let (favorites, durability) = {
            let _guard = self.gate.lock().unwrap_or_else(|p| p.into_inner());
            let mut favorites = self.store.load();
            if favorites.remove(id).is_some() {
                info!("Removed show {} from favorites", id);
            }
            let durability = self.store.save(&favorites);
            (favorites, durability)
        };
        if durability == Durability::Volatile {
            warn!("Favorite change for show {} was not persisted", id);
        }
        self.notify(&favorites);
        ToggleOutcome {
            id,
            membership: Membership::NotFavorite,
            favorites,
            durability,
        }
    }

    fn notify(&self, favorites: &FavoriteSet) {
        let listeners = self.listeners.read().unwrap_or_else(|p| p.into_inner());
        for (_, listener) in listeners.iter() {
            listener.favorites_changed(favorites);
        }
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription<'a> {
    reconciler: &'a Reconciler,
    id: u64,
}

impl Drop for Subscription<'_> {
    fn drop(&mut self) {
        self.reconciler.unsubscribe(self.id);
    }
}
