//! Browse and favorites pages. Each page derives its display state from the
//! cached catalog and the favorites passed in, and draws through its sink.

use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::catalog::{self, Filter, SortKey};
use crate::favorites::FavoritesListener;
use crate::render::{Frame, RenderSink};
use crate::show::{Show, ShowId};
use crate::store::FavoriteSet;
use crate::tvmaze::Catalog;

pub const BROWSE_TITLE: &str = "Shows";
pub const FAVORITES_TITLE: &str = "Favorites";
pub const NO_MATCHES: &str = "No shows found matching your criteria.";
pub const NO_FAVORITES: &str = "No favorites yet! Browse shows and add your favorites.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub filter: Filter,
    pub sort: SortKey,
}

pub struct BrowsePage {
    catalog: Arc<Catalog>,
    criteria: Mutex<Criteria>,
    sink: Arc<dyn RenderSink>,
}

impl BrowsePage {
    pub fn new(catalog: Arc<Catalog>, sink: Arc<dyn RenderSink>) -> Self {
        Self {
            catalog,
            criteria: Mutex::new(Criteria::default()),
            sink,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn criteria(&self) -> Criteria {
        self.criteria
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Applies new controls and redraws from the cached catalog; no refetch.
    pub fn set_criteria(&self, criteria: Criteria, favorites: &FavoriteSet) {
        *self.criteria.lock().unwrap_or_else(|p| p.into_inner()) = criteria;
        self.refresh(favorites);
    }

    pub fn reset(&self, favorites: &FavoriteSet) {
        self.set_criteria(Criteria::default(), favorites);
    }

    /// The ordered list currently on display.
    pub fn display_list(&self) -> Vec<&Show> {
        let criteria = self.criteria();
        catalog::apply(self.catalog.shows(), &criteria.filter, criteria.sort)
    }

    pub fn refresh(&self, favorites: &FavoriteSet) {
        let shows = self.display_list();
        debug!(count = shows.len(), "Redrawing browse page");
        if shows.is_empty() {
            self.sink.empty(BROWSE_TITLE, NO_MATCHES);
            return;
        }
        let is_favorite = |id: ShowId| favorites.contains(id);
        self.sink.draw(&Frame {
            title: BROWSE_TITLE,
            shows: &shows,
            is_favorite: &is_favorite,
        });
    }
}

impl FavoritesListener for BrowsePage {
    fn favorites_changed(&self, favorites: &FavoriteSet) {
        self.refresh(favorites);
    }
}

pub struct FavoritesPage {
    sink: Arc<dyn RenderSink>,
}

impl FavoritesPage {
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        Self { sink }
    }

    /// Draws favorites in the order they were added.
    pub fn refresh(&self, favorites: &FavoriteSet) {
        if favorites.is_empty() {
            self.sink.empty(FAVORITES_TITLE, NO_FAVORITES);
            return;
        }
        let shows: Vec<&Show> = favorites.iter().collect();
        let is_favorite = |_: ShowId| true;
        self.sink.draw(&Frame {
            title: FAVORITES_TITLE,
            shows: &shows,
            is_favorite: &is_favorite,
        });
    }
}

impl FavoritesListener for FavoritesPage {
    fn favorites_changed(&self, favorites: &FavoriteSet) {
        self.refresh(favorites);
    }
}

/// Per-show detail view; it re-reads membership on every change.
pub struct DetailPage {
    show: Show,
    sink: Arc<dyn RenderSink>,
}

impl DetailPage {
    pub fn new(show: Show, sink: Arc<dyn RenderSink>) -> Self {
        Self { show, sink }
    }

    pub fn refresh(&self, favorites: &FavoriteSet) {
        self.sink.detail(&self.show, favorites.contains(self.show.id));
    }
}

impl FavoritesListener for DetailPage {
    fn favorites_changed(&self, favorites: &FavoriteSet) {
        self.refresh(favorites);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullSink;

    #[derive(Default)]
    struct Capture {
        frames: Mutex<Vec<(Vec<ShowId>, Vec<ShowId>)>>,
        empties: Mutex<Vec<String>>,
    }

    impl RenderSink for Capture {
        fn draw(&self, frame: &Frame<'_>) {
            let ids: Vec<ShowId> = frame.shows.iter().map(|s| s.id).collect();
            let favs = ids
                .iter()
                .copied()
                .filter(|id| (frame.is_favorite)(*id))
                .collect();
            self.frames.lock().unwrap().push((ids, favs));
        }
        fn empty(&self, _title: &str, message: &str) {
            self.empties.lock().unwrap().push(message.to_string());
        }
        fn error(&self, _title: &str, _message: &str) {}
        fn detail(&self, _show: &Show, _is_favorite: bool) {}
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            Show::new(1, "B").with_genres(["Drama", "Crime"]),
            Show::new(2, "A").with_genres(["Comedy"]),
            Show::new(3, "C").with_genres(["Drama"]),
        ]))
    }

    #[test]
    fn browse_page_draws_sorted_with_membership() {
        let sink = Arc::new(Capture::default());
        let page = BrowsePage::new(catalog(), sink.clone());
        let mut favs = FavoriteSet::new();
        favs.insert(Show::new(3, "C"));
        page.refresh(&favs);
        assert_eq!(sink.frames.lock().unwrap()[0], (vec![2, 1, 3], vec![3]));
    }

    #[test]
    fn browse_criteria_filter_and_reset() {
        let sink = Arc::new(Capture::default());
        let page = BrowsePage::new(catalog(), sink.clone());
        let favs = FavoriteSet::new();
        page.set_criteria(
            Criteria {
                filter: Filter::genre("Drama"),
                sort: SortKey::Name,
            },
            &favs,
        );
        page.set_criteria(
            Criteria {
                filter: Filter::genre("Western"),
                sort: SortKey::Name,
            },
            &favs,
        );
        page.reset(&favs);
        let frames = sink.frames.lock().unwrap();
        assert_eq!(frames[0].0, vec![1, 3]);
        assert_eq!(frames[1].0, vec![2, 1, 3]);
        assert_eq!(*sink.empties.lock().unwrap(), vec![NO_MATCHES.to_string()]);
    }

    #[test]
    fn favorites_page_shows_empty_state_then_cards() {
        let sink = Arc::new(Capture::default());
        let page = FavoritesPage::new(sink.clone());
        page.refresh(&FavoriteSet::new());
        let mut favs = FavoriteSet::new();
        favs.insert(Show::new(9, "Z"));
        favs.insert(Show::new(4, "A"));
        page.refresh(&favs);
        assert_eq!(*sink.empties.lock().unwrap(), vec![NO_FAVORITES.to_string()]);
        assert_eq!(sink.frames.lock().unwrap()[0], (vec![9, 4], vec![9, 4]));
    }

    #[test]
    fn pages_tolerate_absent_views() {
        let page = BrowsePage::new(catalog(), Arc::new(NullSink));
        page.refresh(&FavoriteSet::new());
        assert_eq!(page.display_list().len(), 3);
    }
}
