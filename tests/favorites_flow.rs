use movieverse::app::{self, AppState, Output};
use movieverse::catalog::{self, Filter, SortKey};
use movieverse::cli::Command;
use movieverse::error::Error;
use movieverse::favorites::{Membership, Reconciler};
use movieverse::pages::{BrowsePage, Criteria, FavoritesPage};
use movieverse::render::HtmlFileSink;
use movieverse::show::Show;
use movieverse::storage::{FileStorage, MemoryStorage, SlotStorage};
use movieverse::store::{Durability, FavoriteSet, FavoritesStore, DEFAULT_STORAGE_KEY};
use movieverse::tvmaze::{fetch_catalog, Catalog, CatalogApi, CatalogLimits};
use std::fs;
use std::sync::{Arc, Mutex};

struct FakeCatalog {
    pages: Vec<Vec<Show>>,
    failing_page: Option<u32>,
    requests: Mutex<Vec<u32>>,
}

impl FakeCatalog {
    fn new(pages: Vec<Vec<Show>>) -> Self {
        Self {
            pages,
            failing_page: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, page: u32) -> Self {
        self.failing_page = Some(page);
        self
    }
}

#[async_trait::async_trait]
impl CatalogApi for FakeCatalog {
    async fn fetch_page(&self, page: u32) -> movieverse::error::Result<Vec<Show>> {
        self.requests.lock().unwrap().push(page);
        if self.failing_page == Some(page) {
            return Err(Error::network(page, "500 Internal Server Error"));
        }
        Ok(self.pages.get(page as usize).cloned().unwrap_or_default())
    }
}

fn numbered_page(start: u32) -> Vec<Show> {
    (start..start + 10)
        .map(|id| Show::new(id, format!("Show {id}")))
        .collect()
}

fn scenario_catalog() -> Catalog {
    Catalog::new(vec![
        Show::new(1, "A")
            .with_rating(Some(8.5))
            .with_genres(["Drama", "Crime"]),
        Show::new(2, "B").with_rating(None).with_genres(["Comedy"]),
    ])
}

#[tokio::test]
async fn fetch_takes_fifteen_items_across_two_pages() {
    let api = FakeCatalog::new(vec![numbered_page(0), numbered_page(10)]);
    let limits = CatalogLimits {
        max_items: 15,
        max_pages: 2,
    };
    let catalog = fetch_catalog(&api, limits).await.unwrap();
    let ids: Vec<u32> = catalog.shows().iter().map(|s| s.id).collect();
    assert_eq!(ids, (0..15).collect::<Vec<_>>());
    assert_eq!(*api.requests.lock().unwrap(), vec![0, 1]);
}

#[tokio::test]
async fn failure_on_second_page_discards_first_page() {
    let api = FakeCatalog::new(vec![numbered_page(0), numbered_page(10)]).failing_on(1);
    let err = fetch_catalog(&api, CatalogLimits::default()).await.unwrap_err();
    assert!(matches!(err, Error::Network { page: 1, .. }));
    assert_eq!(
        err.user_message(),
        "Unable to load shows. Please try again later."
    );
}

#[test]
fn rating_sort_and_toggle_survive_reload() {
    let catalog = scenario_catalog();
    let sorted = catalog::apply(catalog.shows(), &Filter::default(), SortKey::Rating);
    let names: Vec<&str> = sorted.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let dir = tempfile::tempdir().unwrap();
    let reconciler = Reconciler::new(FavoritesStore::new(
        Arc::new(FileStorage::new(dir.path())),
        DEFAULT_STORAGE_KEY,
    ));
    let outcome = reconciler.toggle(&catalog, 2).unwrap();
    assert_eq!(outcome.membership, Membership::Favorite);
    assert_eq!(outcome.durability, Durability::Persisted);

    // A fresh store over the same directory stands in for a page reload.
    let reloaded =
        FavoritesStore::new(Arc::new(FileStorage::new(dir.path())), DEFAULT_STORAGE_KEY).load();
    assert_eq!(reloaded.ids(), vec![2]);
    assert_eq!(reloaded.get(2), catalog.find(2));
}

#[test]
fn genre_filter_scenario() {
    let catalog = scenario_catalog();
    let out = catalog::apply(catalog.shows(), &Filter::genre("Drama"), SortKey::Name);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, 1);
}

#[test]
fn filtered_result_is_a_subsequence_of_matches() {
    let shows: Vec<Show> = (0..12)
        .map(|id| {
            let genre = if id % 3 == 0 { "Drama" } else { "Comedy" };
            Show::new(id, "same name").with_genres([genre])
        })
        .collect();
    // Equal names under name sort: output must keep input order.
    let out = catalog::apply(&shows, &Filter::genre("Drama"), SortKey::Name);
    let ids: Vec<u32> = out.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![0, 3, 6, 9]);
    assert!(out.iter().all(|s| s.has_genre("Drama")));
}

#[test]
fn toggle_redraws_browse_and_favorites_pages() {
    let site = tempfile::tempdir().unwrap();
    let catalog = Arc::new(scenario_catalog());
    let store = FavoritesStore::new(Arc::new(MemoryStorage::new()), DEFAULT_STORAGE_KEY);
    let reconciler = Reconciler::new(store);

    let browse = Arc::new(BrowsePage::new(
        catalog.clone(),
        Arc::new(HtmlFileSink::new(site.path().join("shows.html"))),
    ));
    let favorites = Arc::new(FavoritesPage::new(Arc::new(HtmlFileSink::new(
        site.path().join("favorites.html"),
    ))));
    let _browse_sub = reconciler.subscribe(browse.clone());
    let _favorites_sub = reconciler.subscribe(favorites.clone());

    favorites.refresh(&reconciler.store().load());
    let html = fs::read_to_string(site.path().join("favorites.html")).unwrap();
    assert!(html.contains("No favorites yet!"));

    reconciler.toggle(&catalog, 1).unwrap();
    let shows_html = fs::read_to_string(site.path().join("shows.html")).unwrap();
    let favs_html = fs::read_to_string(site.path().join("favorites.html")).unwrap();
    assert_eq!(shows_html.matches("class=\"show-card").count(), 2);
    assert!(shows_html.contains(r#"<div class="show-card favorite" data-show-id="1">"#));
    assert!(favs_html.contains(r#"data-show-id="1""#));
    assert!(!favs_html.contains(r#"data-show-id="2""#));

    reconciler.toggle(&catalog, 1).unwrap();
    let shows_html = fs::read_to_string(site.path().join("shows.html")).unwrap();
    let favs_html = fs::read_to_string(site.path().join("favorites.html")).unwrap();
    assert!(!shows_html.contains("show-card favorite"));
    assert!(favs_html.contains("No favorites yet!"));
}

#[test]
fn criteria_change_uses_cached_catalog_and_current_favorites() {
    let catalog = Arc::new(scenario_catalog());
    let site = tempfile::tempdir().unwrap();
    let page = BrowsePage::new(
        catalog,
        Arc::new(HtmlFileSink::new(site.path().join("shows.html"))),
    );
    let mut favs = FavoriteSet::new();
    favs.insert(Show::new(2, "B"));
    page.set_criteria(
        Criteria {
            filter: Filter::genre("Comedy"),
            sort: SortKey::Premiered,
        },
        &favs,
    );
    let html = fs::read_to_string(site.path().join("shows.html")).unwrap();
    assert!(html.contains(r#"<div class="show-card favorite" data-show-id="2">"#));
    assert!(!html.contains(r#"data-show-id="1""#));
}

#[test]
fn interleaved_tabs_are_last_writer_wins() {
    let storage: Arc<dyn SlotStorage> = Arc::new(MemoryStorage::new());
    let tab_a = FavoritesStore::new(storage.clone(), DEFAULT_STORAGE_KEY);
    let tab_b = FavoritesStore::new(storage, DEFAULT_STORAGE_KEY);

    let mut a = tab_a.load();
    let mut b = tab_b.load();
    a.insert(Show::new(1, "A"));
    b.insert(Show::new(2, "B"));
    assert_eq!(tab_a.save(&a), Durability::Persisted);
    assert_eq!(tab_b.save(&b), Durability::Persisted);

    // No merge: tab A's addition is gone.
    assert_eq!(tab_a.load().ids(), vec![2]);
}

#[test]
fn rejected_write_diverges_from_reload() {
    let storage = Arc::new(MemoryStorage::with_quota(8));
    let reconciler = Reconciler::new(FavoritesStore::new(storage, DEFAULT_STORAGE_KEY));
    let outcome = reconciler.toggle(&scenario_catalog(), 1).unwrap();
    assert_eq!(outcome.durability, Durability::Volatile);
    assert_eq!(outcome.favorites.ids(), vec![1]);
    assert!(reconciler.store().load().is_empty());
}

#[test]
fn corrupted_slot_recovers_to_empty_and_next_toggle_rewrites_it() {
    let storage = Arc::new(MemoryStorage::new());
    storage.write(DEFAULT_STORAGE_KEY, "{\"oops\": true}").unwrap();
    let reconciler = Reconciler::new(FavoritesStore::new(storage.clone(), DEFAULT_STORAGE_KEY));
    assert!(reconciler.store().load().is_empty());
    reconciler.toggle(&scenario_catalog(), 1).unwrap();
    let raw = storage.read(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let parsed: Vec<Show> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), 1);
}

fn app_state(api: Arc<FakeCatalog>, site: &std::path::Path) -> AppState {
    let store = FavoritesStore::new(Arc::new(MemoryStorage::new()), DEFAULT_STORAGE_KEY);
    AppState {
        api,
        reconciler: Arc::new(Reconciler::new(store)),
        limits: CatalogLimits::default(),
        output: Output::Site(site.to_path_buf()),
    }
}

#[tokio::test]
async fn toggle_command_writes_all_affected_pages() {
    let site = tempfile::tempdir().unwrap();
    let state = app_state(Arc::new(FakeCatalog::new(vec![numbered_page(1)])), site.path());

    app::run(&state, Command::Toggle { id: 4 }).await.unwrap();

    assert_eq!(state.reconciler.store().load().ids(), vec![4]);
    let favs = fs::read_to_string(site.path().join("favorites.html")).unwrap();
    assert!(favs.contains("Show 4"));
    let detail = fs::read_to_string(site.path().join("show-4.html")).unwrap();
    assert!(detail.contains("Remove from Favorites"));
    assert!(site.path().join("shows.html").exists());
}

#[tokio::test]
async fn repeated_commands_leave_no_listeners_behind() {
    let site = tempfile::tempdir().unwrap();
    let state = app_state(Arc::new(FakeCatalog::new(vec![numbered_page(1)])), site.path());

    app::run(&state, Command::Toggle { id: 4 }).await.unwrap();
    app::run(&state, Command::Toggle { id: 5 }).await.unwrap();
    app::run(&state, Command::Remove { id: 4 }).await.unwrap();
    assert_eq!(state.reconciler.listener_count(), 0);

    // Pages from earlier commands are gone, so a direct toggle redraws nothing.
    fs::remove_file(site.path().join("show-5.html")).unwrap();
    state
        .reconciler
        .toggle(&Catalog::new(numbered_page(1)), 5)
        .unwrap();
    assert!(!site.path().join("show-5.html").exists());
    assert!(state.reconciler.store().load().is_empty());
}

#[tokio::test]
async fn null_rating_in_catalog_page_does_not_fail_the_fetch() {
    let raw = r#"[{"id":1,"name":"A","rating":{"average":8.5}},{"id":2,"name":"B","rating":null,"genres":null}]"#;
    let page: Vec<Show> = serde_json::from_str(raw).unwrap();
    let api = FakeCatalog::new(vec![page]);
    let catalog = fetch_catalog(&api, CatalogLimits::default()).await.unwrap();
    let sorted = catalog::apply(catalog.shows(), &Filter::default(), SortKey::Rating);
    let names: Vec<&str> = sorted.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn toggle_command_for_unknown_show_is_an_error() {
    let site = tempfile::tempdir().unwrap();
    let state = app_state(Arc::new(FakeCatalog::new(vec![numbered_page(1)])), site.path());

    let err = app::run(&state, Command::Toggle { id: 999 }).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::ItemNotFound(999))
    ));
    assert!(state.reconciler.store().load().is_empty());
}

#[tokio::test]
async fn shows_command_draws_error_state_on_network_failure() {
    let site = tempfile::tempdir().unwrap();
    let api = Arc::new(FakeCatalog::new(vec![numbered_page(0)]).failing_on(0));
    let state = app_state(api, site.path());

    app::run(
        &state,
        Command::Shows {
            genre: None,
            sort: SortKey::Name,
        },
    )
    .await
    .unwrap();

    let html = fs::read_to_string(site.path().join("shows.html")).unwrap();
    assert!(html.contains("Unable to load shows. Please try again later."));
}

#[tokio::test]
async fn favorites_and_remove_commands_need_no_network() {
    let site = tempfile::tempdir().unwrap();
    let api = Arc::new(FakeCatalog::new(vec![numbered_page(0)]));
    let state = app_state(api.clone(), site.path());
    state
        .reconciler
        .toggle(&Catalog::new(numbered_page(0)), 3)
        .unwrap();

    app::run(&state, Command::Favorites).await.unwrap();
    let html = fs::read_to_string(site.path().join("favorites.html")).unwrap();
    assert!(html.contains("Show 3"));

    app::run(&state, Command::Remove { id: 3 }).await.unwrap();
    let html = fs::read_to_string(site.path().join("favorites.html")).unwrap();
    assert!(html.contains("No favorites yet!"));
    assert!(api.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn form_result_command_writes_escaped_page() {
    let site = tempfile::tempdir().unwrap();
    let state = app_state(Arc::new(FakeCatalog::new(Vec::new())), site.path());
    app::run(
        &state,
        Command::FormResult {
            query: "name=%3Cb%3EAda%3C%2Fb%3E&subscribe=yes".to_string(),
        },
    )
    .await
    .unwrap();
    let html = fs::read_to_string(site.path().join("form-result.html")).unwrap();
    assert!(html.contains("&lt;b&gt;Ada&lt;/b&gt;"));
    assert!(html.contains("Yes, subscribe me"));
}
