use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog;
use crate::cli::Command;
use crate::config::Config;
use crate::courses;
use crate::error::Error;
use crate::favorites::{Membership, Reconciler, ToggleOutcome};
use crate::form_result;
use crate::pages::{BrowsePage, Criteria, DetailPage, FavoritesPage, BROWSE_TITLE};
use crate::render::{page_document, HtmlFileSink, RenderSink, TerminalSink};
use crate::show::ShowId;
use crate::storage::{write_replace, FileStorage, MemoryStorage, SlotStorage};
use crate::store::{Durability, FavoritesStore};
use crate::tvmaze::{self, Catalog, CatalogApi, CatalogLimits, TvmazeClient};

/// Where pages are drawn: the terminal, or HTML files in a site directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Terminal,
    Site(PathBuf),
}

impl Output {
    pub fn sink(&self, file_name: &str) -> Arc<dyn RenderSink> {
        match self {
            Output::Terminal => Arc::new(TerminalSink::stdout()),
            Output::Site(dir) => Arc::new(HtmlFileSink::new(dir.join(file_name))),
        }
    }

    fn site_dir(&self) -> Option<&Path> {
        match self {
            Output::Terminal => None,
            Output::Site(dir) => Some(dir),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CatalogApi>,
    pub reconciler: Arc<Reconciler>,
    pub limits: CatalogLimits,
    pub output: Output,
}

impl AppState {
    pub fn from_config(config: &Config, output: Output, ephemeral: bool) -> Result<Self> {
        let storage: Arc<dyn SlotStorage> = if ephemeral {
            info!("Using in-memory favorites storage");
            Arc::new(MemoryStorage::new())
        } else {
            Arc::new(FileStorage::new(&config.data_dir))
        };
        let store = FavoritesStore::new(storage, config.storage_key.clone());
        let api: Arc<dyn CatalogApi> = Arc::new(
            TvmazeClient::new(config.api_base.clone(), config.http_timeout)
                .context("Failed to create catalog client")?,
        );
        Ok(Self {
            api,
            reconciler: Arc::new(Reconciler::new(store)),
            limits: config.limits,
            output,
        })
    }

    fn store(&self) -> &FavoritesStore {
        self.reconciler.store()
    }

    /// Fetches the catalog, drawing the error state on `sink` when it fails.
    async fn load_catalog(&self, sink: &dyn RenderSink) -> Option<Arc<Catalog>> {
        match tvmaze::fetch_catalog(self.api.as_ref(), self.limits).await {
            Ok(catalog) => Some(Arc::new(catalog)),
            Err(e) => {
                sink.error(BROWSE_TITLE, e.user_message());
                None
            }
        }
    }
}

pub async fn run(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Shows { genre, sort } => {
            let sink = state.output.sink("shows.html");
            let Some(catalog) = state.load_catalog(sink.as_ref()).await else {
                return Ok(());
            };
            let page = BrowsePage::new(catalog, sink);
            let criteria = Criteria {
                filter: catalog::Filter::from_param(genre.as_deref()),
                sort,
            };
            page.set_criteria(criteria, &state.store().load());
        }
        Command::Show { id } => {
            let sink = state.output.sink(&format!("show-{id}.html"));
            let Some(catalog) = state.load_catalog(sink.as_ref()).await else {
                return Ok(());
            };
            let show = catalog
                .find(id)
                .cloned()
                .ok_or(Error::ItemNotFound(id))?;
            DetailPage::new(show, sink).refresh(&state.store().load());
        }
        Command::Favorites => {
            let page = FavoritesPage::new(state.output.sink("favorites.html"));
            page.refresh(&state.store().load());
        }
        Command::Toggle { id } => toggle(state, id).await?,
        Command::Remove { id } => {
            let page = Arc::new(FavoritesPage::new(state.output.sink("favorites.html")));
            let _page = state.reconciler.subscribe(page);
            let outcome = state.reconciler.remove(id);
            report_durability(&outcome);
        }
        Command::Featured => {
            let sink = state.output.sink("index.html");
            // Sub-second clock noise is enough to vary the pick between runs.
            let seed = Utc::now().timestamp_subsec_nanos() as usize;
            match tvmaze::fetch_featured(state.api.as_ref(), |len| seed % len).await {
                Ok(Some(show)) => {
                    let favorite = state.store().load().contains(show.id);
                    sink.featured(&show, favorite);
                }
                Ok(None) => sink.empty("Home", "No featured show available."),
                Err(_) => sink.error(
                    "Home",
                    "Unable to load featured show. Please try again later.",
                ),
            }
        }
        Command::Genres => {
            let sink = state.output.sink("shows.html");
            let Some(catalog) = state.load_catalog(sink.as_ref()).await else {
                return Ok(());
            };
            for genre in catalog::collect_genres(catalog.shows()) {
                println!("{}", genre);
            }
        }
        Command::FormResult { query } => {
            let pairs = form_result::decode_query(&query);
            let missing = form_result::missing_required(&pairs);
            if !pairs.is_empty() && !missing.is_empty() {
                warn!("Form is missing required fields: {}", missing.join(", "));
            }
            match state.output.site_dir() {
                Some(dir) => {
                    let doc = page_document("Form Result", &form_result::render_html(&pairs));
                    write_replace(&dir.join("form-result.html"), &doc)
                        .context("Failed to write form result page")?;
                }
                None => print!("{}", form_result::render_text(&pairs)),
            }
        }
        Command::Courses { subject, set } => {
            let list = courses::filter_courses(set.courses(), subject.as_deref());
            print!("{}", courses::render_text(&list));
        }
    }
    Ok(())
}

async fn toggle(state: &AppState, id: ShowId) -> Result<()> {
    let browse_sink = state.output.sink("shows.html");
    let Some(catalog) = state.load_catalog(browse_sink.as_ref()).await else {
        return Ok(());
    };
    let browse = Arc::new(BrowsePage::new(catalog.clone(), browse_sink));
    let favorites = Arc::new(FavoritesPage::new(state.output.sink("favorites.html")));
    let mut subscriptions = vec![
        state.reconciler.subscribe(browse),
        state.reconciler.subscribe(favorites),
    ];
    if let Some(show) = catalog.find(id).cloned() {
        let detail = DetailPage::new(show, state.output.sink(&format!("show-{id}.html")));
        subscriptions.push(state.reconciler.subscribe(Arc::new(detail)));
    }

    let outcome = state.reconciler.toggle(&catalog, id)?;
    match outcome.membership {
        Membership::Favorite => info!("Show {} is now a favorite", id),
        Membership::NotFavorite => info!("Show {} is no longer a favorite", id),
    }
    report_durability(&outcome);
    Ok(())
}

fn report_durability(outcome: &ToggleOutcome) {
    if outcome.durability == Durability::Volatile {
        warn!(
            "Favorites for show {} changed for this run only; storage rejected the write",
            outcome.id
        );
    }
}
