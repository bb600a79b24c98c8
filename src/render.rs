//! Render boundary: sinks that draw ordered show lists and page states.
//!
//! The core never checks whether a view exists; it always calls its sink,
//! and an absent view is simply a [`NullSink`].

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::show::{Show, ShowId};
use crate::storage::write_replace;
use crate::text::{escape_html, truncate};

/// What a page hands to its sink: an ordered list and a membership predicate.
pub struct Frame<'a> {
    pub title: &'a str,
    pub shows: &'a [&'a Show],
    pub is_favorite: &'a dyn Fn(ShowId) -> bool,
}

pub trait RenderSink: Send + Sync {
    fn draw(&self, frame: &Frame<'_>);
    /// Nothing to show, e.g. no favorites or no filter matches.
    fn empty(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
    /// A single show rendered in full, as the detail dialog does.
    fn detail(&self, show: &Show, is_favorite: bool);
    /// Home page highlight; sinks without a dedicated layout reuse the detail view.
    fn featured(&self, show: &Show, is_favorite: bool) {
        self.detail(show, is_favorite);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw(&self, _frame: &Frame<'_>) {}
    fn empty(&self, _title: &str, _message: &str) {}
    fn error(&self, _title: &str, _message: &str) {}
    fn detail(&self, _show: &Show, _is_favorite: bool) {}
}

/// Writes a complete HTML document per draw, replacing the previous file.
#[derive(Debug, Clone)]
pub struct HtmlFileSink {
    path: PathBuf,
}

impl HtmlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn publish(&self, title: &str, body: &str) {
        let doc = page_document(title, body);
        match write_replace(&self.path, &doc) {
            Ok(()) => debug!(path = %self.path.display(), "Wrote page"),
            Err(e) => warn!("Failed to write {}: {}", self.path.display(), e),
        }
    }
}

impl RenderSink for HtmlFileSink {
    fn draw(&self, frame: &Frame<'_>) {
        self.publish(frame.title, &cards_html(frame));
    }

    fn empty(&self, title: &str, message: &str) {
        let body = format!(
            "<div class=\"empty-state\"><p>{}</p></div>",
            escape_html(message)
        );
        self.publish(title, &body);
    }

    fn error(&self, title: &str, message: &str) {
        let body = format!(
            "<div class=\"error-message\"><p>{}</p></div>",
            escape_html(message)
        );
        self.publish(title, &body);
    }

    fn detail(&self, show: &Show, is_favorite: bool) {
        self.publish(&show.name, &detail_html(show, is_favorite));
    }

    fn featured(&self, show: &Show, _is_favorite: bool) {
        self.publish("Home", &featured_html(show));
    }
}

/// Plain text listing, one line per card.
pub struct TerminalSink<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: Mutex::new(io::stdout()),
        }
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|p| p.into_inner())
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write + Send> RenderSink for TerminalSink<W> {
    fn draw(&self, frame: &Frame<'_>) {
        let mut text = format!("== {} ({}) ==\n", frame.title, frame.shows.len());
        for show in frame.shows {
            let star = if (frame.is_favorite)(show.id) { "*" } else { " " };
            let _ = writeln!(
                text,
                "{} [{:>6}] {} | {}/10 | {} | Premiered: {}",
                star,
                show.id,
                show.name,
                show.rating_label(),
                show.card_genres(),
                show.premiered_label()
            );
        }
        self.emit(&text);
    }

    fn empty(&self, title: &str, message: &str) {
        self.emit(&format!("== {} ==\n{}\n", title, message));
    }

    fn error(&self, title: &str, message: &str) {
        self.emit(&format!("== {} ==\n{}\n", title, message));
    }

    fn detail(&self, show: &Show, is_favorite: bool) {
        let action = if is_favorite {
            "Remove from Favorites"
        } else {
            "Add to Favorites"
        };
        let text = format!(
            "== {} ==\nRating: {} / 10\nGenres: {}\nNetwork: {}\nPremiered: {}\nStatus: {}\nSummary:\n{}\n[{}]\n",
            show.name,
            show.rating_label(),
            show.detail_genres(),
            show.network_label(),
            show.premiered_label(),
            show.status_label(),
            show.plain_summary(),
            action
        );
        self.emit(&text);
    }
}

pub fn card_html(show: &Show, favorite: bool) -> String {
    let class = if favorite {
        "show-card favorite"
    } else {
        "show-card"
    };
    let name = escape_html(&show.name);
    format!(
        r#"<div class="{class}" data-show-id="{id}">
    <div class="show-image"><img src="{img}" alt="{name}" loading="lazy"></div>
    <div class="show-info">
        <h3>{name}</h3>
        <div class="show-meta">
            <div class="show-rating">⭐ {rating}/10</div>
            <div class="show-meta">Premiered: {premiered}</div>
        </div>
        <div class="show-genres">{genres}</div>
        <a class="view-btn" href="show-{id}.html">View Details</a>
    </div>
</div>"#,
        id = show.id,
        img = escape_html(show.card_image()),
        rating = show.rating_label(),
        premiered = escape_html(show.premiered_label()),
        genres = escape_html(&show.card_genres()),
    )
}

pub fn cards_html(frame: &Frame<'_>) -> String {
    frame
        .shows
        .iter()
        .map(|s| card_html(s, (frame.is_favorite)(s.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn detail_html(show: &Show, is_favorite: bool) -> String {
    let name = escape_html(&show.name);
    let image = show
        .image_url()
        .map(|url| {
            format!(
                r#"<img src="{}" alt="{}" class="modal-image" loading="lazy">"#,
                escape_html(url),
                name
            )
        })
        .unwrap_or_default();
    let (label, class) = if is_favorite {
        ("Remove from Favorites", "modal-button remove")
    } else {
        ("Add to Favorites", "modal-button")
    };
    format!(
        r#"{image}
<h2>{name}</h2>
<p><strong>Rating:</strong> {rating} / 10</p>
<p><strong>Genres:</strong> {genres}</p>
<p><strong>Network:</strong> {network}</p>
<p><strong>Premiered:</strong> {premiered}</p>
<p><strong>Status:</strong> {status}</p>
<p><strong>Summary:</strong></p>
<p>{summary}</p>
<button class="{class}" data-show-id="{id}">{label}</button>"#,
        rating = show.rating_label(),
        genres = escape_html(&show.detail_genres()),
        network = escape_html(show.network_label()),
        premiered = escape_html(show.premiered_label()),
        status = escape_html(show.status_label()),
        summary = escape_html(&show.plain_summary()),
        id = show.id,
    )
}

/// Featured block for the home page; the summary is cut to 200 characters.
pub fn featured_html(show: &Show) -> String {
    let summary = match show.summary.as_deref() {
        Some(s) if !s.is_empty() => truncate(&show.plain_summary(), 200),
        _ => "No summary available".to_string(),
    };
    let name = escape_html(&show.name);
    format!(
        r#"<div class="featured-image"><img src="{img}" alt="{name}" loading="lazy"></div>
<div class="featured-info">
    <h3>{name}</h3>
    <div class="featured-rating"><strong>Rating:</strong> {rating} / 10</div>
    <p><strong>Genres:</strong> {genres}</p>
    <p><strong>Premiered:</strong> {premiered}</p>
    <p><strong>Network:</strong> {network}</p>
    <p><strong>Summary:</strong></p>
    <p>{summary}</p>
</div>"#,
        img = escape_html(show.card_image()),
        rating = show.rating_label(),
        genres = escape_html(&show.detail_genres()),
        premiered = escape_html(show.premiered_label()),
        network = escape_html(show.network_label()),
        summary = escape_html(&summary),
    )
}

pub fn page_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>MovieVerse | {}</title>\n<link rel=\"stylesheet\" href=\"styles/main.css\">\n</head>\n<body>\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}
