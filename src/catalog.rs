//! Filtering and ordering of the fetched show list for display.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::show::Show;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub genre: Option<String>,
}

impl Filter {
    pub fn genre(genre: impl Into<String>) -> Self {
        Self {
            genre: Some(genre.into()),
        }
    }

    /// Blank selector values mean "all genres".
    pub fn from_param(value: Option<&str>) -> Self {
        let genre = value
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string);
        Self { genre }
    }

    pub fn matches(&self, show: &Show) -> bool {
        match &self.genre {
            Some(g) => show.has_genre(g),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Rating,
    Premiered,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Rating => "rating",
            SortKey::Premiered => "premiered",
        }
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "name" => Ok(SortKey::Name),
            "rating" => Ok(SortKey::Rating),
            "premiered" | "date" => Ok(SortKey::Premiered),
            other => Err(anyhow::anyhow!(
                "sort must be 'name', 'rating' or 'premiered' (got '{}')",
                other
            )),
        }
    }
}

/// Filters then stably sorts `shows`. The input is never modified.
pub fn apply<'a>(shows: &'a [Show], filter: &Filter, sort: SortKey) -> Vec<&'a Show> {
    let mut out: Vec<&Show> = shows.iter().filter(|s| filter.matches(s)).collect();
    // slice::sort_by is stable, so equal keys keep their input order.
    match sort {
        SortKey::Name => out.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::Rating => out.sort_by(|a, b| rating_key(b).total_cmp(&rating_key(a))),
        SortKey::Premiered => out.sort_by(|a, b| premiere_key(b).cmp(&premiere_key(a))),
    }
    out
}

/// Distinct genres across `shows`, sorted for the genre selector.
pub fn collect_genres(shows: &[Show]) -> Vec<String> {
    let set: BTreeSet<&str> = shows
        .iter()
        .flat_map(|s| s.genres.iter().map(String::as_str))
        .filter(|g| !g.trim().is_empty())
        .collect();
    set.into_iter().map(str::to_string).collect()
}

/// Case-insensitive first; among names equal ignoring case, lowercase sorts first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    primary.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map(|(x, y)| y.is_lowercase().cmp(&x.is_lowercase()))
            .unwrap_or(Ordering::Equal)
    })
}

fn rating_key(show: &Show) -> f64 {
    match show.rating() {
        Some(r) if !r.is_nan() => r,
        _ => 0.0,
    }
}

fn premiere_key(show: &Show) -> NaiveDate {
    show.premiered
        .as_deref()
        .and_then(parse_premiere)
        .unwrap_or(NaiveDate::MIN)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
pub fn parse_premiere(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    let mut parts = raw.split('-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) => m.parse::<u32>().ok()?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}
