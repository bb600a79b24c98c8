//! Fetch one TVMaze catalog page and print how each show maps to display fields.
//! Usage:
//!   cargo run --bin tvmaze_props -- <page> [limit]
//! Honors MOVIEVERSE_API_BASE from the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use movieverse::config::Config;
use movieverse::tvmaze::{CatalogApi, TvmazeClient};
use serde_json::{json, Value};
use std::env;

fn parse_args() -> Result<(u32, usize)> {
    let mut args = env::args().skip(1);
    let page = match args.next() {
        Some(p) => p.parse().context("page must be a number")?,
        None => 0,
    };
    let limit = match args.next() {
        Some(l) => l.parse().context("limit must be a number")?,
        None => 5,
    };
    Ok((page, limit))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let (page, limit) = parse_args()?;
    let config = Config::from_env()?;
    let client = TvmazeClient::new(config.api_base.clone(), config.http_timeout)?;

    let shows = client
        .fetch_page(page)
        .await
        .with_context(|| format!("Failed to fetch page {}", page))?;
    println!("Page {} returned {} shows", page, shows.len());

    let mapped: Vec<Value> = shows
        .iter()
        .take(limit)
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "rating": s.rating_label(),
                "card_genres": s.card_genres(),
                "premiered": s.premiered_label(),
                "network": s.network_label(),
                "status": s.status_label(),
                "image": s.card_image(),
                "summary": s.plain_summary(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&mapped)?);
    Ok(())
}
