use serde::{Deserialize, Deserializer, Serialize};

use crate::text;

pub type ShowId = u32;

const NO_IMAGE: &str = "images/no-image.jpg";

/// A catalog entry as served by TVMaze. The same shape is persisted in the
/// favorites slot, so stored favorites stay readable by anything that speaks
/// the remote format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub name: String,
    #[serde(default)]
    pub image: Option<ShowImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: Rating,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub premiered: Option<String>,
    #[serde(default)]
    pub network: Option<Network>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowImage {
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Show {
    /// Minimal record, mostly for tests and fixtures.
    pub fn new(id: ShowId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image: None,
            rating: Rating::default(),
            genres: Vec::new(),
            premiered: None,
            network: None,
            status: None,
            summary: None,
        }
    }

    pub fn with_rating(mut self, average: Option<f64>) -> Self {
        self.rating = Rating { average };
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::<String>::into).collect();
        self
    }

    pub fn with_premiered(mut self, premiered: impl Into<String>) -> Self {
        self.premiered = Some(premiered.into());
        self
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating.average
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(|i| i.medium.as_deref())
    }

    pub fn card_image(&self) -> &str {
        self.image_url().unwrap_or(NO_IMAGE)
    }

    pub fn rating_label(&self) -> String {
        // A zero average displays as N/A, same as a missing one.
        match self.rating() {
            Some(r) if r != 0.0 => format!("{:.1}", r),
            _ => "N/A".to_string(),
        }
    }

    pub fn card_genres(&self) -> String {
        let joined = self
            .genres
            .iter()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if joined.is_empty() {
            "Unspecified".to_string()
        } else {
            joined
        }
    }

    pub fn detail_genres(&self) -> String {
        if self.genres.is_empty() {
            "Not specified".to_string()
        } else {
            self.genres.join(", ")
        }
    }

    pub fn premiered_label(&self) -> &str {
        self.premiered.as_deref().unwrap_or("N/A")
    }

    pub fn network_label(&self) -> &str {
        self.network
            .as_ref()
            .map(|n| n.name.as_str())
            .unwrap_or("Not available")
    }

    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("Unknown")
    }

    pub fn plain_summary(&self) -> String {
        match self.summary.as_deref() {
            Some(s) if !s.is_empty() => text::strip_tags(s),
            _ => "No summary available".to_string(),
        }
    }
}
