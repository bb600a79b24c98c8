use thiserror::Error;

use crate::show::ShowId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A catalog page request failed in transport or returned a non-success status.
    #[error("Catalog request for page {page} failed: {message}")]
    Network { page: u32, message: String },

    #[error("Stored favorites are malformed: {0}")]
    StorageParse(String),

    #[error("Failed to write storage slot '{key}': {message}")]
    StorageWrite { key: String, message: String },

    #[error("Failed to read storage slot '{key}': {message}")]
    StorageRead { key: String, message: String },

    /// Toggle requested for an id that is neither a favorite nor in the loaded catalog.
    #[error("Show {0} is not in the loaded catalog")]
    ItemNotFound(ShowId),
}

impl Error {
    pub fn network(page: u32, message: impl ToString) -> Self {
        Self::Network {
            page,
            message: message.to_string(),
        }
    }

    /// Message shown to the user in place of the browse grid.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::Network { .. } => "Unable to load shows. Please try again later.",
            Error::ItemNotFound(_) => "That show is not available.",
            Error::StorageParse(_) | Error::StorageWrite { .. } | Error::StorageRead { .. } => {
                "Favorites are unavailable right now."
            }
        }
    }
}
