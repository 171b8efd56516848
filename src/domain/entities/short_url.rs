//! ShortUrl entity representing a short code mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code and the absolute URL it redirects to.
///
/// Immutable once created. Hit counters for the code are stored separately
/// and keyed by [`ShortUrl::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortUrl {
    pub id: String,
    pub destination: String,
    pub created: DateTime<Utc>,
}

impl ShortUrl {
    /// Creates a new ShortUrl instance.
    pub fn new(id: String, destination: String, created: DateTime<Utc>) -> Self {
        Self {
            id,
            destination,
            created,
        }
    }

    /// Rebuilds a record from its stored form.
    pub fn from_stored(id: impl Into<String>, stored: StoredShortUrl) -> Self {
        Self {
            id: id.into(),
            destination: stored.destination,
            created: stored.created,
        }
    }

    /// Returns the value persisted under the record key.
    ///
    /// The id is the key itself and is not repeated in the value.
    pub fn to_stored(&self) -> StoredShortUrl {
        StoredShortUrl {
            destination: self.destination.clone(),
            created: self.created,
        }
    }
}

/// Persisted representation of a [`ShortUrl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredShortUrl {
    pub destination: String,
    pub created: DateTime<Utc>,
}
