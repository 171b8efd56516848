//! Short-code registry: link creation and retrieval.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{ShortUrl, StoredShortUrl};
use crate::domain::keyspace::KeySpace;
use crate::error::AppError;
use crate::infrastructure::storage::Store;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_normalizer::normalize_destination;

/// Service for creating and retrieving short URLs.
///
/// The registry is the only writer of short URL records. A record is written
/// once with set-if-absent and never modified afterwards.
pub struct LinkService {
    store: Arc<dyn Store>,
    keys: KeySpace,
    generator: CodeGenerator,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(store: Arc<dyn Store>, keys: KeySpace, generator: CodeGenerator) -> Self {
        Self {
            store,
            keys,
            generator,
        }
    }

    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }

    /// Creates a short URL for `destination`.
    ///
    /// When `restrict_to_domain` is non-empty, only destinations whose host
    /// equals it (case-insensitively) are accepted.
    ///
    /// # Code Generation
    ///
    /// Random codes are claimed with set-if-absent on the record key, so among
    /// concurrent creators exactly one wins a given code. Losers draw again,
    /// up to the generator's attempt limit.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the destination is empty or not an absolute HTTP(S) URL
    /// - [`AppError::DomainRestricted`] if the host does not match `restrict_to_domain`
    /// - [`AppError::CodeGenerationExhausted`] if every drawn code was taken
    /// - [`AppError::Storage`] on store failures
    pub async fn create(
        &self,
        destination: &str,
        restrict_to_domain: &str,
    ) -> Result<ShortUrl, AppError> {
        let dest = normalize_destination(destination).map_err(|e| {
            AppError::invalid_url(e.to_string(), json!({ "url": destination }))
        })?;

        let allowed = restrict_to_domain.trim();
        if !allowed.is_empty() && !dest.host.eq_ignore_ascii_case(allowed) {
            return Err(AppError::domain_restricted(
                format!("Only URLs on {} can be shortened", allowed),
                json!({ "allowed_domain": allowed, "host": dest.host }),
            ));
        }

        let stored = StoredShortUrl {
            destination: dest.url,
            created: Utc::now(),
        };
        let value = serde_json::to_string(&stored).map_err(|e| {
            AppError::storage(
                "Failed to encode short URL record",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let id = self
            .generator
            .generate_unique(|code| {
                let store = self.store.clone();
                let key = self.keys.url_key(&code);
                let value = value.as_str();
                async move { Ok(store.set_if_absent(&key, value).await?) }
            })
            .await?;

        info!(code = %id, destination = %stored.destination, "Short URL created");
        metrics::counter!("shorty_links_created_total").increment(1);

        Ok(ShortUrl::from_stored(id, stored))
    }

    /// Looks up a short URL by its code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortUrl))` if the code exists
    /// - `Ok(None)` if it does not; nothing is created
    ///
    /// Codes this generator could never have issued are answered without a
    /// store round trip.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store fails or the stored record
    /// cannot be decoded.
    pub async fn get(&self, id: &str) -> Result<Option<ShortUrl>, AppError> {
        if !self.generator.is_valid_code(id) {
            debug!(code = %id, "Malformed short code");
            return Ok(None);
        }

        let Some(raw) = self.store.get_value(&self.keys.url_key(id)).await? else {
            return Ok(None);
        };

        let stored: StoredShortUrl = serde_json::from_str(&raw).map_err(|e| {
            AppError::storage(
                "Corrupt short URL record",
                json!({ "code": id, "reason": e.to_string() }),
            )
        })?;

        Ok(Some(ShortUrl::from_stored(id, stored)))
    }
}
