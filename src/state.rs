//! Shared application state injected into every handler.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::application::services::{LinkService, SourceService, StatsService};
use crate::domain::hit_worker::HitQueue;
use crate::domain::keyspace::KeySpace;
use crate::infrastructure::storage::Store;
use crate::utils::classify::{DEFAULT_GEO_COUNTRY_HEADER, request_host};
use crate::utils::code_generator::CodeGenerator;

/// Deployment settings the HTTP layer needs at request time.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Only destinations on this host may be shortened. Empty means any.
    pub restrict_domain: String,
    /// Where unknown codes are sent. `$gosURL` is replaced by the escaped short URL.
    pub redirect_404: Option<String>,
    pub geo_country_header: String,
    /// Public origin of short URLs, e.g. `https://sho.rt`.
    pub base_url: Option<String>,
    pub sources_top_n: usize,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            restrict_domain: String::new(),
            redirect_404: None,
            geo_country_header: DEFAULT_GEO_COUNTRY_HEADER.to_string(),
            base_url: None,
            sources_top_n: crate::application::services::source_service::DEFAULT_TOP_N,
        }
    }
}

impl SiteSettings {
    /// Absolute short URL for `code`.
    ///
    /// Uses `base_url` when configured, else `http://{Host}/{code}`.
    pub fn short_url(&self, headers: &HeaderMap, code: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), code),
            None => format!("http://{}/{}", request_host(headers), code),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    pub source_service: Arc<SourceService>,
    pub hit_queue: HitQueue,
    pub store: Arc<dyn Store>,
    pub settings: Arc<SiteSettings>,
}

impl AppState {
    /// Wires the services around a single store.
    pub fn new(
        store: Arc<dyn Store>,
        keys: KeySpace,
        generator: CodeGenerator,
        settings: SiteSettings,
        hit_queue: HitQueue,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(store.clone(), keys.clone(), generator));
        let stats_service = Arc::new(StatsService::new(store.clone(), keys.clone()));
        let source_service = Arc::new(SourceService::new(
            store.clone(),
            keys,
            settings.sources_top_n,
        ));

        Self {
            link_service,
            stats_service,
            source_service,
            hit_queue,
            store,
            settings: Arc::new(settings),
        }
    }
}
