#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use chrono::{DateTime, Utc};
use shorty::application::services::{HitRecorder, RetryPolicy};
use shorty::domain::entities::{ClassifiedRequest, ShortUrl};
use shorty::domain::hit_event::HitEvent;
use shorty::domain::hit_worker::HitQueue;
use shorty::domain::keyspace::KeySpace;
use shorty::infrastructure::storage::MemoryStore;
use shorty::state::{AppState, SiteSettings};
use shorty::utils::code_generator::CodeGenerator;
use tokio::sync::mpsc;
use tower::Layer;

pub const TEST_PREFIX: &str = "test:";

pub fn keys() -> KeySpace {
    KeySpace::new(TEST_PREFIX)
}

/// State over a fresh in-memory store; queued hits land in the returned receiver.
pub fn create_test_state() -> (AppState, Arc<MemoryStore>, mpsc::Receiver<HitEvent>) {
    create_test_state_with(SiteSettings::default())
}

pub fn create_test_state_with(
    settings: SiteSettings,
) -> (AppState, Arc<MemoryStore>, mpsc::Receiver<HitEvent>) {
    let store = Arc::new(MemoryStore::new());
    let (hit_queue, rx) = HitQueue::channel(100);

    let state = AppState::new(
        store.clone(),
        keys(),
        CodeGenerator::default(),
        settings,
        hit_queue,
    );

    (state, store, rx)
}

pub async fn create_test_link(state: &AppState, url: &str) -> ShortUrl {
    state.link_service.create(url, "").await.unwrap()
}

pub fn recorder(store: Arc<MemoryStore>) -> HitRecorder {
    HitRecorder::new(store, keys(), RetryPolicy::none())
}

/// Records `count` hits at `at`, all from `referrer` (or direct).
pub async fn record_hits(
    store: &Arc<MemoryStore>,
    short_url: &ShortUrl,
    count: usize,
    referrer: Option<&str>,
    at: DateTime<Utc>,
) {
    let recorder = recorder(store.clone());
    let request = ClassifiedRequest::new(at, referrer.map(str::to_string), None);

    for _ in 0..count {
        recorder.record_hit(short_url, &request).await.unwrap();
    }
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
