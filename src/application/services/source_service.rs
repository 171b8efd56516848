//! Referrer/country breakdown of hits.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::ShortUrl;
use crate::domain::keyspace::KeySpace;
use crate::error::AppError;
use crate::infrastructure::storage::Store;

/// Default size of the compact top-N breakdown.
pub const DEFAULT_TOP_N: usize = 10;

/// Hits counted under one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

/// Reads the per-source sorted set written by
/// [`crate::application::services::HitRecorder`].
pub struct SourceService {
    store: Arc<dyn Store>,
    keys: KeySpace,
    top_n: usize,
}

impl SourceService {
    pub fn new(store: Arc<dyn Store>, keys: KeySpace, top_n: usize) -> Self {
        Self {
            store,
            keys,
            top_n: top_n.max(1),
        }
    }

    /// Sources of hits on `short_url`, by count descending.
    ///
    /// Ties are ordered by source key. With `top_n_only` the list is cut to the
    /// configured N entries; otherwise every source is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn sources(
        &self,
        short_url: &ShortUrl,
        top_n_only: bool,
    ) -> Result<Vec<SourceCount>, AppError> {
        let limit = top_n_only.then_some(self.top_n);
        let members = self
            .store
            .sorted_set_top_n(&self.keys.sources_key(&short_url.id), limit, true)
            .await?;

        Ok(members
            .into_iter()
            .map(|(source, count)| SourceCount { source, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MockStore;
    use chrono::Utc;
    use mockall::predicate::*;

    fn short_url() -> ShortUrl {
        ShortUrl::new(
            "abcde".to_string(),
            "https://example.com/".to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_full_breakdown() {
        let mut mock_store = MockStore::new();
        mock_store
            .expect_sorted_set_top_n()
            .with(eq("t:sources:abcde"), eq(None), eq(true))
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    ("google.com".to_string(), 5),
                    ("direct".to_string(), 2),
                ])
            });

        let service = SourceService::new(Arc::new(mock_store), KeySpace::new("t:"), 10);
        let sources = service.sources(&short_url(), false).await.unwrap();

        assert_eq!(
            sources,
            vec![
                SourceCount {
                    source: "google.com".to_string(),
                    count: 5
                },
                SourceCount {
                    source: "direct".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_top_n_passes_limit() {
        let mut mock_store = MockStore::new();
        mock_store
            .expect_sorted_set_top_n()
            .with(eq("t:sources:abcde"), eq(Some(3)), eq(true))
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let service = SourceService::new(Arc::new(mock_store), KeySpace::new("t:"), 3);
        assert!(service.sources(&short_url(), true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_top_n_is_at_least_one() {
        let mut mock_store = MockStore::new();
        mock_store
            .expect_sorted_set_top_n()
            .with(always(), eq(Some(1)), eq(true))
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let service = SourceService::new(Arc::new(mock_store), KeySpace::default(), 0);
        assert!(service.sources(&short_url(), true).await.unwrap().is_empty());
    }
}
