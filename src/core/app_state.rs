use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    /// Seam for the per-site extractors; tests swap in a double.
    pub source_service: Arc<dyn crate::sources::SourceService>,
    /// Time-bounded (term, source) result cache.
    pub result_cache: crate::aggregate::ResultCache,
    /// Concurrency control for external calls.
    pub outbound_limit: Arc<tokio::sync::Semaphore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("outbound_limit", &self.outbound_limit.available_permits())
            .finish()
    }
}

impl AppState {
    pub fn new(http_client: reqwest::Client) -> Self {
        let source_service: Arc<dyn crate::sources::SourceService> =
            Arc::new(crate::sources::LiveSourceService);
        Self {
            http_client,
            source_service,
            result_cache: crate::aggregate::ResultCache::new(
                crate::core::config::cache_ttl(),
                10_000,
            ),
            outbound_limit: Arc::new(tokio::sync::Semaphore::new(
                crate::core::config::outbound_limit(),
            )),
        }
    }

    pub fn with_source_service(
        mut self,
        source_service: Arc<dyn crate::sources::SourceService>,
    ) -> Self {
        self.source_service = source_service;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
