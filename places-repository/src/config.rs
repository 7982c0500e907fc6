//! Configuration types for the search backend.

use std::time::Duration;

use crate::opensearch::index_config::{DEFAULT_MAX_RESULT_WINDOW, INDEX_NAME};

/// Configuration shared by the OpenSearch client, the provisioner and the
/// query engine.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    /// Name of the index holding place documents.
    pub index_name: String,
    /// Deadline applied to every backend request.
    pub request_timeout: Duration,
    /// Value applied to `index.max_result_window`; also bounds `offset + limit`
    /// for listing queries.
    pub max_result_window: u64,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            index_name: INDEX_NAME.to_string(),
            request_timeout: Duration::from_secs(30),
            max_result_window: DEFAULT_MAX_RESULT_WINDOW,
        }
    }
}

impl SearchIndexConfig {
    /// Use a different index name.
    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = index_name.into();
        self
    }

    /// Use a different per-request deadline.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Use a different maximum result window.
    pub fn with_max_result_window(mut self, max_result_window: u64) -> Self {
        self.max_result_window = max_result_window;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchIndexConfig::default();
        assert_eq!(config.index_name, "places");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_result_window, 20_000);
    }

    #[test]
    fn test_builders() {
        let config = SearchIndexConfig::default()
            .with_index_name("restaurants")
            .with_request_timeout(Duration::from_millis(250))
            .with_max_result_window(50_000);

        assert_eq!(config.index_name, "restaurants");
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.max_result_window, 50_000);
    }
}
