//! Application state for Axum handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::AppConfig;
use crate::service::{ShortenerService, TrackerService};
use crate::storage::DynStorage;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Storage backend.
    pub storage: Arc<DynStorage>,
    /// Exercise tracker service.
    pub tracker: Arc<TrackerService>,
    /// URL shortener service.
    pub shortener: Arc<ShortenerService>,
    /// Prometheus render handle; `None` when metrics are disabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: Arc<AppConfig>,
        storage: Arc<DynStorage>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let tracker = Arc::new(TrackerService::new(Arc::clone(&storage), &config.tracker));
        let shortener = Arc::new(ShortenerService::new(
            Arc::clone(&storage),
            &config.shortener,
        ));

        Self {
            config,
            storage,
            tracker,
            shortener,
            metrics,
        }
    }
}
