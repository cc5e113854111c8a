use std::sync::Arc;

use crate::provider::ResumeProvider;
use crate::stats::ResumeStats;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub provider: ResumeProvider,
    /// Outcome counters, reported by `/health`.
    pub stats: Arc<ResumeStats>,
}
