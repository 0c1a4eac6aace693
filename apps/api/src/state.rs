use std::sync::Arc;

use crate::analysis::analyzer::ManuscriptAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; nothing about a submission is kept here.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable analyzer. Default: GeminiAnalyzer.
    pub analyzer: Arc<dyn ManuscriptAnalyzer>,
    pub config: Config,
}
