use std::sync::Arc;

use crate::classifier::ResumeClassifier;
use crate::config::Config;
use crate::screening::fit_scoring::FitScorer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pre-trained category model, loaded once from the exported artifacts.
    pub classifier: Arc<dyn ResumeClassifier>,
    /// Pluggable fit scorer. Default: KeywordFitScorer over the configured taxonomy.
    pub fit_scorer: Arc<dyn FitScorer>,
}
