//! Shared fixtures for unit and router tests.

use std::sync::Arc;

use crate::classifier::{FeatureVector, ModelError, Prediction, ResumeClassifier};
use crate::config::Config;
use crate::screening::fit_scoring::{FitScorer, KeywordFitScorer};
use crate::screening::taxonomy::Taxonomy;
use crate::state::AppState;

/// Two-class stand-in for the trained model: anything mentioning React or
/// CSS is web development, everything else data science.
pub struct StubClassifier {
    categories: Vec<String>,
}

impl StubClassifier {
    pub fn new() -> Self {
        Self {
            categories: vec!["Data Science".to_string(), "Web Development".to_string()],
        }
    }
}

impl ResumeClassifier for StubClassifier {
    fn vectorize(&self, text: &str) -> Result<FeatureVector, ModelError> {
        let lower = text.to_lowercase();
        let web = lower.contains("react") || lower.contains("css");
        Ok(FeatureVector::new(2, vec![(usize::from(web), 1.0)]))
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        let probabilities = if features.get(1) > 0.0 {
            vec![0.2, 0.8]
        } else {
            vec![0.75, 0.25]
        };
        let label = if probabilities[1] > probabilities[0] {
            &self.categories[1]
        } else {
            &self.categories[0]
        };
        Ok(Prediction {
            label: label.clone(),
            probabilities,
        })
    }

    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn feature_dimension(&self) -> usize {
        2
    }
}

/// Classifier whose every prediction fails.
pub struct FailingClassifier;

impl ResumeClassifier for FailingClassifier {
    fn vectorize(&self, _text: &str) -> Result<FeatureVector, ModelError> {
        Ok(FeatureVector::new(1, vec![]))
    }

    fn predict(&self, _features: &FeatureVector) -> Result<Prediction, ModelError> {
        Err(ModelError::DimensionMismatch {
            expected: 2,
            actual: 1,
        })
    }

    fn categories(&self) -> &[String] {
        &[]
    }

    fn feature_dimension(&self) -> usize {
        2
    }
}

pub fn keyword_scorer() -> Arc<dyn FitScorer> {
    Arc::new(KeywordFitScorer::new(Arc::new(Taxonomy::default())))
}

pub fn test_state(config: Config) -> AppState {
    AppState {
        config,
        classifier: Arc::new(StubClassifier::new()),
        fit_scorer: keyword_scorer(),
    }
}
