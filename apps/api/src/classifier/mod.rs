//! Resume Classifier — maps resume text to a role category.
//!
//! The model itself is trained elsewhere. This module only loads the exported
//! artifacts (a TF-IDF vectorizer and a linear classifier, both JSON) and
//! exposes them behind the `ResumeClassifier` trait:
//!
//! - `vectorize(text) -> FeatureVector`
//! - `predict(&FeatureVector) -> Prediction`
//!
//! `AppState` holds an `Arc<dyn ResumeClassifier>` built once at startup.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

pub mod linear;
pub mod tfidf;

pub use linear::LinearClassifier;
pub use tfidf::TfidfVectorizer;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    Invalid(String),

    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Contract types
// ────────────────────────────────────────────────────────────────────────────

/// Sparse numeric representation of a document. Entries are sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(idx, _)| *idx);
        Self { dimension, entries }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at `idx`, 0.0 for absent entries.
    #[cfg(test)]
    pub fn get(&self, idx: usize) -> f64 {
        self.entries
            .binary_search_by_key(&idx, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product against a dense weight row. Indices past the row are ignored.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(idx, value)| weights.get(*idx).map(|w| w * value))
            .sum()
    }
}

/// Classifier output: the winning label plus the full class distribution,
/// ordered like the model's class list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub probabilities: Vec<f64>,
}

impl Prediction {
    /// Highest class probability (0.0 – 1.0).
    pub fn confidence(&self) -> f64 {
        self.probabilities.iter().copied().fold(0.0, f64::max)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Text in, (label, probability distribution) out.
///
/// Implementations are immutable after construction and shared across
/// requests, hence `Send + Sync`.
pub trait ResumeClassifier: Send + Sync {
    fn vectorize(&self, text: &str) -> Result<FeatureVector, ModelError>;

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ModelError>;

    /// Closed label set, in probability order.
    fn categories(&self) -> &[String];

    fn feature_dimension(&self) -> usize;

    fn classify(&self, text: &str) -> Result<Prediction, ModelError> {
        let features = self.vectorize(text)?;
        if features.is_empty() {
            tracing::debug!("No known vocabulary in resume text; prediction rests on intercepts");
        }
        self.predict(&features)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ModelBundle — default implementation backed by exported artifacts
// ────────────────────────────────────────────────────────────────────────────

/// A validated vectorizer + classifier pair.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    vectorizer: TfidfVectorizer,
    model: LinearClassifier,
}

impl ModelBundle {
    /// Pairs the two artifacts, rejecting any shape disagreement between them.
    pub fn new(vectorizer: TfidfVectorizer, model: LinearClassifier) -> Result<Self, ModelError> {
        vectorizer.validate()?;
        model.validate(vectorizer.n_features())?;
        Ok(Self { vectorizer, model })
    }

    /// Loads both artifacts from disk. Called once at process start.
    pub fn load(vectorizer_path: &Path, classifier_path: &Path) -> Result<Self, ModelError> {
        let vectorizer: TfidfVectorizer = read_artifact(vectorizer_path)?;
        let model: LinearClassifier = read_artifact(classifier_path)?;
        let bundle = Self::new(vectorizer, model)?;

        info!(
            categories = bundle.model.classes().len(),
            features = bundle.vectorizer.n_features(),
            "Loaded resume classifier"
        );
        Ok(bundle)
    }
}

impl ResumeClassifier for ModelBundle {
    fn vectorize(&self, text: &str) -> Result<FeatureVector, ModelError> {
        Ok(self.vectorizer.transform(text))
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        self.model.predict(features)
    }

    fn categories(&self) -> &[String] {
        self.model.classes()
    }

    fn feature_dimension(&self) -> usize {
        self.vectorizer.n_features()
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
        path: path.display().to_string(),
        source,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(value: serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{value}").unwrap();
        file
    }

    fn vectorizer_json() -> serde_json::Value {
        json!({
            "vocabulary": {"python": 0, "pandas": 1, "react": 2, "css": 3},
            "idf": [1.0, 1.0, 1.0, 1.0]
        })
    }

    fn classifier_json() -> serde_json::Value {
        json!({
            "classes": ["Data Science", "Web Development"],
            "coef": [[2.0, 2.0, 0.0, 0.0], [0.0, 0.0, 2.0, 2.0]],
            "intercept": [0.0, 0.0],
            "link": "softmax"
        })
    }

    #[test]
    fn test_feature_vector_sorts_and_looks_up() {
        let v = FeatureVector::new(5, vec![(3, 0.5), (1, 2.0)]);
        assert_eq!(v.entries(), &[(1, 2.0), (3, 0.5)]);
        assert_eq!(v.get(1), 2.0);
        assert_eq!(v.get(2), 0.0);
        assert_eq!(v.dot(&[1.0, 1.0, 1.0, 2.0, 1.0]), 3.0);
    }

    #[test]
    fn test_prediction_confidence_is_max_probability() {
        let p = Prediction {
            label: "B".into(),
            probabilities: vec![0.2, 0.7, 0.1],
        };
        assert!((p.confidence() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_and_classify() {
        let vec_file = write_json(vectorizer_json());
        let clf_file = write_json(classifier_json());

        let bundle = ModelBundle::load(vec_file.path(), clf_file.path()).unwrap();
        assert_eq!(bundle.feature_dimension(), 4);
        assert_eq!(bundle.categories().len(), 2);

        let ds = bundle.classify("Python and Pandas for analysis").unwrap();
        assert_eq!(ds.label, "Data Science");
        assert!(ds.confidence() > 0.5);

        let web = bundle.classify("React with modern CSS").unwrap();
        assert_eq!(web.label, "Web Development");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let bundle = ModelBundle::new(
            serde_json::from_value(vectorizer_json()).unwrap(),
            serde_json::from_value(classifier_json()).unwrap(),
        )
        .unwrap();
        let a = bundle.classify("python react").unwrap();
        let b = bundle.classify("python react").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shape_mismatch_rejected_at_load() {
        let vec_file = write_json(vectorizer_json());
        let clf_file = write_json(json!({
            "classes": ["A", "B"],
            "coef": [[1.0, 0.0], [0.0, 1.0]],
            "intercept": [0.0, 0.0]
        }));

        let err = ModelBundle::load(vec_file.path(), clf_file.path()).unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let clf_file = write_json(classifier_json());
        let err = ModelBundle::load(Path::new("/definitely/not/here.json"), clf_file.path())
            .unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_malformed_artifact_is_parse_error() {
        let mut bad = NamedTempFile::new().unwrap();
        write!(bad, "{{ not json").unwrap();
        let clf_file = write_json(classifier_json());

        let err = ModelBundle::load(bad.path(), clf_file.path()).unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
    }

    #[test]
    fn test_bundled_demo_artifacts_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        let bundle = ModelBundle::load(
            &dir.join("tfidf_vectorizer.json"),
            &dir.join("resume_classifier_model.json"),
        )
        .unwrap();
        assert_eq!(bundle.categories().len(), 5);

        let ds = bundle
            .classify("Trained machine learning models in Python with pandas and numpy")
            .unwrap();
        assert_eq!(ds.label, "Data Science");

        let ops = bundle
            .classify("Ran Kubernetes and Docker on AWS, provisioned with Terraform")
            .unwrap();
        assert_eq!(ops.label, "DevOps Engineer");
    }

    #[test]
    fn test_predict_rejects_foreign_feature_vector() {
        let bundle = ModelBundle::new(
            serde_json::from_value(vectorizer_json()).unwrap(),
            serde_json::from_value(classifier_json()).unwrap(),
        )
        .unwrap();
        let err = bundle
            .predict(&FeatureVector::new(10, vec![(0, 1.0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::DimensionMismatch {
                expected: 4,
                actual: 10
            }
        ));
    }
}
