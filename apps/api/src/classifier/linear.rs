//! Linear classifier restored from an exported artifact.
//!
//! `scores = coef · x + intercept`, turned into probabilities by the link:
//! - `softmax`: multinomial logistic regression, or naive Bayes exported as
//!   feature log-probabilities + class log-priors
//! - `one_vs_rest`: per-class sigmoid, normalised to sum to 1
//!
//! A two-class model with a single coefficient row uses the binary logistic
//! form regardless of link.

use serde::Deserialize;

use crate::classifier::{FeatureVector, ModelError, Prediction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
    #[default]
    Softmax,
    OneVsRest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default)]
    link: Link,
}

impl LinearClassifier {
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    fn is_binary(&self) -> bool {
        self.classes.len() == 2 && self.coef.len() == 1
    }

    /// Checks internal consistency and agreement with the vectorizer width.
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.classes.len() < 2 {
            return Err(ModelError::Invalid(format!(
                "classifier needs at least 2 classes, found {}",
                self.classes.len()
            )));
        }
        if self.coef.len() != self.classes.len() && !self.is_binary() {
            return Err(ModelError::Invalid(format!(
                "classifier has {} classes but {} coefficient rows",
                self.classes.len(),
                self.coef.len()
            )));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(ModelError::Invalid(format!(
                "classifier has {} coefficient rows but {} intercepts",
                self.coef.len(),
                self.intercept.len()
            )));
        }
        if let Some((row, width)) = self
            .coef
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, width)| *width != n_features)
        {
            return Err(ModelError::Invalid(format!(
                "coefficient row {row} has {width} weights, vectorizer produces {n_features} features"
            )));
        }
        Ok(())
    }

    pub fn decision_function(&self, x: &FeatureVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| x.dot(row) + b)
            .collect()
    }

    pub fn predict_proba(&self, x: &FeatureVector) -> Vec<f64> {
        let scores = self.decision_function(x);

        if self.is_binary() {
            let p1 = sigmoid(scores[0]);
            return vec![1.0 - p1, p1];
        }

        match self.link {
            Link::Softmax => softmax(&scores),
            Link::OneVsRest => {
                let raw: Vec<f64> = scores.iter().map(|s| sigmoid(*s)).collect();
                let total: f64 = raw.iter().sum();
                if total > 0.0 {
                    raw.iter().map(|p| p / total).collect()
                } else {
                    vec![1.0 / raw.len() as f64; raw.len()]
                }
            }
        }
    }

    pub fn predict(&self, x: &FeatureVector) -> Result<Prediction, ModelError> {
        let expected = self.n_features();
        if x.dimension() != expected {
            return Err(ModelError::DimensionMismatch {
                expected,
                actual: x.dimension(),
            });
        }

        let probabilities = self.predict_proba(x);

        // First class wins ties.
        let mut best = 0;
        for (idx, p) in probabilities.iter().enumerate() {
            if *p > probabilities[best] {
                best = idx;
            }
        }

        Ok(Prediction {
            label: self.classes[best].clone(),
            probabilities,
        })
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}
