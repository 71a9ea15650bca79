//! TF-IDF vectorizer restored from an exported artifact.
//!
//! Tokenisation follows the exporter's defaults: optional lowercasing, tokens
//! of two or more word characters, stop-word removal, then word n-grams joined
//! by a single space.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::classifier::{FeatureVector, ModelError};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default)]
    stop_words: HashSet<String>,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl TfidfVectorizer {
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Invalid(format!(
                "ngram_range ({min_n}, {max_n}) must satisfy 1 <= min <= max"
            )));
        }
        if self.vocabulary.len() != self.idf.len() {
            return Err(ModelError::Invalid(format!(
                "vectorizer has {} vocabulary terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }
        if let Some((term, idx)) = self.vocabulary.iter().find(|(_, idx)| **idx >= self.idf.len()) {
            return Err(ModelError::Invalid(format!(
                "vocabulary term '{term}' maps to index {idx}, outside {} features",
                self.idf.len()
            )));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Invalid("idf weights must be finite".into()));
        }
        Ok(())
    }

    pub fn transform(&self, text: &str) -> FeatureVector {
        let doc: Cow<str> = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&doc)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let mut counts: HashMap<usize, f64> = HashMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                let term: Cow<str> = if n == 1 {
                    Cow::Borrowed(window[0])
                } else {
                    Cow::Owned(window.join(" "))
                };
                if let Some(&idx) = self.vocabulary.get(&*term) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();

        if let Some(norm) = self.norm {
            let total = match norm {
                Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
                Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            };
            if total > 0.0 {
                for (_, v) in entries.iter_mut() {
                    *v /= total;
                }
            }
        }

        FeatureVector::new(self.n_features(), entries)
    }
}
