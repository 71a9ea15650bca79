//! Fit Scoring — pluggable, trait-based scorer that measures a resume against a JD.
//!
//! Default: `KeywordFitScorer` (pure-Rust, fast, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn FitScorer>`, built at startup from the taxonomy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::screening::features::{detect_experience, detect_projects, extract_skills};
use crate::screening::taxonomy::Taxonomy;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub fit_score: f64, // 0 – 100, two decimals
    pub matched_skills: Vec<String>,
    pub total_skills: Vec<String>,
    pub experience_years: u64,
    pub project_count: u32,
}

/// Component weights of the overall fit score. They sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitWeights {
    pub skills: f64,
    pub experience: f64,
    pub projects: f64,
}

impl Default for FitWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.3,
            projects: 0.3,
        }
    }
}

/// Experience years at which the years signal saturates.
const YEARS_CAP: f64 = 10.0;
/// Keyword hits at which the experience and project keyword signals saturate.
const KEYWORD_CAP: f64 = 5.0;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The fit scorer trait. Implement this to swap backends without touching
/// the endpoint, handler, or pipeline code.
pub trait FitScorer: Send + Sync {
    fn score(&self, resume_text: &str, job_description: &str) -> FitResult;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordFitScorer — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Algorithm:
/// 1. skill_match = |resume skills ∩ JD skills| / |JD skills| (0 if the JD has none)
/// 2. exp_score = 0.5·min(years/10, 1) + 0.5·min(keywords/5, 1)
/// 3. project_score = min(projects/5, 1)
/// 4. fit = 100 × (0.4·skill_match + 0.3·exp_score + 0.3·project_score)
pub struct KeywordFitScorer {
    taxonomy: Arc<Taxonomy>,
    weights: FitWeights,
}

impl KeywordFitScorer {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            taxonomy,
            weights: FitWeights::default(),
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }
}

impl FitScorer for KeywordFitScorer {
    fn score(&self, resume_text: &str, job_description: &str) -> FitResult {
        calculate_fit_score(resume_text, job_description, &self.taxonomy, &self.weights)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core fit algorithm
// ────────────────────────────────────────────────────────────────────────────

pub fn calculate_fit_score(
    resume_text: &str,
    job_description: &str,
    taxonomy: &Taxonomy,
    weights: &FitWeights,
) -> FitResult {
    let resume_skills = extract_skills(resume_text, taxonomy);
    let job_skills = extract_skills(job_description, taxonomy);

    let matched_skills: Vec<String> = resume_skills
        .iter()
        .filter(|s| job_skills.contains(s))
        .cloned()
        .collect();

    let skill_match = if job_skills.is_empty() {
        0.0
    } else {
        matched_skills.len() as f64 / job_skills.len() as f64
    };

    let experience = detect_experience(resume_text, taxonomy);
    let exp_score = 0.5 * capped(experience.years as f64, YEARS_CAP)
        + 0.5 * capped(experience.experience_keywords as f64, KEYWORD_CAP);

    let project_count = detect_projects(resume_text, taxonomy);
    let project_score = capped(project_count as f64, KEYWORD_CAP);

    let fit = (weights.skills * skill_match
        + weights.experience * exp_score
        + weights.projects * project_score)
        * 100.0;

    FitResult {
        fit_score: round2(fit.clamp(0.0, 100.0)),
        matched_skills,
        total_skills: resume_skills,
        experience_years: experience.years,
        project_count,
    }
}

/// `value / cap`, saturating at 1.0.
fn capped(value: f64, cap: f64) -> f64 {
    (value / cap).min(1.0)
}

/// Rounds to two decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
