use serde::{Deserialize, Serialize};

use crate::screening::fit_scoring::FitResult;

/// One screened resume as returned by `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub filename: String,
    pub category: String,
    pub category_confidence: f64, // 0 – 100, two decimals
    pub fit_score: f64,           // 0 – 100, two decimals
    pub matched_skills: Vec<String>,
    pub total_skills: Vec<String>,
    pub experience_years: u64,
    pub project_count: u32,
    /// 1-based position after ranking; 0 until ranked.
    pub rank: usize,
}

impl AnalysisResult {
    pub fn new(
        filename: String,
        category: String,
        category_confidence: f64,
        fit: FitResult,
    ) -> Self {
        Self {
            filename,
            category,
            category_confidence,
            fit_score: fit.fit_score,
            matched_skills: fit.matched_skills,
            total_skills: fit.total_skills,
            experience_years: fit.experience_years,
            project_count: fit.project_count,
            rank: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub results: Vec<AnalysisResult>,
}
