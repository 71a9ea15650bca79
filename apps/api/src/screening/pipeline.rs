//! Batch screening — extract, classify, score, and rank one request's resumes.
//!
//! Runs synchronously; the handler moves it onto the blocking pool.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::classifier::ResumeClassifier;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::screening::extraction::{extract_resume_text, TextDecoding};
use crate::screening::fit_scoring::{round2, FitScorer};
use crate::state::AppState;

/// A file received in the `resumes` multipart field.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub content: Bytes,
}

#[derive(Clone)]
pub struct Screener {
    classifier: Arc<dyn ResumeClassifier>,
    fit_scorer: Arc<dyn FitScorer>,
    decoding: TextDecoding,
}

impl Screener {
    pub fn new(
        classifier: Arc<dyn ResumeClassifier>,
        fit_scorer: Arc<dyn FitScorer>,
        decoding: TextDecoding,
    ) -> Self {
        Self {
            classifier,
            fit_scorer,
            decoding,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.classifier.clone(),
            state.fit_scorer.clone(),
            TextDecoding::from_config(&state.config),
        )
    }

    /// Classifies and scores a single resume. The result is unranked.
    pub fn analyze_resume(
        &self,
        filename: &str,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, AppError> {
        let prediction = self.classifier.classify(resume_text)?;
        let confidence = round2(prediction.confidence() * 100.0);
        let fit = self.fit_scorer.score(resume_text, job_description);

        Ok(AnalysisResult::new(
            filename.to_string(),
            prediction.label,
            confidence,
            fit,
        ))
    }

    /// Screens uploads in order and returns them ranked by fit score.
    ///
    /// Uploads with an empty filename, and resumes whose text could not be
    /// extracted, are left out. Any other failure aborts the batch.
    pub fn screen_batch(
        &self,
        job_description: &str,
        uploads: Vec<ResumeUpload>,
    ) -> Result<Vec<AnalysisResult>, AppError> {
        let received = uploads.len();
        let mut scored = Vec::with_capacity(received);

        for (index, upload) in uploads.into_iter().enumerate() {
            if upload.filename.is_empty() {
                debug!(index, "Skipping upload without a filename");
                continue;
            }

            let Some(text) = extract_resume_text(&upload.filename, &upload.content, self.decoding)?
            else {
                continue;
            };

            let result = self.analyze_resume(&upload.filename, &text, job_description)?;
            debug!(
                filename = %result.filename,
                fit_score = result.fit_score,
                category = %result.category,
                "Resume analyzed"
            );
            scored.push((index, result));
        }

        let ranked = rank_results(scored);
        info!(
            received,
            ranked = ranked.len(),
            skipped = received - ranked.len(),
            "Batch screened"
        );
        Ok(ranked)
    }
}

/// Sorts by fit score descending, then by original upload index, and assigns
/// 1-based ranks.
pub fn rank_results(mut scored: Vec<(usize, AnalysisResult)>) -> Vec<AnalysisResult> {
    scored.sort_by(|(ia, a), (ib, b)| {
        b.fit_score
            .total_cmp(&a.fit_score)
            .then_with(|| ia.cmp(ib))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(pos, (_, mut result))| {
            result.rank = pos + 1;
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::fit_scoring::FitResult;
    use crate::test_support::{keyword_scorer, FailingClassifier, StubClassifier};

    const JD: &str = "Looking for a python developer with 5 years experience in machine learning";

    fn screener() -> Screener {
        Screener::new(
            Arc::new(StubClassifier::new()),
            keyword_scorer(),
            TextDecoding::Strict,
        )
    }

    fn upload(filename: &str, content: &[u8]) -> ResumeUpload {
        ResumeUpload {
            filename: filename.to_string(),
            content: Bytes::copy_from_slice(content),
        }
    }

    fn result(filename: &str, fit_score: f64) -> AnalysisResult {
        AnalysisResult::new(
            filename.to_string(),
            "Data Science".to_string(),
            50.0,
            FitResult {
                fit_score,
                matched_skills: vec![],
                total_skills: vec![],
                experience_years: 0,
                project_count: 0,
            },
        )
    }

    #[test]
    fn test_rank_results_descending_with_contiguous_ranks() {
        let ranked = rank_results(vec![
            (0, result("a", 10.0)),
            (1, result("b", 90.0)),
            (2, result("c", 50.0)),
        ]);
        let order: Vec<_> = ranked.iter().map(|r| (r.filename.as_str(), r.rank)).collect();
        assert_eq!(order, vec![("b", 1), ("c", 2), ("a", 3)]);
    }

    #[test]
    fn test_rank_results_ties_keep_upload_order() {
        let ranked = rank_results(vec![
            (2, result("third", 40.0)),
            (0, result("first", 40.0)),
            (1, result("second", 70.0)),
        ]);
        let names: Vec<_> = ranked.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["second", "first", "third"]);
    }

    #[test]
    fn test_rank_results_empty() {
        assert!(rank_results(vec![]).is_empty());
    }

    #[test]
    fn test_analyze_resume_combines_classifier_and_scorer() {
        let resume = "I have 6 years of experience in python and machine learning, built 3 projects";
        let r = screener().analyze_resume("ds.txt", resume, JD).unwrap();
        assert_eq!(r.filename, "ds.txt");
        assert_eq!(r.category, "Data Science");
        assert_eq!(r.category_confidence, 75.0);
        assert_eq!(r.experience_years, 6);
        assert!((r.fit_score - 67.0).abs() < 1e-9);
        assert_eq!(r.rank, 0);
    }

    #[test]
    fn test_screen_batch_skips_unnamed_and_unreadable_uploads() {
        let results = screener()
            .screen_batch(
                JD,
                vec![
                    upload("", b"python"),
                    upload("broken.pdf", b"%PDF-garbage"),
                    upload("good.txt", b"python and machine learning"),
                ],
            )
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].filename, "good.txt");
        assert_eq!(results[0].rank, 1);
    }

    #[test]
    fn test_screen_batch_invalid_utf8_aborts_batch() {
        let err = screener()
            .screen_batch(
                JD,
                vec![upload("good.txt", b"python"), upload("bad.txt", &[0xff, 0xfe, 0xfd])],
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Decode { .. }));
    }

    #[test]
    fn test_screen_batch_invalid_utf8_skipped_when_lenient() {
        let s = Screener::new(
            Arc::new(StubClassifier::new()),
            keyword_scorer(),
            TextDecoding::SkipInvalid,
        );
        let results = s
            .screen_batch(
                JD,
                vec![upload("good.txt", b"python"), upload("bad.txt", &[0xff, 0xfe, 0xfd])],
            )
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].filename, "good.txt");
    }

    #[test]
    fn test_screen_batch_ranks_by_fit() {
        let results = screener()
            .screen_batch(
                JD,
                vec![
                    upload("weak.txt", b"gardening"),
                    upload(
                        "strong.txt",
                        b"python, machine learning, 8 years of experience, built a portfolio website",
                    ),
                    upload("middle.txt", b"python"),
                ],
            )
            .unwrap();
        let names: Vec<_> = results.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["strong.txt", "middle.txt", "weak.txt"]);
        let ranks: Vec<_> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(results.windows(2).all(|w| w[0].fit_score > w[1].fit_score));
    }

    #[test]
    fn test_screen_batch_is_idempotent() {
        let uploads = vec![upload("a.txt", b"python react"), upload("b.txt", b"java sql")];
        let s = screener();
        assert_eq!(
            s.screen_batch(JD, uploads.clone()).unwrap(),
            s.screen_batch(JD, uploads).unwrap()
        );
    }

    #[test]
    fn test_classifier_failure_aborts_batch() {
        let s = Screener::new(
            Arc::new(FailingClassifier),
            keyword_scorer(),
            TextDecoding::Strict,
        );
        let err = s
            .screen_batch(JD, vec![upload("a.txt", b"python")])
            .unwrap_err();
        assert!(matches!(err, AppError::Model(_)));
    }
}
