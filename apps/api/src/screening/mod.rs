// Resume screening engine
// Implements: text extraction, keyword features, fit scoring, batch ranking.
// Category prediction goes through crate::classifier only.

pub mod extraction;
pub mod features;
pub mod fit_scoring;
pub mod handlers;
pub mod pipeline;
pub mod taxonomy;
