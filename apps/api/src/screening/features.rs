//! Feature extraction — deterministic keyword and pattern signals over raw text.
//!
//! All matching is case-insensitive substring containment against the
//! taxonomy lists. Each term counts at most once, however often it appears.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::screening::taxonomy::Taxonomy;

/// `<N> year(s)/yr(s) [of] experience/exp`, first match only.
static YEARS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)\s*(?:years?|yrs?)(?:\s+of)?\s+(?:experience|exp)")
        .expect("years pattern is valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExperienceSignal {
    pub experience_keywords: u32,
    pub years: u64,
}

/// Skills from the taxonomy present in `text`, in taxonomy order.
pub fn extract_skills(text: &str, taxonomy: &Taxonomy) -> Vec<String> {
    let text_lower = text.to_lowercase();
    taxonomy
        .skills()
        .iter()
        .filter(|skill| text_lower.contains(skill.as_str()))
        .cloned()
        .collect()
}

pub fn detect_experience(text: &str, taxonomy: &Taxonomy) -> ExperienceSignal {
    let text_lower = text.to_lowercase();

    let years = YEARS_PATTERN
        .captures(&text_lower)
        .and_then(|caps| caps.get(1))
        .map(|m| parse_years(m.as_str()))
        .unwrap_or(0);

    ExperienceSignal {
        experience_keywords: count_keywords(&text_lower, taxonomy.experience_keywords()),
        years,
    }
}

pub fn detect_projects(text: &str, taxonomy: &Taxonomy) -> u32 {
    count_keywords(&text.to_lowercase(), taxonomy.project_keywords())
}

fn count_keywords(text_lower: &str, keywords: &[String]) -> u32 {
    keywords
        .iter()
        .filter(|kw| text_lower.contains(kw.as_str()))
        .count() as u32
}

/// Digits only by construction; anything too long for `u64` saturates.
fn parse_years(digits: &str) -> u64 {
    digits.parse::<u64>().unwrap_or(u64::MAX)
}
