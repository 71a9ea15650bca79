//! Keyword taxonomy — the static term lists that drive feature extraction.
//!
//! Built-in lists ship with the binary; a JSON file can replace them at
//! startup without a rebuild (`TAXONOMY_PATH`).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const BUILTIN_VERSION: &str = "builtin-1";

const SKILL_DB: &[&str] = &[
    "python",
    "java",
    "c",
    "c++",
    "html",
    "css",
    "javascript",
    "machine learning",
    "deep learning",
    "sql",
    "mongodb",
    "react",
    "node",
    "data analysis",
    "nlp",
    "ai",
    "ml",
    "tensorflow",
    "pytorch",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "git",
    "flask",
    "django",
    "fastapi",
    "pandas",
    "numpy",
    "scikit-learn",
    "data science",
    "analytics",
];

const EXPERIENCE_KEYWORDS: &[&str] = &[
    "developed",
    "managed",
    "led",
    "created",
    "designed",
    "implemented",
    "built",
    "architected",
    "optimized",
    "years of experience",
    "work experience",
    "internship",
];

const PROJECT_KEYWORDS: &[&str] = &[
    "project",
    "portfolio",
    "built",
    "created",
    "developed",
    "implemented",
    "designed",
    "application",
    "system",
    "website",
];

/// Normalised term lists. Terms are trimmed, lowercase, non-empty and unique
/// within each list, in first-seen order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawTaxonomy")]
pub struct Taxonomy {
    version: String,
    skills: Vec<String>,
    experience_keywords: Vec<String>,
    project_keywords: Vec<String>,
}

#[derive(Deserialize)]
struct RawTaxonomy {
    #[serde(default = "custom_version")]
    version: String,
    skills: Vec<String>,
    experience_keywords: Vec<String>,
    project_keywords: Vec<String>,
}

fn custom_version() -> String {
    "custom".to_string()
}

impl From<RawTaxonomy> for Taxonomy {
    fn from(raw: RawTaxonomy) -> Self {
        Taxonomy::new(
            raw.version,
            raw.skills,
            raw.experience_keywords,
            raw.project_keywords,
        )
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Taxonomy::new(
            BUILTIN_VERSION,
            SKILL_DB.iter().copied(),
            EXPERIENCE_KEYWORDS.iter().copied(),
            PROJECT_KEYWORDS.iter().copied(),
        )
    }
}

impl Taxonomy {
    pub fn new<S, I, J, K>(version: impl Into<String>, skills: I, experience: J, projects: K) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
        K: IntoIterator<Item = S>,
    {
        Self {
            version: version.into(),
            skills: normalize_terms(skills),
            experience_keywords: normalize_terms(experience),
            project_keywords: normalize_terms(projects),
        }
    }

    /// Reads a taxonomy JSON file. Called once at startup.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy file '{}'", path.display()))?;
        let taxonomy: Taxonomy = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse taxonomy file '{}'", path.display()))?;
        if taxonomy.skills.is_empty() {
            anyhow::bail!("Taxonomy '{}' has no skills", path.display());
        }
        Ok(taxonomy)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn experience_keywords(&self) -> &[String] {
        &self.experience_keywords
    }

    pub fn project_keywords(&self) -> &[String] {
        &self.project_keywords
    }
}

fn normalize_terms<S: AsRef<str>>(terms: impl IntoIterator<Item = S>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = term.as_ref().trim().to_lowercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}
