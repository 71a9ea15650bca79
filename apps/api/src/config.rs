use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
    /// Optional JSON taxonomy. `None` uses the built-in keyword lists.
    pub taxonomy_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    /// When set, undecodable plain-text uploads are skipped like unreadable PDFs
    /// instead of failing the whole batch.
    pub skip_undecodable_text: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            rust_log: "info".to_string(),
            vectorizer_path: PathBuf::from("models/tfidf_vectorizer.json"),
            classifier_path: PathBuf::from("models/resume_classifier_model.json"),
            taxonomy_path: None,
            max_upload_bytes: 16 * 1024 * 1024,
            skip_undecodable_text: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let max_upload_mb = optional_env("MAX_UPLOAD_MB")
            .map(|v| {
                v.parse::<usize>()
                    .context("MAX_UPLOAD_MB must be a whole number of megabytes")
            })
            .transpose()?;

        Ok(Config {
            port: optional_env("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(defaults.port),
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            vectorizer_path: optional_env("VECTORIZER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.vectorizer_path),
            classifier_path: optional_env("CLASSIFIER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.classifier_path),
            taxonomy_path: optional_env("TAXONOMY_PATH").map(PathBuf::from),
            max_upload_bytes: max_upload_mb
                .map(|mb| mb.saturating_mul(1024 * 1024))
                .unwrap_or(defaults.max_upload_bytes),
            skip_undecodable_text: optional_env("SKIP_UNDECODABLE_TEXT")
                .map(|v| parse_flag("SKIP_UNDECODABLE_TEXT", &v))
                .transpose()?
                .unwrap_or(defaults.skip_undecodable_text),
        })
    }
}

/// Reads a variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean flag, got '{other}'"),
    }
}
