//! Resume text extraction from uploaded bytes.
//!
//! PDF failures are local: the resume is skipped. Plain-text decode failures
//! fail the batch unless `TextDecoding::SkipInvalid` is configured.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDecoding {
    /// Invalid UTF-8 aborts the whole batch.
    Strict,
    /// Invalid UTF-8 skips the offending resume.
    SkipInvalid,
}

impl TextDecoding {
    pub fn from_config(config: &Config) -> Self {
        if config.skip_undecodable_text {
            TextDecoding::SkipInvalid
        } else {
            TextDecoding::Strict
        }
    }
}

/// Only the lowercase `.pdf` suffix selects the PDF decoder.
pub fn is_pdf(filename: &str) -> bool {
    filename.ends_with(".pdf")
}

/// Returns `Ok(None)` when the resume should be skipped.
pub fn extract_resume_text(
    filename: &str,
    content: &[u8],
    decoding: TextDecoding,
) -> Result<Option<String>, AppError> {
    if is_pdf(filename) {
        return Ok(extract_pdf_text(filename, content));
    }

    match String::from_utf8(content.to_vec()) {
        Ok(text) => Ok(Some(text)),
        Err(source) => match decoding {
            TextDecoding::Strict => Err(AppError::Decode {
                filename: filename.to_string(),
                source,
            }),
            TextDecoding::SkipInvalid => {
                warn!(%filename, error = %source, "Skipping resume that is not valid UTF-8");
                Ok(None)
            }
        },
    }
}

/// Text of every page, in page order. `None` on any decoder failure,
/// including a panic inside the decoder, or when no text comes out.
fn extract_pdf_text(filename: &str, content: &[u8]) -> Option<String> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(content)
    }));

    match outcome {
        Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
        Ok(Ok(_)) => {
            debug!(%filename, "PDF contains no extractable text");
            None
        }
        Ok(Err(e)) => {
            warn!(%filename, error = %e, "Skipping unreadable PDF");
            None
        }
        Err(_) => {
            warn!(%filename, "PDF decoder panicked; skipping");
            None
        }
    }
}
