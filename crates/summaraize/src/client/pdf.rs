//! Page text extraction through poppler's `pdftotext`.

use std::path::Path;

use async_trait::async_trait;

use super::PageExtractor;
use crate::error::{ClientError, ClientResult};
use crate::store::PageText;

/// Runs `pdftotext <file> -` and splits its output on form feeds.
#[derive(Debug, Clone)]
pub struct PdftotextExtractor {
    program: String,
}

impl PdftotextExtractor {
    /// Use the `pdftotext` found on `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self { program: "pdftotext".to_string() }
    }

    /// Use a specific binary.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageExtractor for PdftotextExtractor {
    async fn extract_pages(&self, pdf: &Path) -> ClientResult<PageText> {
        let output = tokio::process::Command::new(&self.program)
            .arg("-enc")
            .arg("UTF-8")
            .arg(pdf)
            .arg("-")
            .output()
            .await
            .map_err(|e| ClientError::process(&self.program, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClientError::process(
                &self.program,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        let pages = split_pages(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(pdf = %pdf.display(), pages = pages.len(), "Extracted page text");
        Ok(pages)
    }
}

/// Split form-feed separated text into numbered pages, dropping blank pages.
#[must_use]
pub fn split_pages(text: &str) -> PageText {
    text.split('\x0c')
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(i, page)| (i as u32 + 1, page.to_string()))
        .collect()
}
