use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReleveError {
    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    #[error("{tool} not found. Install poppler and tesseract: apt install poppler-utils tesseract-ocr tesseract-ocr-fra (Linux) or brew install poppler tesseract tesseract-lang (macOS)")]
    ToolNotFound { tool: &'static str },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("OCR did not finish within {timeout_secs}s")]
    OcrTimeout { timeout_secs: u64 },

    #[error("unsupported statement format: no known bank marker found{}", ocr_note(.ocr_attempted))]
    UnsupportedFormat { ocr_attempted: bool },

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("CSV export failed: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn ocr_note(ocr_attempted: &bool) -> &'static str {
    if *ocr_attempted {
        " (after OCR)"
    } else {
        ""
    }
}
