use crate::error::ReleveError;
use crate::export::CsvOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for one conversion. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Minimum non-whitespace characters on the first page for the text
    /// layer to be trusted. Below it, OCR is tried.
    pub min_text_chars: usize,
    pub ocr: OcrConfig,
    pub csv: CsvOptions,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 20,
            ocr: OcrConfig::default(),
            csv: CsvOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code.
    pub language: String,
    pub dpi: u32,
    /// Budget for the whole OCR run, rendering included.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "fra".into(),
            dpi: 300,
            timeout_secs: 300,
        }
    }
}

/// Load a conversion config from a JSON file.
pub fn load_config(path: &Path) -> Result<ConvertConfig, ReleveError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReleveError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a conversion config from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<ConvertConfig, ReleveError> {
    let config: ConvertConfig =
        serde_json::from_str(json).map_err(|e| ReleveError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config).map_err(|reason| ReleveError::ConfigLoad {
        path: source.to_path_buf(),
        reason,
    })?;
    Ok(config)
}

fn validate_config(config: &ConvertConfig) -> Result<(), String> {
    if config.ocr.language.trim().is_empty() {
        return Err("ocr.language must not be empty".into());
    }
    if config.ocr.dpi == 0 {
        return Err("ocr.dpi must be positive".into());
    }
    if config.ocr.timeout_secs == 0 {
        return Err("ocr.timeout_secs must be positive".into());
    }
    Ok(())
}
