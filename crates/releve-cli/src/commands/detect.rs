use releve_core::config::{load_config, ConvertConfig};
use releve_core::dispatch::dispatch;
use releve_core::error::ReleveError;
use releve_core::extraction::ocr::TesseractExtractor;
use releve_core::extraction::pdftotext::PdftotextExtractor;
use std::path::PathBuf;

pub fn run(pdf_file: PathBuf, config: Option<PathBuf>) -> Result<(), ReleveError> {
    let config = match config {
        Some(path) => load_config(&path)?,
        None => ConvertConfig::default(),
    };

    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let ocr = TesseractExtractor::new(config.ocr.clone());
    let detection = dispatch(&pdf_bytes, &extractor, &ocr, config.min_text_chars)?;

    println!("Bank:   {}", detection.bank);
    println!("Source: {}", detection.source);
    println!("Lines:  {}", detection.text.lines().count());
    if !TesseractExtractor::is_available() {
        println!("OCR:    not installed, scanned statements cannot be read");
    }
    Ok(())
}
