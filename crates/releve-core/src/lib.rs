pub mod banks;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod summary;
pub mod trace;
pub mod validate;

use banks::parser_for;
use config::ConvertConfig;
use error::ReleveError;
use extraction::PdfExtractor;
use model::{Bank, TextSource, Transaction};
use serde::Serialize;
use trace::ParseTrace;

/// Result of converting one statement.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub bank: Bank,
    pub source: TextSource,
    /// In order of appearance in the statement.
    pub transactions: Vec<Transaction>,
    pub trace: ParseTrace,
}

/// Main API entry point: detect the issuing bank of a statement PDF and
/// extract its transactions.
///
/// `ocr` is only invoked when `extractor` fails or returns no usable text.
/// A statement with zero transactions is not an error.
pub fn convert_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    ocr: &dyn PdfExtractor,
    config: &ConvertConfig,
) -> Result<Conversion, ReleveError> {
    let detection = dispatch::dispatch(pdf_bytes, extractor, ocr, config.min_text_chars)?;
    Ok(parse_detected(detection.bank, detection.source, &detection.text))
}

/// Convert statement text that was extracted elsewhere. The bank is
/// detected from the whole text.
pub fn convert_text(text: &str) -> Result<Conversion, ReleveError> {
    let bank = dispatch::detect_bank(text).ok_or(ReleveError::UnsupportedFormat {
        ocr_attempted: false,
    })?;
    Ok(parse_detected(bank, TextSource::Structural, text))
}

fn parse_detected(bank: Bank, source: TextSource, text: &str) -> Conversion {
    let parse = parser_for(bank).parse(text);
    tracing::info!(
        %bank,
        %source,
        transactions = parse.transactions.len(),
        "statement parsed"
    );
    if parse.transactions.is_empty() {
        tracing::warn!(%bank, "no transactions found");
    }
    Conversion {
        bank,
        source,
        transactions: parse.transactions,
        trace: parse.trace,
    }
}
