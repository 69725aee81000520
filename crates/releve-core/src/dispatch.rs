//! Bank detection: structural text first, OCR only when that fails.

use crate::banks::parsers;
use crate::error::ReleveError;
use crate::extraction::{full_text, has_usable_text, PageContent, PdfExtractor};
use crate::model::{Bank, TextSource};

/// The bank a statement came from, plus the text its parser should read.
#[derive(Debug, Clone)]
pub struct Detection {
    pub bank: Bank,
    pub source: TextSource,
    pub text: String,
}

/// First bank, in priority order, whose markers appear in `text`.
pub fn detect_bank(text: &str) -> Option<Bank> {
    parsers().into_iter().find(|p| p.detect(text)).map(|p| p.bank())
}

/// Identify the issuing bank of a PDF.
///
/// The text layer is tried first and its first page searched for markers.
/// OCR runs when structural extraction errors, yields no usable text, or
/// carries no marker (a bank name printed only as an image logo). It is
/// never invoked once the text layer has identified the bank.
pub fn dispatch(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    ocr: &dyn PdfExtractor,
    min_text_chars: usize,
) -> Result<Detection, ReleveError> {
    match extractor.extract_pages(pdf_bytes) {
        Ok(pages) if has_usable_text(&pages, min_text_chars) => {
            if let Some(detection) = detect_structural(&pages, extractor.backend_name()) {
                return Ok(detection);
            }
            tracing::warn!(
                backend = extractor.backend_name(),
                "no bank marker on the first page, falling back to OCR"
            );
        }
        Ok(pages) => tracing::warn!(
            backend = extractor.backend_name(),
            chars = pages.first().map(PageContent::visible_chars).unwrap_or(0),
            "no usable text layer, falling back to OCR"
        ),
        Err(e) => tracing::warn!(
            backend = extractor.backend_name(),
            error = %e,
            "text extraction failed, falling back to OCR"
        ),
    }

    let pages = ocr.extract_pages(pdf_bytes)?;
    let text = full_text(&pages);
    let bank = detect_bank(&text).ok_or(ReleveError::UnsupportedFormat {
        ocr_attempted: true,
    })?;
    tracing::info!(%bank, backend = ocr.backend_name(), "detected bank from OCR text");
    Ok(Detection {
        bank,
        source: TextSource::Ocr,
        text,
    })
}

fn detect_structural(pages: &[PageContent], backend: &str) -> Option<Detection> {
    let first_page = pages
        .first()
        .map(|p| p.lines.join("\n"))
        .unwrap_or_default();
    let bank = detect_bank(&first_page)?;
    tracing::info!(%bank, backend, pages = pages.len(), "detected bank from text layer");
    Some(Detection {
        bank,
        source: TextSource::Structural,
        text: full_text(pages),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::split_pages;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        text: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn ok(text: &'static str) -> Self {
            Self {
                text: Some(text),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                text: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PdfExtractor for Fixed {
        fn extract_pages(&self, _: &[u8]) -> Result<Vec<PageContent>, ReleveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.text {
                Some(t) => Ok(split_pages(t)),
                None => Err(ReleveError::Extraction("broken xref table".into())),
            }
        }

        fn backend_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_detect_bank_priority() {
        // Both CIC and Crédit Mutuel markers: CIC comes first.
        assert_eq!(detect_bank("CIC - Crédit Mutuel"), Some(Bank::Cic));
        assert_eq!(detect_bank("Caisse de Crédit Mutuel"), Some(Bank::CreditMutuel));
        assert_eq!(detect_bank("LCL Banque"), Some(Bank::Lcl));
        assert_eq!(detect_bank("nothing to see"), None);
    }

    #[test]
    fn test_structural_detection_skips_ocr() {
        let text = Fixed::ok("BNP PARIBAS releve de compte\x0cpage two");
        let ocr = Fixed::ok("SOCIETE GENERALE");
        let d = dispatch(b"%PDF", &text, &ocr, 10).unwrap();
        assert_eq!(d.bank, Bank::BnpParibas);
        assert_eq!(d.source, TextSource::Structural);
        assert!(d.text.ends_with("page two"));
        assert_eq!(ocr.calls(), 0);
    }

    #[test]
    fn test_text_layer_without_marker_uses_ocr() {
        let text = Fixed::ok("Releve de compte courant numero 0001 periode fevrier");
        let ocr = Fixed::ok("BNP PARIBAS\nRELEVE DE VOTRE COMPTE");
        let d = dispatch(b"%PDF", &text, &ocr, 10).unwrap();
        assert_eq!(d.bank, Bank::BnpParibas);
        assert_eq!(d.source, TextSource::Ocr);
        assert_eq!(ocr.calls(), 1);
    }

    #[test]
    fn test_marker_only_on_later_page_needs_ocr() {
        let text = Fixed::ok("Releve mensuel des operations\x0cBNP PARIBAS");
        let ocr = Fixed::ok("Releve mensuel des operations");
        let err = dispatch(b"%PDF", &text, &ocr, 10).unwrap_err();
        assert!(matches!(
            err,
            ReleveError::UnsupportedFormat {
                ocr_attempted: true
            }
        ));
        assert_eq!(ocr.calls(), 1);
    }

    #[test]
    fn test_empty_text_layer_uses_ocr() {
        let text = Fixed::ok("   \n");
        let ocr = Fixed::ok("Page 1\x0cLe Crédit Lyonnais");
        let d = dispatch(b"%PDF", &text, &ocr, 10).unwrap();
        assert_eq!(d.bank, Bank::Lcl);
        assert_eq!(d.source, TextSource::Ocr);
        assert_eq!(ocr.calls(), 1);
    }

    #[test]
    fn test_extraction_error_uses_ocr() {
        let text = Fixed::failing();
        let ocr = Fixed::ok("Société Générale");
        let d = dispatch(b"%PDF", &text, &ocr, 10).unwrap();
        assert_eq!(d.bank, Bank::SocieteGenerale);
        assert_eq!(d.source, TextSource::Ocr);
    }

    #[test]
    fn test_unsupported_after_ocr() {
        let err = dispatch(b"%PDF", &Fixed::failing(), &Fixed::ok("HSBC"), 10).unwrap_err();
        assert!(matches!(
            err,
            ReleveError::UnsupportedFormat {
                ocr_attempted: true
            }
        ));
    }

    #[test]
    fn test_ocr_error_propagates() {
        let err = dispatch(b"%PDF", &Fixed::failing(), &Fixed::failing(), 10).unwrap_err();
        assert!(matches!(err, ReleveError::Extraction(_)));
    }
}
