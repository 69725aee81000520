pub mod ocr;
pub mod pdftotext;

use crate::error::ReleveError;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

impl PageContent {
    /// Split raw page text into lines.
    pub fn from_text(page_number: usize, text: &str) -> Self {
        Self {
            page_number,
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Number of non-whitespace characters on the page.
    pub fn visible_chars(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|l| l.chars())
            .filter(|c| !c.is_whitespace())
            .count()
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ReleveError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Split `pdftotext`-style output into pages on form feeds. Empty trailing
/// pages are dropped, but page 1 is always kept.
pub fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| PageContent::from_text(i + 1, page_text))
        .filter(|p| !p.lines.is_empty() || p.page_number == 1)
        .collect()
}

/// Structural text counts as usable when its first page carries at least
/// `min_chars` visible characters. Scanned statements typically yield an
/// empty or near-empty text layer.
pub fn has_usable_text(pages: &[PageContent], min_chars: usize) -> bool {
    pages
        .first()
        .is_some_and(|p| p.visible_chars() >= min_chars)
}

/// All lines of all pages joined with newlines.
pub fn full_text(pages: &[PageContent]) -> String {
    pages
        .iter()
        .flat_map(|p| p.lines.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_on_form_feed() {
        let pages = split_pages("page one\nline 2\x0cpage two\x0c");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines, vec!["page one", "line 2"]);
        assert_eq!(pages[1].page_number, 2);
    }

    #[test]
    fn test_empty_document_keeps_first_page() {
        let pages = split_pages("");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn test_usable_text_threshold() {
        let pages = vec![PageContent::from_text(1, "  ab \n c  ")];
        assert_eq!(pages[0].visible_chars(), 3);
        assert!(has_usable_text(&pages, 3));
        assert!(!has_usable_text(&pages, 4));
        assert!(!has_usable_text(&[], 0));
    }

    #[test]
    fn test_full_text_spans_pages() {
        let pages = split_pages("a\nb\x0cc");
        assert_eq!(full_text(&pages), "a\nb\nc");
    }
}
