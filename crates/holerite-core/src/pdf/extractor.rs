//! PDF page text extraction using lopdf.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PageSource, Result};
use crate::error::PdfError;
use crate::models::payslip::PageText;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    max_pages: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            max_pages: 0,
        }
    }

    /// Limit the number of decoded pages (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    /// Number of pages in the loaded document.
    pub fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Extract text from a specific page (1-indexed).
    pub fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction {
                page,
                reason: e.to_string(),
            })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for PdfExtractor {
    fn pages(&self) -> Result<Vec<PageText>> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        let mut numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if self.max_pages > 0 && numbers.len() > self.max_pages {
            warn!(
                "Decoding only the first {} of {} pages",
                self.max_pages,
                numbers.len()
            );
            numbers.truncate(self.max_pages);
        }

        numbers
            .into_iter()
            .enumerate()
            .map(|(index, number)| Ok(PageText::new(index, self.extract_page_text(number)?)))
            .collect()
    }
}
