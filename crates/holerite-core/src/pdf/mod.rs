//! Document decoding into page text.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use crate::models::payslip::PageText;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Anything that can hand out the ordered pages of a document.
pub trait PageSource {
    /// Text of every page, in document order.
    fn pages(&self) -> Result<Vec<PageText>>;
}

/// Plain text with pages separated by form feeds (`\x0c`), as written by
/// `pdftotext` and similar tools.
#[derive(Debug, Clone, Default)]
pub struct TextPages {
    text: String,
}

impl TextPages {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PageSource for TextPages {
    fn pages(&self) -> Result<Vec<PageText>> {
        let mut chunks: Vec<&str> = self.text.split('\x0c').collect();

        // A trailing form feed closes the last page rather than opening one
        if chunks.last().is_some_and(|last| last.trim().is_empty()) {
            chunks.pop();
        }

        Ok(chunks
            .into_iter()
            .enumerate()
            .map(|(index, text)| PageText::new(index, text))
            .collect())
    }
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn pages(&self) -> Result<Vec<PageText>> {
        (**self).pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_form_feed_pages() {
        let pages = TextPages::new("primeira\x0csegunda\x0c").pages().unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], PageText::new(0, "primeira"));
        assert_eq!(pages[1], PageText::new(1, "segunda"));
    }

    #[test]
    fn test_text_without_form_feed_is_one_page() {
        let pages = TextPages::new("Nome\nJOAO\n").pages().unwrap();
        assert_eq!(pages, vec![PageText::new(0, "Nome\nJOAO\n")]);
    }

    #[test]
    fn test_empty_text_has_no_pages() {
        assert!(TextPages::new("").pages().unwrap().is_empty());
    }

    #[test]
    fn test_blank_inner_pages_are_kept() {
        let pages = TextPages::new("a\x0c\x0cb").pages().unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].index, 2);
    }
}
