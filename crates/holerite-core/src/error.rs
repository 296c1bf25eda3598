//! Error types for the holerite-core library.
//!
//! Extraction itself never fails: a heuristic that finds nothing simply
//! contributes nothing. Only decoding the document, reading files and
//! loading configuration can abort processing.

use thiserror::Error;

/// Main error type for the holerite library.
#[derive(Error, Debug)]
pub enum HoleriteError {
    /// Page text could not be obtained from the document.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to turning a document into page text.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from a page.
    #[error("failed to extract text from page {page}: {reason}")]
    TextExtraction { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Result type for the holerite library.
pub type Result<T> = std::result::Result<T, HoleriteError>;
