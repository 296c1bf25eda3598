//! Core library for Brazilian payslip (holerite) and time-card extraction.
//!
//! This crate provides:
//! - Page text decoding (PDF via lopdf, form-feed separated plain text)
//! - Per-page field inference with an ordered heuristic cascade
//! - Earnings/deduction line-item extraction
//! - Cross-page schema inference by field frequency
//! - Assembly into summary and detail tables
//! - Time-card row extraction

pub mod error;
pub mod models;
pub mod pdf;
pub mod extract;
pub mod schema;
pub mod assemble;
pub mod pipeline;
pub mod timecard;

pub use error::{HoleriteError, PdfError, Result};
pub use models::config::{ExtractionConfig, HoleriteConfig, RowLayout};
pub use models::record::{FieldRecord, FieldSchema, FieldSource, NormalizedRecord};
pub use models::payslip::{Category, LineItem, PageText, ResultSet};
pub use pdf::{PageSource, PdfExtractor, TextPages};
pub use extract::{FieldCatalog, FieldExtractor, FieldRule, LineItemExtractor};
pub use extract::rules::normalize_value;
pub use schema::SchemaAggregator;
pub use assemble::ResultAssembler;
pub use pipeline::{DocumentParser, ExtractionResult, PayslipParser, PipelineOptions};
pub use timecard::{TimecardExtractor, TimecardRow, TimecardTable};
