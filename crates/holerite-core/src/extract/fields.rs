//! Per-page field inference.

use tracing::trace;

use crate::models::record::FieldRecord;

use super::rules::{apply_label_lines, FieldCatalog};

/// Infers a field record from one page of text.
///
/// Heuristics run in priority order and never overwrite a key set by an
/// earlier one:
/// 1. dedicated catalog rules,
/// 2. `LABEL: VALUE` lines,
/// 3. a bare label line followed by its value line.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    catalog: FieldCatalog,
}

impl FieldExtractor {
    /// Create an extractor with the built-in payslip catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dedicated rule catalog.
    pub fn with_catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Extract the fields of one page. Never fails; may return an empty record.
    pub fn extract(&self, text: &str) -> FieldRecord {
        let mut record = FieldRecord::new();

        self.catalog.apply(text, &mut record);
        let dedicated = record.len();

        apply_label_lines(text, &mut record);

        trace!(
            "Inferred {} fields ({} from dedicated rules)",
            record.len(),
            dedicated
        );

        record
    }
}
