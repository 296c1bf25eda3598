//! Cross-page schema inference by field frequency.

use std::num::NonZeroUsize;

use indexmap::IndexMap;
use tracing::debug;

use crate::models::record::{FieldRecord, FieldSchema};

/// Derives the summary-table columns of a document.
///
/// A field becomes a column when it was extracted on at least
/// `min_occurrence` pages. Columns keep first-seen order: by page, then by
/// position within the page's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaAggregator {
    min_occurrence: NonZeroUsize,
}

impl SchemaAggregator {
    pub fn new(min_occurrence: NonZeroUsize) -> Self {
        Self { min_occurrence }
    }

    pub fn min_occurrence(&self) -> NonZeroUsize {
        self.min_occurrence
    }

    /// Number of records each key appears in, in first-seen order.
    pub fn frequencies<'a, I>(records: I) -> IndexMap<&'a str, usize>
    where
        I: IntoIterator<Item = &'a FieldRecord>,
    {
        let mut counts: IndexMap<&'a str, usize> = IndexMap::new();
        for record in records {
            for key in record.keys() {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Build the schema from every page record of a document.
    pub fn aggregate(&self, records: &[FieldRecord]) -> FieldSchema {
        let counts = Self::frequencies(records);
        let total = counts.len();

        let schema: FieldSchema = counts
            .into_iter()
            .filter(|(_, count)| *count >= self.min_occurrence.get())
            .map(|(key, _)| key)
            .collect();

        debug!(
            "Schema keeps {} of {} fields (min occurrence {})",
            schema.len(),
            total,
            self.min_occurrence
        );

        schema
    }
}
