//! Summary and detail table assembly.

use crate::models::payslip::{LineItem, ResultSet};
use crate::models::record::{FieldRecord, FieldSchema, NormalizedRecord};

/// Builds the final tables of a document from its per-page output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAssembler;

impl ResultAssembler {
    pub fn new() -> Self {
        Self
    }

    /// One summary row per record, in record (page) order.
    pub fn project(&self, records: &[FieldRecord], schema: &FieldSchema) -> Vec<NormalizedRecord> {
        records.iter().map(|record| schema.project(record)).collect()
    }

    /// Assemble the result set. Line items keep their extraction order.
    pub fn assemble<I>(&self, records: &[FieldRecord], schema: FieldSchema, items: I) -> ResultSet
    where
        I: IntoIterator<Item = LineItem>,
    {
        ResultSet {
            summary: self.project(records, &schema),
            schema,
            details: items.into_iter().collect(),
        }
    }
}
