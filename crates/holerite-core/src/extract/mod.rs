//! Payslip field and line-item extraction.

mod fields;
mod line_items;
pub mod rules;

pub use fields::FieldExtractor;
pub use line_items::LineItemExtractor;
pub use rules::{FieldCatalog, FieldRule};
