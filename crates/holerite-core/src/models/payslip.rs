//! Payslip data models: page text, line items and the assembled result set.

use serde::{Deserialize, Serialize};

use super::record::{FieldSchema, NormalizedRecord};

/// Text recovered from a single document page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page position in the document (0-indexed).
    pub index: usize,
    /// Raw page text.
    pub text: String,
}

impl PageText {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Owner label used when a page carries no name field.
    pub fn fallback_owner(&self) -> String {
        format!("pagina_{}", self.index + 1)
    }
}

/// Kind of a payslip line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Earnings (provento).
    Provento,
    /// Deduction (desconto).
    Desconto,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Provento => "PROVENTO",
            Category::Desconto => "DESCONTO",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Provento
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single earnings or deduction line of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Earnings or deduction.
    pub category: Category,

    /// Payroll event code (digits only).
    pub code: String,

    /// Event description.
    pub description: String,

    /// Reference column (hours, days, percentage), when the layout has one.
    pub reference: Option<String>,

    /// Amount with `.` as decimal separator.
    pub value: String,

    /// Name of the employee the line belongs to, or a page fallback.
    pub owner: String,
}

impl LineItem {
    /// Column names of the detail table, in [`LineItem::cells`] order.
    pub const COLUMNS: [&'static str; 6] =
        ["category", "code", "description", "reference", "value", "owner"];

    /// Detail-table cells for this item.
    pub fn cells(&self) -> [Option<&str>; 6] {
        [
            Some(self.category.as_str()),
            Some(self.code.as_str()),
            Some(self.description.as_str()),
            self.reference.as_deref(),
            Some(self.value.as_str()),
            Some(self.owner.as_str()),
        ]
    }
}

/// Summary and detail tables for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Columns of the summary table.
    pub schema: FieldSchema,

    /// One row per page, in page order.
    pub summary: Vec<NormalizedRecord>,

    /// Every line item of every page, in extraction order.
    pub details: Vec<LineItem>,
}

impl ResultSet {
    /// True when the document had no pages.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.details.is_empty()
    }

    /// Line items of one category.
    pub fn items_of(&self, category: Category) -> impl Iterator<Item = &LineItem> {
        self.details.iter().filter(move |item| item.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_owner_is_one_based() {
        assert_eq!(PageText::new(0, "").fallback_owner(), "pagina_1");
        assert_eq!(PageText::new(4, "").fallback_owner(), "pagina_5");
    }

    #[test]
    fn test_category_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Category::Desconto).unwrap(), "\"DESCONTO\"");
        assert_eq!(Category::default(), Category::Provento);
        assert_eq!(Category::Provento.to_string(), "PROVENTO");
    }

    #[test]
    fn test_line_item_cells() {
        let item = LineItem {
            category: Category::Provento,
            code: "0010".to_string(),
            description: "SALARIO".to_string(),
            reference: None,
            value: "1500.00".to_string(),
            owner: "ANA".to_string(),
        };

        let cells = item.cells();
        assert_eq!(cells.len(), LineItem::COLUMNS.len());
        assert_eq!(cells[0], Some("PROVENTO"));
        assert_eq!(cells[3], None);
        assert_eq!(cells[4], Some("1500.00"));
    }
}
