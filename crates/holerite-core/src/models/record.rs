//! Field records, the document schema and schema-projected rows.

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Turn a raw label into a field key.
///
/// Lower-cases the trimmed label and replaces whitespace, hyphens and
/// slashes with underscores, one underscore per character.
pub fn normalize_key(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' || c == '/' { '_' } else { c })
        .collect()
}

/// Read access to named field values.
pub trait FieldSource {
    /// Value stored under `key`, if any.
    fn field(&self, key: &str) -> Option<&str>;
}

/// Key-value fields inferred from a single page.
///
/// Keys keep insertion order. A key is written at most once: the first
/// successful match wins and later values for the same key are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRecord {
    fields: IndexMap<String, String>,
}

impl FieldRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key` unless the key is already set.
    ///
    /// The value is trimmed; empty values are never stored. Returns whether
    /// the record changed.
    pub fn insert_first(&mut self, key: impl Into<String>, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        match self.fields.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Key-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldSource for FieldRecord {
    fn field(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for FieldRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert_first(key, value.as_ref());
        }
        record
    }
}

/// Ordered column set shared by every summary row of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    columns: IndexSet<String>,
}

impl FieldSchema {
    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Project `source` onto this schema.
    ///
    /// Every column is present in the output; columns the source does not
    /// have are `None`.
    pub fn project<S: FieldSource + ?Sized>(&self, source: &S) -> NormalizedRecord {
        let cells = self
            .columns
            .iter()
            .map(|column| (column.clone(), source.field(column).map(str::to_string)))
            .collect();

        NormalizedRecord { cells }
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A field record projected onto a [`FieldSchema`].
///
/// Serializes as a JSON object with `null` for missing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    cells: IndexMap<String, Option<String>>,
}

impl NormalizedRecord {
    /// Cell value for `column`; `None` both for null cells and unknown columns.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|v| v.as_deref())
    }

    /// Whether `column` is part of this row (null or not).
    pub fn has_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// Cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of non-null cells.
    pub fn filled(&self) -> usize {
        self.cells.values().filter(|v| v.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FieldSource for NormalizedRecord {
    fn field(&self, key: &str) -> Option<&str> {
        self.value(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Data de Admissão"), "data_de_admissão");
        assert_eq!(normalize_key("  Ag/Conta "), "ag_conta");
        assert_eq!(normalize_key("Pré-Aviso"), "pré_aviso");
        assert_eq!(normalize_key("A  B"), "a__b");
    }

    #[test]
    fn test_insert_first_keeps_first_value() {
        let mut record = FieldRecord::new();

        assert!(record.insert_first("banco", " Itaú "));
        assert!(!record.insert_first("banco", "Bradesco"));
        assert!(!record.insert_first("cargo", "   "));

        assert_eq!(record.get("banco"), Some("Itaú"));
        assert!(!record.contains_key("cargo"));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_project_fills_missing_with_null() {
        let schema: FieldSchema = ["nome", "cpf", "cargo"].into_iter().collect();
        let record: FieldRecord = [("cargo", "ANALISTA"), ("extra", "x")].into_iter().collect();

        let row = schema.project(&record);

        let cells: Vec<_> = row.cells().collect();
        assert_eq!(
            cells,
            vec![("nome", None), ("cpf", None), ("cargo", Some("ANALISTA"))]
        );
        assert!(!row.has_column("extra"));
        assert_eq!(row.filled(), 1);
    }

    #[test]
    fn test_reprojection_is_noop() {
        let schema: FieldSchema = ["nome", "cpf"].into_iter().collect();
        let record: FieldRecord = [("nome", "MARIA")].into_iter().collect();

        let once = schema.project(&record);
        let twice = schema.project(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalized_record_serializes_nulls() {
        let schema: FieldSchema = ["nome", "cpf"].into_iter().collect();
        let record: FieldRecord = [("nome", "MARIA")].into_iter().collect();

        let json = serde_json::to_string(&schema.project(&record)).unwrap();
        assert_eq!(json, r#"{"nome":"MARIA","cpf":null}"#);
    }
}
