//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

use crate::error::Result;

/// Main configuration for the holerite pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleriteConfig {
    /// PDF decoding configuration.
    pub pdf: PdfConfig,

    /// Field and line-item extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output file naming.
    pub output: OutputConfig,
}

/// PDF decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to decode (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { max_pages: 0 }
    }
}

/// Row grammar used for payslip line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowLayout {
    /// `CODE DESCRIPTION VALUE`, code of 2 to 5 digits.
    ThreeColumn,
    /// `CODE  DESCRIPTION  REFERENCE  VALUE`, 4-digit code, columns
    /// separated by at least two spaces.
    FourColumn,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self::ThreeColumn
    }
}

/// An additional dedicated field rule.
///
/// Every named capture group of `pattern` becomes a field key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPattern {
    /// Regular expression with named capture groups.
    pub pattern: String,

    /// Normalize captured values as locale-formatted numbers.
    #[serde(default)]
    pub numeric: bool,
}

/// Field and line-item extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum number of pages a field must appear on to become a summary
    /// column. Must be set explicitly; corpora disagree on a sane value.
    pub min_field_occurrence: Option<NonZeroUsize>,

    /// Line-item row grammar.
    pub row_layout: RowLayout,

    /// Field whose value names the owner of a page's line items.
    pub owner_field: String,

    /// Dedicated rules appended after the built-in catalog.
    pub extra_fields: Vec<FieldPattern>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_field_occurrence: None,
            row_layout: RowLayout::default(),
            owner_field: "nome".to_string(),
            extra_fields: Vec::new(),
        }
    }
}

/// Output file names used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Summary table file name.
    pub summary_file: String,

    /// Detail table file name.
    pub detail_file: String,

    /// Combined JSON file name.
    pub json_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_file: "resumo.csv".to_string(),
            detail_file: "detalhamento.csv".to_string(),
            json_file: "holerite.json".to_string(),
        }
    }
}

impl HoleriteConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
