//! Document-level payslip extraction pipeline.
//!
//! Processing is staged: every page is extracted first, then field
//! frequencies are counted over the whole document, and only then are the
//! summary rows projected. Column decisions therefore never depend on page
//! order or on a partial view of the document.

use std::num::NonZeroUsize;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::assemble::ResultAssembler;
use crate::error::{HoleriteError, Result};
use crate::extract::{FieldCatalog, FieldExtractor, LineItemExtractor};
use crate::models::config::{ExtractionConfig, RowLayout};
use crate::models::payslip::{PageText, ResultSet};
use crate::models::record::FieldRecord;
use crate::pdf::PageSource;
use crate::schema::SchemaAggregator;

/// Result of document extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Summary and detail tables.
    pub result: ResultSet,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for document parsing.
pub trait DocumentParser {
    /// Parse the pages of one document.
    fn parse(&self, pages: &[PageText]) -> ExtractionResult;
}

/// Pipeline parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Minimum number of pages a field must appear on to become a column.
    pub min_field_occurrence: NonZeroUsize,
    /// Line-item row grammar.
    pub row_layout: RowLayout,
    /// Field naming the owner of a page's line items.
    pub owner_field: String,
}

impl PipelineOptions {
    pub fn new(min_field_occurrence: NonZeroUsize) -> Self {
        Self {
            min_field_occurrence,
            row_layout: RowLayout::default(),
            owner_field: "nome".to_string(),
        }
    }

    pub fn with_row_layout(mut self, layout: RowLayout) -> Self {
        self.row_layout = layout;
        self
    }

    pub fn with_owner_field(mut self, field: impl Into<String>) -> Self {
        self.owner_field = field.into();
        self
    }
}

/// Heuristic payslip parser.
pub struct PayslipParser {
    fields: FieldExtractor,
    line_items: LineItemExtractor,
    schema: SchemaAggregator,
    assembler: ResultAssembler,
    owner_field: String,
}

impl PayslipParser {
    /// Create a parser with the built-in field catalog.
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            fields: FieldExtractor::new(),
            line_items: LineItemExtractor::new(options.row_layout),
            schema: SchemaAggregator::new(options.min_field_occurrence),
            assembler: ResultAssembler::new(),
            owner_field: options.owner_field,
        }
    }

    /// Build a parser from the extraction configuration.
    ///
    /// Fails when no occurrence threshold is configured or when an extra
    /// field pattern is invalid.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let min = config.min_field_occurrence.ok_or_else(|| {
            HoleriteError::Config("min_field_occurrence is not set".to_string())
        })?;

        let catalog = FieldCatalog::holerite().with_patterns(&config.extra_fields)?;
        let options = PipelineOptions::new(min)
            .with_row_layout(config.row_layout)
            .with_owner_field(config.owner_field.clone());

        Ok(Self::new(options).with_catalog(catalog))
    }

    /// Replace the dedicated field rule catalog.
    pub fn with_catalog(mut self, catalog: FieldCatalog) -> Self {
        self.fields = self.fields.with_catalog(catalog);
        self
    }

    /// Decode `source` and parse its pages.
    ///
    /// Decode failures abort; extraction itself cannot fail.
    pub fn parse_source<S: PageSource + ?Sized>(&self, source: &S) -> Result<ExtractionResult> {
        let pages = source.pages()?;
        Ok(self.parse(&pages))
    }
}

impl DocumentParser for PayslipParser {
    fn parse(&self, pages: &[PageText]) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing document with {} pages", pages.len());

        // Extract everything before deciding on columns
        let mut records: Vec<FieldRecord> = Vec::with_capacity(pages.len());
        let mut items = Vec::new();

        for page in pages {
            let record = self.fields.extract(&page.text);

            let owner = match record.get(&self.owner_field) {
                Some(owner) => owner.to_string(),
                None => {
                    let fallback = page.fallback_owner();
                    warn!(
                        "Page {} has no '{}' field, using '{}'",
                        page.index + 1,
                        self.owner_field,
                        fallback
                    );
                    warnings.push(format!(
                        "page {}: '{}' not found, line items attributed to '{}'",
                        page.index + 1,
                        self.owner_field,
                        fallback
                    ));
                    fallback
                }
            };

            let page_items = self.line_items.extract(&page.text, &owner);
            debug!(
                "Page {}: {} fields, {} line items",
                page.index + 1,
                record.len(),
                page_items.len()
            );

            records.push(record);
            items.extend(page_items);
        }

        if !pages.is_empty() && items.is_empty() {
            warn!("No line items found in document");
            warnings.push("no line items found".to_string());
        }

        let schema = self.schema.aggregate(&records);
        let result = self.assembler.assemble(&records, schema, items);

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Document parsed in {}ms: {} columns, {} summary rows, {} line items",
            processing_time_ms,
            result.schema.len(),
            result.summary.len(),
            result.details.len()
        );

        ExtractionResult {
            result,
            warnings,
            processing_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::FieldPattern;
    use crate::models::payslip::Category;
    use crate::pdf::TextPages;
    use pretty_assertions::assert_eq;

    fn parser(min: usize) -> PayslipParser {
        PayslipParser::new(PipelineOptions::new(NonZeroUsize::new(min).unwrap()))
    }

    #[test]
    fn test_two_page_document() {
        let pages = vec![
            PageText::new(
                0,
                "Nome\nJOAO DA SILVA\nCPF 123.456.789-00\n1234  SALARIO BASE  1000,00\n",
            ),
            PageText::new(1, "\n"),
        ];

        let output = parser(1).parse(&pages);
        let result = &output.result;

        assert!(result.schema.contains("nome"));
        assert!(result.schema.contains("cpf"));
        assert_eq!(result.summary.len(), 2);
        assert_eq!(result.summary[0].value("nome"), Some("JOAO DA SILVA"));
        assert_eq!(result.summary[0].value("cpf"), Some("123.456.789-00"));
        for row in &result.summary {
            assert!(result.schema.columns().all(|c| row.has_column(c)));
        }
        assert_eq!(result.summary[1].value("nome"), None);
        assert_eq!(result.summary[1].value("cpf"), None);
        assert_eq!(result.summary[1].filled(), 0);

        assert_eq!(result.details.len(), 1);
        let item = &result.details[0];
        assert_eq!(item.category, Category::Provento);
        assert_eq!(item.value, "1000.00");
        assert_eq!(item.owner, "JOAO DA SILVA");

        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("pagina_2"));
    }

    #[test]
    fn test_empty_document() {
        let output = parser(3).parse(&[]);

        assert!(output.result.is_empty());
        assert!(output.result.schema.is_empty());
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_threshold_applies_across_pages() {
        let pages: Vec<PageText> = ["Cargo: ANALISTA\n", "Cargo: ANALISTA\nSetor: RH\n"]
            .iter()
            .enumerate()
            .map(|(i, text)| PageText::new(i, *text))
            .collect();

        let result = parser(2).parse(&pages).result;

        assert_eq!(result.schema.columns().collect::<Vec<_>>(), vec!["cargo"]);
        assert_eq!(result.summary.len(), 2);
    }

    #[test]
    fn test_owner_falls_back_to_page_label() {
        let pages = vec![
            PageText::new(0, "Nome: ANA\n0010 SALARIO 100,00\n"),
            PageText::new(1, "0010 SALARIO 200,00\n"),
        ];

        let result = parser(1).parse(&pages).result;

        let owners: Vec<_> = result.details.iter().map(|i| i.owner.as_str()).collect();
        assert_eq!(owners, vec!["ANA", "pagina_2"]);
    }

    #[test]
    fn test_custom_owner_field() {
        let options = PipelineOptions::new(NonZeroUsize::MIN).with_owner_field("matricula");
        let pages = vec![PageText::new(0, "Matrícula: 123456\n0010 SALARIO 100,00\n")];

        let result = PayslipParser::new(options).parse(&pages).result;
        assert_eq!(result.details[0].owner, "123456");
    }

    #[test]
    fn test_from_config() {
        let mut config = ExtractionConfig::default();
        assert!(matches!(
            PayslipParser::from_config(&config),
            Err(HoleriteError::Config(_))
        ));

        config.min_field_occurrence = NonZeroUsize::new(1);
        config.row_layout = RowLayout::FourColumn;
        config.extra_fields.push(FieldPattern {
            pattern: r"Lotação\s+(?P<lotacao>\w+)".to_string(),
            numeric: false,
        });
        let parser = PayslipParser::from_config(&config).unwrap();

        let text = "Lotação FILIAL\n0010  SALARIO  30,00  1.500,00\n";
        let result = parser.parse(&[PageText::new(0, text)]).result;
        assert_eq!(result.summary[0].value("lotacao"), Some("FILIAL"));
        assert_eq!(result.details[0].reference.as_deref(), Some("30.00"));

        config.extra_fields.push(FieldPattern {
            pattern: r"(sem grupo)".to_string(),
            numeric: false,
        });
        assert!(PayslipParser::from_config(&config).is_err());
    }

    #[test]
    fn test_parse_source() {
        let source = TextPages::new("Nome: ANA\x0cNome: RUI\x0c");
        let output = parser(2).parse_source(&source).unwrap();

        assert_eq!(output.result.summary.len(), 2);
        assert_eq!(output.result.summary[1].value("nome"), Some("RUI"));
    }
}
