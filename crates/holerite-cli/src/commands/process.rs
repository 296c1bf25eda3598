//! Process command - extract the tables of a single payslip document.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use holerite_core::models::config::{ExtractionConfig, HoleriteConfig, OutputConfig};
use holerite_core::{Category, DocumentParser, LineItem, PayslipParser, ResultSet, RowLayout};

use super::{load_config, read_pages};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or text with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory (default: stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    #[command(flatten)]
    extraction: ExtractionArgs,
}

/// Extraction overrides shared by `process` and `batch`.
#[derive(Args, Clone, Debug)]
pub struct ExtractionArgs {
    /// Minimum number of pages a field must appear on to become a summary column
    #[arg(long)]
    min_occurrence: Option<NonZeroUsize>,

    /// Line-item row layout
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Field naming the owner of each page's line items
    #[arg(long)]
    owner_field: Option<String>,
}

impl ExtractionArgs {
    /// Apply command-line overrides on top of the configuration.
    pub fn apply(&self, config: &mut ExtractionConfig) {
        if let Some(min) = self.min_occurrence {
            config.min_field_occurrence = Some(min);
        }
        if let Some(layout) = self.layout {
            config.row_layout = layout.into();
        }
        if let Some(field) = &self.owner_field {
            config.owner_field = field.clone();
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LayoutArg {
    /// CODE DESCRIPTION VALUE
    ThreeColumn,
    /// CODE  DESCRIPTION  REFERENCE  VALUE
    FourColumn,
}

impl From<LayoutArg> for RowLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::ThreeColumn => RowLayout::ThreeColumn,
            LayoutArg::FourColumn => RowLayout::FourColumn,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Summary and detail CSV tables
    Csv,
    /// JSON document with both tables
    Json,
    /// Plain text summary
    Text,
}

/// Build the payslip parser, explaining how to set a missing threshold.
pub fn build_parser(config: &HoleriteConfig) -> anyhow::Result<PayslipParser> {
    if config.extraction.min_field_occurrence.is_none() {
        anyhow::bail!(
            "No minimum field occurrence configured. Pass --min-occurrence N or set \
             extraction.min_field_occurrence in the config file."
        );
    }

    Ok(PayslipParser::from_config(&config.extraction)?)
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.extraction.apply(&mut config.extraction);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let parser = build_parser(&config)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);

    pb.set_message("Decoding pages...");
    let pages = read_pages(&args.input, &config.pdf)?;

    pb.set_message(format!("Extracting {} pages...", pages.len()));
    let output = parser.parse(&pages);

    pb.finish_and_clear();

    if !output.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &output.warnings {
            eprintln!("  - {}", warning);
        }
    }

    match &args.output_dir {
        Some(dir) => {
            for path in write_outputs(&output.result, args.format, dir, &config.output)? {
                println!("{} Output written to {}", style("✓").green(), path.display());
            }
        }
        None => print!("{}", format_result(&output.result, args.format)?),
    }

    debug!(
        "Total processing time: {:?} (extraction {}ms)",
        start.elapsed(),
        output.processing_time_ms
    );

    Ok(())
}

/// Write the result files for `format` into `dir`, returning their paths.
pub fn write_outputs(
    result: &ResultSet,
    format: OutputFormat,
    dir: &Path,
    names: &OutputConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let files = match format {
        OutputFormat::Csv => vec![
            (dir.join(&names.summary_file), summary_csv(result)?),
            (dir.join(&names.detail_file), detail_csv(result)?),
        ],
        OutputFormat::Json => vec![(dir.join(&names.json_file), serde_json::to_string_pretty(result)?)],
        OutputFormat::Text => vec![(dir.join("holerite.txt"), format_text(result))],
    };

    let mut written = Vec::with_capacity(files.len());
    for (path, content) in files {
        fs::write(&path, content)?;
        debug!("Wrote output to {}", path.display());
        written.push(path);
    }

    Ok(written)
}

fn format_result(result: &ResultSet, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => Ok(format!("{}\n{}", summary_csv(result)?, detail_csv(result)?)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)? + "\n"),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// Summary table: one row per page, schema columns, empty cell for null.
pub fn summary_csv(result: &ResultSet) -> anyhow::Result<String> {
    if result.schema.is_empty() {
        return Ok(String::new());
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(result.schema.columns())?;
    for row in &result.summary {
        wtr.write_record(row.cells().map(|(_, value)| value.unwrap_or("")))?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// Detail table: one row per line item.
pub fn detail_csv(result: &ResultSet) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(LineItem::COLUMNS)?;
    for item in &result.details {
        wtr.write_record(item.cells().map(|cell| cell.unwrap_or("")))?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(result: &ResultSet) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Summary: {} pages, {} columns\n",
        result.summary.len(),
        result.schema.len()
    ));
    for (i, row) in result.summary.iter().enumerate() {
        let cells: Vec<String> = row
            .cells()
            .filter_map(|(column, value)| value.map(|v| format!("{}={}", column, v)))
            .collect();
        output.push_str(&format!("  Page {}: {}\n", i + 1, cells.join(", ")));
    }
    output.push('\n');

    for category in [Category::Provento, Category::Desconto] {
        let items: Vec<&LineItem> = result.items_of(category).collect();
        output.push_str(&format!("{} ({}):\n", category, items.len()));
        for item in items {
            output.push_str(&format!(
                "  {:>5}  {:<30} {:>12}  {}\n",
                item.code, item.description, item.value, item.owner
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use holerite_core::PageText;
    use pretty_assertions::assert_eq;

    fn result() -> ResultSet {
        let parser = PayslipParser::new(holerite_core::PipelineOptions::new(NonZeroUsize::MIN));
        let pages = vec![
            PageText::new(0, "Nome: ANA, SOUZA\n0010 SALARIO 1.500,00\n"),
            PageText::new(1, "Cargo: TECNICO\n"),
        ];
        parser.parse(&pages).result
    }

    #[test]
    fn test_summary_csv_quotes_and_nulls() {
        let csv = summary_csv(&result()).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "nome,cargo");
        assert_eq!(lines[1], "\"ANA, SOUZA\",");
        assert_eq!(lines[2], ",TECNICO");
    }

    #[test]
    fn test_detail_csv() {
        let csv = detail_csv(&result()).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "category,code,description,reference,value,owner");
        assert_eq!(lines[1], "PROVENTO,0010,SALARIO,,1500.00,\"ANA, SOUZA\"");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_empty_schema_writes_empty_summary() {
        assert_eq!(summary_csv(&ResultSet::default()).unwrap(), "");
        assert_eq!(detail_csv(&ResultSet::default()).unwrap().lines().count(), 1);
    }
}
