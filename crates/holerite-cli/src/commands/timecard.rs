//! Timecard command - tabulate a time-card report.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{info, warn};

use holerite_core::{TimecardExtractor, TimecardTable};

use super::{load_config, read_pages};

/// Arguments for the timecard command.
#[derive(Args)]
pub struct TimecardArgs {
    /// Input file (PDF, or text with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: TableFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum TableFormat {
    /// CSV table
    Csv,
    /// JSON array of row objects
    Json,
}

pub async fn run(args: TimecardArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing time card: {}", args.input.display());

    let pages = read_pages(&args.input, &config.pdf)?;
    let table = TimecardExtractor::new().extract(&pages);

    if table.is_empty() {
        warn!("No time-card rows found in {}", args.input.display());
    }

    let output = match args.format {
        TableFormat::Csv => format_csv(&table)?,
        TableFormat::Json => {
            let records: Vec<_> = table.records().collect();
            serde_json::to_string_pretty(&records)? + "\n"
        }
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} rows written to {}",
            style("✓").green(),
            table.rows.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn format_csv(table: &TimecardTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}
