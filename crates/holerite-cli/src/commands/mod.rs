//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;
pub mod timecard;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use holerite_core::models::config::{HoleriteConfig, PdfConfig};
use holerite_core::{PageSource, PageText, PdfExtractor, TextPages};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("holerite")
        .join("config.json")
}

/// Load the configuration from `path`, else from the default location when
/// it exists, else fall back to defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<HoleriteConfig> {
    if let Some(path) = path {
        return HoleriteConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return HoleriteConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    Ok(HoleriteConfig::default())
}

/// Whether `path` has an extension the decoders understand.
pub fn is_supported(path: &Path) -> bool {
    matches!(extension(path).as_str(), "pdf" | "txt")
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Decode the pages of a PDF or form-feed separated text file.
pub fn read_pages(path: &Path, config: &PdfConfig) -> anyhow::Result<Vec<PageText>> {
    let pages = match extension(path).as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::new().with_max_pages(config.max_pages);
            extractor.load(&data)?;
            extractor.pages()?
        }
        "txt" => {
            let text = fs::read_to_string(path)?;
            TextPages::new(text).pages()?
        }
        other => anyhow::bail!("Unsupported file format: {}", other),
    };

    debug!("Decoded {} pages from {}", pages.len(), path.display());
    Ok(pages)
}
