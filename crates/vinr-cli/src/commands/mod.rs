//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use vinr_core::models::config::{self as core_config, VinrConfig};
use vinr_core::{ExtractedRecord, VehicleInfoParser, YearMonth};

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used when writing one record per file.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

impl From<core_config::OutputFormat> for OutputFormat {
    fn from(format: core_config::OutputFormat) -> Self {
        match format {
            core_config::OutputFormat::Json => OutputFormat::Json,
            core_config::OutputFormat::Csv => OutputFormat::Csv,
            core_config::OutputFormat::Text => OutputFormat::Text,
        }
    }
}

/// Configuration file location in the platform config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vinr")
        .join("config.json")
}

/// The `--config` path if given, otherwise the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration.
///
/// An explicit path must exist; the default location is optional.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<VinrConfig> {
    let path = config_path(explicit);
    if explicit.is_some() || path.exists() {
        Ok(VinrConfig::from_file(&path)?)
    } else {
        Ok(VinrConfig::default())
    }
}

/// Build the parser from configuration and an optional fixed "today".
pub fn build_parser(config: &VinrConfig, as_of: Option<YearMonth>) -> VehicleInfoParser {
    let parser = VehicleInfoParser::from_config(&config.extraction);
    match as_of {
        Some(date) => parser.with_reference_date(date),
        None => parser,
    }
}

/// Read a text file, or stdin for `-`.
pub fn read_text(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

pub fn format_record(
    record: &ExtractedRecord,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ExtractedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Header comes from the serialized field names
    wtr.serialize(record)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("VIN:   {}\n", record.vin));
    output.push_str(&format!("Maker: {}\n", record.maker));
    output.push_str(&format!("Year:  {}\n", record.year));
    output.push_str(&format!("Model: {}\n", record.model));

    output
}
