//! Extract command - read vehicle data from a single OCR text.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use vinr_core::{VehicleExtractor, YearMonth};

use super::{build_parser, format_record, load_config, read_text, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Sticker-area OCR text file, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// OCR text read from the VIN area alone
    #[arg(long)]
    vin_text: Option<PathBuf>,

    /// Month treated as "now" when rejecting future dates (YYYY-MM)
    #[arg(long, value_name = "YYYY-MM")]
    as_of: Option<YearMonth>,

    /// Output format (default: from configuration)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print field sources and warnings as JSON
    #[arg(long)]
    details: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let sticker = read_text(&args.input)?;
    if sticker.trim().is_empty() {
        anyhow::bail!("No text detected in {}", args.input.display());
    }

    let vin_area = args.vin_text.as_deref().map(read_text).transpose()?;

    info!("Processing file: {}", args.input.display());

    let parser = build_parser(&config, args.as_of);
    let result = parser.extract(&sticker, vin_area.as_deref());

    let output = if args.details {
        if config.output.pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        }
    } else {
        let format = args.format.unwrap_or_else(|| config.output.format.into());
        format_record(&result.record, format, config.output.pretty)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    if !args.details {
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
