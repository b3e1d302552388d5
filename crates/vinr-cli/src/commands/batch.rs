//! Batch processing command for multiple OCR text files.
//!
//! A file `<stem>.vin.txt` next to `<stem>.txt` is used as that file's
//! VIN-area text and is not processed on its own.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use vinr_core::{ExtractionResult, VehicleExtractor, VehicleInfoParser, YearMonth};

use super::{build_parser, format_record, load_config, read_text, OutputFormat};

const VIN_AREA_SUFFIX: &str = ".vin.txt";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for sticker-area text files
    #[arg(required = true)]
    input: String,

    /// Output directory (default: records are printed to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from configuration)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Month treated as "now" when rejecting future dates (YYYY-MM)
    #[arg(long, value_name = "YYYY-MM")]
    as_of: Option<YearMonth>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    extraction: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_sticker_text(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    // Records may go to stdout, so status lines go to stderr.
    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let format = args.format.unwrap_or_else(|| config.output.format.into());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
        check_no_overwrite(&files, output_dir, format)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(build_parser(&config, args.as_of));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let parser = Arc::clone(&parser);
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let worker_path = path.clone();
                let result =
                    tokio::task::spawn_blocking(move || process_single_file(&worker_path, &parser))
                        .await?;
                Ok::<_, anyhow::Error>((path, result))
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());

    for handle in handles {
        let (path, result) = handle.await??;

        match result {
            Ok(extraction) => {
                results.push(ProcessResult {
                    path,
                    processing_time_ms: extraction.processing_time_ms,
                    extraction: Some(extraction),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        extraction: None,
                        error: Some(error_msg),
                        processing_time_ms: 0,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.extraction.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in &successful {
        let Some(extraction) = &result.extraction else {
            continue;
        };
        let content = format_record(&extraction.record, format, config.output.pretty)?;

        match &args.output_dir {
            Some(output_dir) => {
                let output_path = output_path(output_dir, &result.path, format);
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => println!("{}", content.trim_end()),
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// `.txt` files that are not VIN-area companions.
fn is_sticker_text(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    name.ends_with(".txt") && !name.ends_with(VIN_AREA_SUFFIX)
}

/// The VIN-area companion of a sticker text file.
fn vin_area_path(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    Some(path.with_file_name(format!("{stem}{VIN_AREA_SUFFIX}")))
}

/// Where the record for `input` is written inside `output_dir`.
fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("record");
    output_dir.join(format!("{}.{}", stem, format.extension()))
}

/// Fails before any work is done if a record would replace an input file.
fn check_no_overwrite(files: &[PathBuf], output_dir: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let inputs: HashSet<PathBuf> = files
        .iter()
        .flat_map(|path| std::iter::once(path.clone()).chain(vin_area_path(path)))
        .filter_map(|path| fs::canonicalize(path).ok())
        .collect();

    for file in files {
        let target = output_path(output_dir, file, format);
        let Ok(target) = fs::canonicalize(&target) else {
            continue;
        };
        if inputs.contains(&target) {
            anyhow::bail!(
                "Refusing to overwrite input file {} (choose another --output-dir or --format)",
                target.display()
            );
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, parser: &VehicleInfoParser) -> anyhow::Result<ExtractionResult> {
    let sticker = read_text(path)?;
    if sticker.trim().is_empty() {
        anyhow::bail!("No text detected");
    }

    let vin_area = match vin_area_path(path) {
        Some(companion) if companion.exists() => {
            debug!("Using VIN-area text {}", companion.display());
            Some(read_text(&companion)?)
        }
        _ => None,
    };

    Ok(parser.extract(&sticker, vin_area.as_deref()))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "VIN",
        "Maker",
        "Year",
        "Model",
        "used_vin_area",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.extraction {
            let record = &extraction.record;
            wtr.write_record([
                filename,
                "success",
                &record.vin,
                &record.maker,
                &record.year,
                &record.model,
                &extraction.used_vin_area.to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vin_area_files_are_not_stickers() {
        assert!(is_sticker_text(Path::new("scans/car1.txt")));
        assert!(is_sticker_text(Path::new("scans/CAR1.TXT")));
        assert!(!is_sticker_text(Path::new("scans/car1.vin.txt")));
        assert!(!is_sticker_text(Path::new("scans/car1.json")));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("scans/car1.txt"), OutputFormat::Json),
            PathBuf::from("out/car1.json")
        );
    }

    #[test]
    fn test_text_output_into_input_dir_is_refused() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("car1.txt");
        fs::write(&input, "모델명: 쏘렌토\n").unwrap();
        let files = vec![input];

        let err = check_no_overwrite(&files, dir.path(), OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("Refusing to overwrite"));

        assert!(check_no_overwrite(&files, dir.path(), OutputFormat::Json).is_ok());
        assert!(check_no_overwrite(&files, &dir.path().join("out"), OutputFormat::Text).is_ok());
    }

    #[test]
    fn test_vin_area_path() {
        assert_eq!(
            vin_area_path(Path::new("scans/car1.txt")),
            Some(PathBuf::from("scans/car1.vin.txt"))
        );
    }
}
