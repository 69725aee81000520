use releve_core::config::{load_config, ConvertConfig};
use releve_core::error::ReleveError;
use releve_core::export::{export, write_csv, DecimalSeparator, ExportOutcome, FieldDelimiter};
use releve_core::extraction::ocr::TesseractExtractor;
use releve_core::extraction::pdftotext::PdftotextExtractor;
use releve_core::summary::Summary;
use std::path::PathBuf;

use crate::output;
use crate::OutputFormat;

pub struct ConvertArgs {
    pub input_file: PathBuf,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub delimiter: Option<FieldDelimiter>,
    pub decimal: Option<DecimalSeparator>,
    pub document_order: bool,
    pub ocr_lang: Option<String>,
    pub ocr_timeout: Option<u64>,
    pub config: Option<PathBuf>,
    pub trace: Option<PathBuf>,
}

pub fn run(args: ConvertArgs) -> Result<(), ReleveError> {
    let config = resolve_config(&args)?;

    let pdf_bytes = std::fs::read(&args.input_file)?;
    if !PdftotextExtractor::is_available() {
        tracing::warn!("pdftotext not found, only OCR can read this statement");
    }
    let extractor = PdftotextExtractor::new();
    let ocr = TesseractExtractor::new(config.ocr.clone());
    let conversion = releve_core::convert_pdf(&pdf_bytes, &extractor, &ocr, &config)?;

    if let Some(path) = &args.trace {
        std::fs::write(path, serde_json::to_string_pretty(&conversion.trace)?)?;
        eprintln!("Parse trace written to {}", path.display());
    }

    match args.format {
        OutputFormat::Csv => match &args.output {
            Some(path) => report_export(export(path, &conversion.transactions, &config.csv)?),
            None => write_csv(std::io::stdout().lock(), &conversion.transactions, &config.csv)?,
        },
        OutputFormat::Json => {
            let json = output::json::render(&conversion)?;
            match &args.output {
                Some(path) => {
                    std::fs::write(path, json)?;
                    eprintln!("Written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        OutputFormat::Table => output::table::print(&conversion, config.csv.sort_by_date),
    }

    output::table::print_summary(&Summary::of(&conversion.transactions));
    Ok(())
}

/// Config file (if any), then command-line overrides.
fn resolve_config(args: &ConvertArgs) -> Result<ConvertConfig, ReleveError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ConvertConfig::default(),
    };
    if let Some(d) = args.delimiter {
        config.csv.delimiter = d;
    }
    if let Some(d) = args.decimal {
        config.csv.decimal_separator = d;
    }
    if args.document_order {
        config.csv.sort_by_date = false;
    }
    if let Some(lang) = &args.ocr_lang {
        config.ocr.language = lang.clone();
    }
    if let Some(secs) = args.ocr_timeout {
        config.ocr.timeout_secs = secs;
    }
    Ok(config)
}

fn report_export(outcome: ExportOutcome) {
    match outcome {
        ExportOutcome::Written { path, rows } => {
            eprintln!("Wrote {rows} transaction(s) to {}", path.display());
        }
        ExportOutcome::Degraded { backup, reason } => {
            eprintln!("warning: CSV export failed: {reason}");
            eprintln!("  raw records saved to {}", backup.display());
        }
    }
}
