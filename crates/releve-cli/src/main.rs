mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use releve_core::export::{DecimalSeparator, FieldDelimiter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "releve",
    version,
    about = "Convert French bank statement PDFs into CSV transactions"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the transactions of a statement
    Convert {
        /// Path to the statement PDF
        input_file: PathBuf,

        /// Write output to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// CSV field delimiter: ; or ,
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<FieldDelimiter>,

        /// CSV decimal separator: , or .
        #[arg(long, value_parser = parse_decimal)]
        decimal: Option<DecimalSeparator>,

        /// Keep statement order instead of sorting rows by date
        #[arg(long)]
        document_order: bool,

        /// Tesseract language for scanned statements
        #[arg(long, value_name = "LANG")]
        ocr_lang: Option<String>,

        /// Give up on OCR after this many seconds
        #[arg(long, value_name = "SECS")]
        ocr_timeout: Option<u64>,

        /// JSON config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the parse trace as JSON
        #[arg(long, value_name = "FILE")]
        trace: Option<PathBuf>,
    },
    /// Report which bank issued a statement and where its text came from
    Detect {
        /// Path to the statement PDF
        input_file: PathBuf,

        /// JSON config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// List supported banks in detection order
    Banks,
}

fn parse_delimiter(s: &str) -> Result<FieldDelimiter, String> {
    match s {
        ";" | "semicolon" => Ok(FieldDelimiter::Semicolon),
        "," | "comma" => Ok(FieldDelimiter::Comma),
        other => Err(format!("expected ';' or ',', got '{other}'")),
    }
}

fn parse_decimal(s: &str) -> Result<DecimalSeparator, String> {
    match s {
        "," | "comma" => Ok(DecimalSeparator::Comma),
        "." | "point" => Ok(DecimalSeparator::Point),
        other => Err(format!("expected ',' or '.', got '{other}'")),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            input_file,
            output,
            format,
            delimiter,
            decimal,
            document_order,
            ocr_lang,
            ocr_timeout,
            config,
            trace,
        } => commands::convert::run(commands::convert::ConvertArgs {
            input_file,
            output,
            format,
            delimiter,
            decimal,
            document_order,
            ocr_lang,
            ocr_timeout,
            config,
            trace,
        }),
        Commands::Detect { input_file, config } => commands::detect::run(input_file, config),
        Commands::Banks => commands::banks::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
