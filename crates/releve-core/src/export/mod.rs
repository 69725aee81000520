//! Tabular export of validated transactions.

use crate::error::ReleveError;
use crate::model::Transaction;
use crate::parsing::dates::format_canonical;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldDelimiter {
    #[default]
    #[serde(alias = ";")]
    Semicolon,
    #[serde(alias = ",")]
    Comma,
}

impl FieldDelimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            FieldDelimiter::Semicolon => b';',
            FieldDelimiter::Comma => b',',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    #[default]
    #[serde(alias = ",")]
    Comma,
    #[serde(alias = ".")]
    Point,
}

impl DecimalSeparator {
    /// Render a decimal with this separator, keeping its scale.
    pub fn format(self, value: Decimal) -> String {
        let text = value.to_string();
        match self {
            DecimalSeparator::Point => text,
            DecimalSeparator::Comma => text.replace('.', ","),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: FieldDelimiter,
    pub decimal_separator: DecimalSeparator,
    /// Stable sort by operation date; otherwise document order is kept.
    pub sort_by_date: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: FieldDelimiter::Semicolon,
            decimal_separator: DecimalSeparator::Comma,
            sort_by_date: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: String,
    value_date: String,
    description: &'a str,
    debit: String,
    credit: String,
    amount: String,
    section: &'a str,
}

/// Result of [`export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    /// The CSV could not be written; a plain-text dump was saved instead.
    Degraded { backup: PathBuf, reason: String },
}

/// Records in output order.
pub fn ordered<'a>(records: &'a [Transaction], sort_by_date: bool) -> Vec<&'a Transaction> {
    let mut rows: Vec<&Transaction> = records.iter().collect();
    if sort_by_date {
        rows.sort_by_key(|t| t.date);
    }
    rows
}

/// Write records as CSV with columns
/// `date;value_date;description;debit;credit;amount;section`.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[Transaction],
    options: &CsvOptions,
) -> Result<(), ReleveError> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(options.delimiter.as_byte())
        .from_writer(writer);
    let sep = options.decimal_separator;

    for t in ordered(records, options.sort_by_date) {
        csv.serialize(CsvRow {
            date: format_canonical(t.date),
            value_date: format_canonical(t.value_date),
            description: &t.description,
            debit: t.debit.map(|d| sep.format(d)).unwrap_or_default(),
            credit: t.credit.map(|c| sep.format(c)).unwrap_or_default(),
            amount: sep.format(t.net()),
            section: &t.section,
        })
        .map_err(|e| ReleveError::Sink(e.to_string()))?;
    }

    // Header row even when there is nothing to write.
    if records.is_empty() {
        csv.write_record([
            "date",
            "value_date",
            "description",
            "debit",
            "credit",
            "amount",
            "section",
        ])
        .map_err(|e| ReleveError::Sink(e.to_string()))?;
    }

    csv.flush()?;
    Ok(())
}

/// Write a CSV file atomically: rows go to a temp file beside `path` which
/// is then renamed over it. On failure a `<stem>_backup.txt` dump is written
/// next to the target instead.
pub fn export(
    path: &Path,
    records: &[Transaction],
    options: &CsvOptions,
) -> Result<ExportOutcome, ReleveError> {
    match write_atomic(path, records, options) {
        Ok(()) => {
            tracing::info!(path = %path.display(), rows = records.len(), "CSV written");
            Ok(ExportOutcome::Written {
                path: path.to_path_buf(),
                rows: records.len(),
            })
        }
        Err(e) => {
            let reason = e.to_string();
            let backup = backup_path(path);
            tracing::warn!(
                path = %path.display(),
                backup = %backup.display(),
                %reason,
                "CSV export failed, writing plain-text backup"
            );
            std::fs::write(&backup, dump(records)).map_err(|backup_err| {
                ReleveError::Sink(format!(
                    "{reason}; backup {} also failed: {backup_err}",
                    backup.display()
                ))
            })?;
            Ok(ExportOutcome::Degraded { backup, reason })
        }
    }
}

fn write_atomic(
    path: &Path,
    records: &[Transaction],
    options: &CsvOptions,
) -> Result<(), ReleveError> {
    let dir = parent_dir(path);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write_csv(&mut tmp, records, options)?;
    tmp.persist(path).map_err(|e| ReleveError::Io(e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".into());
    parent_dir(path).join(format!("{stem}_backup.txt"))
}

/// Key/value text rendering, one block per record.
fn dump(records: &[Transaction]) -> String {
    let mut out = String::new();
    for (i, t) in records.iter().enumerate() {
        let _ = writeln!(out, "Transaction {}:", i + 1);
        let _ = writeln!(out, "  date: {}", format_canonical(t.date));
        let _ = writeln!(out, "  value_date: {}", format_canonical(t.value_date));
        let _ = writeln!(out, "  description: {}", t.description);
        let _ = writeln!(out, "  debit: {}", opt(t.debit));
        let _ = writeln!(out, "  credit: {}", opt(t.credit));
        let _ = writeln!(out, "  section: {}", t.section);
        out.push('\n');
    }
    out
}

fn opt(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(day: u32, description: &str, debit: Option<Decimal>, credit: Option<Decimal>) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2023, 2, day).unwrap();
        Transaction {
            date,
            value_date: date,
            description: description.into(),
            debit,
            credit,
            section: "UNKNOWN".into(),
        }
    }

    fn render(records: &[Transaction], options: &CsvOptions) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, records, options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_default_format() {
        let out = render(&[tx(1, "CB SHOP", Some(dec!(1234.50)), None)], &CsvOptions::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "date;value_date;description;debit;credit;amount;section");
        assert_eq!(lines[1], "01/02/2023;01/02/2023;CB SHOP;1234,50;;-1234,50;UNKNOWN");
    }

    #[test]
    fn test_comma_delimiter_and_point_decimals() {
        let options = CsvOptions {
            delimiter: FieldDelimiter::Comma,
            decimal_separator: DecimalSeparator::Point,
            sort_by_date: true,
        };
        let out = render(&[tx(1, "VIR", None, Some(dec!(10.00)))], &options);
        assert_eq!(out.lines().nth(1), Some("01/02/2023,01/02/2023,VIR,,10.00,10.00,UNKNOWN"));
    }

    #[test]
    fn test_sorted_by_date_unless_disabled() {
        let records = [tx(3, "LATE", Some(dec!(1.00)), None), tx(1, "EARLY", Some(dec!(2.00)), None)];
        let sorted = render(&records, &CsvOptions::default());
        assert!(sorted.lines().nth(1).unwrap().contains("EARLY"));

        let options = CsvOptions {
            sort_by_date: false,
            ..Default::default()
        };
        let document = render(&records, &options);
        assert!(document.lines().nth(1).unwrap().contains("LATE"));
    }

    #[test]
    fn test_empty_still_has_header() {
        let out = render(&[], &CsvOptions::default());
        assert_eq!(out.trim_end(), "date;value_date;description;debit;credit;amount;section");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("releve.csv");
        let outcome = export(&path, &[tx(1, "CB", Some(dec!(1.00)), None)], &CsvOptions::default()).unwrap();
        assert_eq!(outcome, ExportOutcome::Written { path: path.clone(), rows: 1 });
        assert!(std::fs::read_to_string(&path).unwrap().contains("CB"));
    }

    #[test]
    fn test_export_degrades_to_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let records = [
            tx(1, "CB SHOP", Some(dec!(1.00)), None),
            tx(2, "VIR RECU", None, Some(dec!(20.00))),
        ];
        let outcome = export(&path, &records, &CsvOptions::default()).unwrap();
        let ExportOutcome::Degraded { backup, .. } = outcome else {
            panic!("expected a degraded export");
        };
        assert_eq!(backup, dir.path().join("out_backup.txt"));
        let text = std::fs::read_to_string(backup).unwrap();
        assert!(text.starts_with("Transaction 1:\n  date: 01/02/2023\n"));
        assert!(text.contains("  description: CB SHOP\n  debit: 1.00\n"));
        assert!(text.contains("\nTransaction 2:\n"));
        assert!(text.contains("  credit: 20.00\n"));
    }
}
