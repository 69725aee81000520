use releve_core::export::ordered;
use releve_core::parsing::dates::format_canonical;
use releve_core::summary::Summary;
use releve_core::Conversion;

const MAX_DESCRIPTION: usize = 60;

pub fn print(conversion: &Conversion, sort_by_date: bool) {
    println!("=== {} ({}) ===\n", conversion.bank, conversion.source);

    if conversion.transactions.is_empty() {
        println!("  No transactions found.");
        return;
    }

    let rows = ordered(&conversion.transactions, sort_by_date);
    let desc_width = rows
        .iter()
        .map(|t| t.description.chars().count().min(MAX_DESCRIPTION))
        .max()
        .unwrap_or(11);

    println!(
        "  {:<10}  {:<10}  {:<desc_width$}  {:>12}  {:>12}  Section",
        "Date", "Valeur", "Description", "Debit", "Credit"
    );
    for t in rows {
        println!(
            "  {:<10}  {:<10}  {:<desc_width$}  {:>12}  {:>12}  {}",
            format_canonical(t.date),
            format_canonical(t.value_date),
            truncate(&t.description, MAX_DESCRIPTION),
            t.debit.map(|d| d.to_string()).unwrap_or_default(),
            t.credit.map(|c| c.to_string()).unwrap_or_default(),
            t.section,
        );
    }
    println!();
}

/// Totals go to stderr so they never mix with CSV or JSON on stdout.
pub fn print_summary(summary: &Summary) {
    eprintln!(
        "{} transaction(s): debit {}, credit {}, net {}",
        summary.count, summary.total_debit, summary.total_credit, summary.net
    );
    if summary.per_section.len() > 1 {
        for (section, count) in &summary.per_section {
            eprintln!("  {section}: {count}");
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max - 1).collect();
        cut.push('…');
        cut
    }
}
