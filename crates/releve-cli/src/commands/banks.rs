use releve_core::banks::{parser_for, Marker};
use releve_core::error::ReleveError;
use releve_core::model::Bank;

pub fn run() -> Result<(), ReleveError> {
    println!("Supported banks, in detection order:\n");
    for (i, bank) in Bank::PRIORITY.iter().enumerate() {
        let markers: Vec<String> = parser_for(*bank)
            .markers()
            .iter()
            .map(|m| match m {
                Marker::Phrase(t) => format!("\"{t}\""),
                Marker::Acronym(t) => format!("\"{t}\" (whole word)"),
            })
            .collect();
        println!("  {}. {:<17} {}", i + 1, bank.to_string(), markers.join(", "));
    }
    Ok(())
}
