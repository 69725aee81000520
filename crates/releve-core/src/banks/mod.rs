//! Per-bank statement layouts and the parser interface the dispatcher uses.

pub mod bnp;
pub mod cic;
pub mod credit_mutuel;
pub mod lcl;
pub mod societe_generale;

use crate::model::{Bank, Transaction};
use crate::parsing::direction::KeywordSet;
use crate::parsing::Layout;
use crate::trace::ParseTrace;
use crate::validate::validate;

/// Operation keywords used by the Crédit Mutuel group (Crédit Mutuel and
/// CIC statements printed by the group's systems).
pub const CM_GROUP_KEYWORDS: KeywordSet = KeywordSet {
    credit: &["REMCB", "REM CHQ", "VRST", "VIR INST"],
    debit: &[
        "PAIEMENT CB",
        "PAIEMENT PSC",
        "CHEQUE",
        "PRLV SEPA",
        "COMCB",
        "FACT",
    ],
};

/// A literal that identifies the issuing bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Substring match.
    Phrase(&'static str),
    /// Whole-word match, for short acronyms that occur inside other words.
    Acronym(&'static str),
}

impl Marker {
    pub fn text(&self) -> &'static str {
        match self {
            Marker::Phrase(t) | Marker::Acronym(t) => *t,
        }
    }

    /// Match against the text as printed, or against its accent-folded form.
    pub fn matches(&self, text: &str, folded: &str) -> bool {
        let needle = self.text();
        let folded_needle = fold_accents(needle);
        match self {
            Marker::Phrase(_) => text.contains(needle) || folded.contains(&folded_needle),
            Marker::Acronym(_) => {
                contains_word(text, needle) || contains_word(folded, &folded_needle)
            }
        }
    }
}

/// Result of parsing one statement.
#[derive(Debug, Clone)]
pub struct StatementParse {
    pub transactions: Vec<Transaction>,
    pub trace: ParseTrace,
}

/// One bank's detector and parser.
pub trait BankParser: Send + Sync {
    fn bank(&self) -> Bank;

    fn markers(&self) -> &'static [Marker];

    /// True when any of the bank's markers appears in `text`.
    fn detect(&self, text: &str) -> bool {
        let folded = fold_accents(text);
        self.markers().iter().any(|m| m.matches(text, &folded))
    }

    /// Extract transactions from the full statement text, in document order.
    fn parse(&self, text: &str) -> StatementParse;
}

/// All parsers, in detection priority order.
pub fn parsers() -> Vec<Box<dyn BankParser>> {
    Bank::PRIORITY.iter().map(|b| parser_for(*b)).collect()
}

pub fn parser_for(bank: Bank) -> Box<dyn BankParser> {
    match bank {
        Bank::SocieteGenerale => Box::new(societe_generale::SocieteGeneraleParser),
        Bank::Cic => Box::new(cic::CicParser),
        Bank::CreditMutuel => Box::new(credit_mutuel::CreditMutuelParser),
        Bank::Lcl => Box::new(lcl::LclParser),
        Bank::BnpParibas => Box::new(bnp::BnpParibasParser),
    }
}

/// Run a layout over statement text and validate the result.
pub fn parse_with_layout(layout: &Layout, text: &str) -> StatementParse {
    let lines: Vec<&str> = text.lines().collect();
    let mut trace = ParseTrace::new();
    let drafts = layout.scan(&lines, &mut trace);
    let transactions = validate(drafts, &mut trace);
    StatementParse {
        transactions,
        trace,
    }
}

/// Replace accented Latin letters with their base letter.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'À' | 'Â' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'î' | 'ï' => 'i',
            'Î' | 'Ï' => 'I',
            'ô' | 'ö' => 'o',
            'Ô' | 'Ö' => 'O',
            'ù' | 'û' | 'ü' => 'u',
            'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, m)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + m.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
