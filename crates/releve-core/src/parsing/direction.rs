use super::normalize_ws;
use crate::model::Direction;
use serde::{Deserialize, Serialize};

/// Category of a named statement section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Credit,
    Debit,
}

impl From<SectionKind> for Direction {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Credit => Direction::Credit,
            SectionKind::Debit => Direction::Debit,
        }
    }
}

/// Description keywords that hint at the side of an operation.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    pub credit: &'static [&'static str],
    pub debit: &'static [&'static str],
}

/// Where the amount of a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountOrigin {
    /// Trailing field of the header line.
    HeaderLine,
    /// A bare amount line found after the header.
    Deferred,
}

/// How a layout decides debit vs credit when the section does not say.
#[derive(Debug, Clone, Copy)]
pub enum DirectionRule {
    /// Keyword heuristic; credit keywords win, unmatched descriptions are debits.
    Keywords(KeywordSet),
    /// Column position: header-line amounts sit in the debit column, amounts
    /// pushed onto their own line come from the credit column.
    Column,
    /// Credit when a marker follows the amount, debit otherwise.
    CreditMarker,
    /// Every amount is a debit unless the section says otherwise.
    DebitByDefault,
}

/// Evidence available for one record.
#[derive(Debug, Clone, Copy)]
pub struct DirectionEvidence<'a> {
    pub section: Option<SectionKind>,
    pub description: &'a str,
    pub origin: AmountOrigin,
    pub credit_marker: bool,
}

/// Assign a record's amount to debit or credit.
///
/// An unambiguous section always wins; otherwise the layout's rule applies.
pub fn classify(rule: &DirectionRule, evidence: &DirectionEvidence<'_>) -> Direction {
    if let Some(kind) = evidence.section {
        return kind.into();
    }
    match rule {
        DirectionRule::Keywords(keywords) => classify_by_keywords(keywords, evidence.description),
        DirectionRule::Column => match evidence.origin {
            AmountOrigin::HeaderLine => Direction::Debit,
            AmountOrigin::Deferred => Direction::Credit,
        },
        DirectionRule::CreditMarker => {
            if evidence.credit_marker {
                Direction::Credit
            } else {
                Direction::Debit
            }
        }
        DirectionRule::DebitByDefault => Direction::Debit,
    }
}

pub fn classify_by_keywords(keywords: &KeywordSet, description: &str) -> Direction {
    matched_keyword(keywords, description)
        .map(|(_, direction)| direction)
        .unwrap_or(Direction::Debit)
}

/// The first keyword found in the description, credit keywords checked first.
pub fn matched_keyword(
    keywords: &KeywordSet,
    description: &str,
) -> Option<(&'static str, Direction)> {
    let upper = normalize_ws(description).to_uppercase();

    let credit = keywords
        .credit
        .iter()
        .find(|k| upper.contains(**k))
        .map(|k| (*k, Direction::Credit));
    credit.or_else(|| {
        keywords
            .debit
            .iter()
            .find(|k| upper.contains(**k))
            .map(|k| (*k, Direction::Debit))
    })
}
