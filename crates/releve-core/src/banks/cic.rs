//! CIC statements. Two layouts share the marker: the bank's own format, and
//! the Crédit Mutuel group format printed for CIC accounts held on the
//! group's systems.

use super::{fold_accents, parse_with_layout, BankParser, Marker, StatementParse, CM_GROUP_KEYWORDS};
use crate::model::Bank;
use crate::parsing::amount::AmountFormat;
use crate::parsing::classifier::LineClassifier;
use crate::parsing::continuation::{BoilerplatePolicy, ContinuationPolicy, Scrubber};
use crate::parsing::dates::DateFormat;
use crate::parsing::direction::DirectionRule;
use crate::parsing::matcher::HeaderMatcher;
use crate::parsing::{Layout, Regions};
use std::sync::LazyLock;

const MARKERS: &[Marker] = &[Marker::Acronym("CIC"), Marker::Phrase("Banque CIC")];

const GROUP_COLUMNS_HEADING: &str = "Date Date valeur Opération Débit EUROS Crédit EUROS";

const GROUP_NOISE: &[&str] = &[
    "Page",
    "Sous réserve",
    "Total des mouvements",
    "SOLDE CREDITEUR",
    "<<Suite",
    "Information sur la protection",
    "Date Date valeur",
];

static STANDARD: LazyLock<Layout> = LazyLock::new(standard_layout);
static GROUP: LazyLock<Layout> = LazyLock::new(group_layout);

fn header_matcher() -> HeaderMatcher {
    let d = DateFormat::FullSlashed.pattern();
    let a = AmountFormat::DotGrouped.pattern();
    HeaderMatcher::new(
        &[
            format!(r"^(?P<date>{d})\s+(?P<vdate>{d})\s+(?P<desc>.+?)\s+(?P<amount>{a})$"),
            format!(r"^(?P<date>{d})\s+(?P<vdate>{d})\s+(?P<desc>.+)$"),
        ],
        AmountFormat::DotGrouped,
        DateFormat::FullSlashed,
    )
}

fn standard_layout() -> Layout {
    Layout {
        regions: Regions::Whole,
        date_format: DateFormat::FullSlashed,
        matcher: header_matcher(),
        classifier: LineClassifier::new(
            &[
                "<<Suite au verso>>",
                "Sous réserve",
                "Total des mouvements",
                "SOLDE CREDITEUR",
                "SOLDE DEBITEUR",
                "IBAN :",
                "BIC :",
                "Date Date valeur",
            ],
            &[r"^Page \d+"],
        ),
        continuation: ContinuationPolicy {
            boilerplate: BoilerplatePolicy::Skip,
            max_description: 200,
            ..Default::default()
        },
        direction: DirectionRule::Column,
        description_scrubbers: Vec::new(),
    }
}

fn group_layout() -> Layout {
    Layout {
        regions: Regions::AfterMarker {
            marker: GROUP_COLUMNS_HEADING,
            fallback_whole: true,
        },
        date_format: DateFormat::FullSlashed,
        matcher: header_matcher(),
        classifier: LineClassifier::new(GROUP_NOISE, &[]),
        continuation: ContinuationPolicy {
            max_lines: Some(4),
            boilerplate: BoilerplatePolicy::Stop,
            stop_markers: LineClassifier::new(GROUP_NOISE, &[]),
            max_description: 150,
            min_fragment_len: 3,
            skip_numeric_fragments: true,
            ..Default::default()
        },
        direction: DirectionRule::Keywords(CM_GROUP_KEYWORDS),
        description_scrubbers: vec![Scrubber::new(r"ICS\s*:\s*\S+\s*RUM\s*:\s*\S+", "")],
    }
}

/// True when a CIC statement was printed in the Crédit Mutuel group format.
pub fn is_group_format(text: &str) -> bool {
    fold_accents(text).to_uppercase().contains("CREDIT MUTUEL") || text.contains("CCM")
}

pub struct CicParser;

impl BankParser for CicParser {
    fn bank(&self) -> Bank {
        Bank::Cic
    }

    fn markers(&self) -> &'static [Marker] {
        MARKERS
    }

    fn parse(&self, text: &str) -> StatementParse {
        if is_group_format(text) {
            tracing::debug!("CIC statement in Crédit Mutuel group format");
            parse_with_layout(&GROUP, text)
        } else {
            parse_with_layout(&STANDARD, text)
        }
    }
}
