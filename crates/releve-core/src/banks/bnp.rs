//! BNP Paribas statements: operations grouped under named sections whose
//! heading fixes the side of every amount below it.

use super::{parse_with_layout, BankParser, Marker, StatementParse};
use crate::model::Bank;
use crate::parsing::amount::AmountFormat;
use crate::parsing::classifier::LineClassifier;
use crate::parsing::continuation::{BoilerplatePolicy, ContinuationPolicy};
use crate::parsing::dates::DateFormat;
use crate::parsing::direction::{DirectionRule, SectionKind};
use crate::parsing::matcher::HeaderMatcher;
use crate::parsing::section::SectionLocator;
use crate::parsing::{Layout, Regions, SectionSpec};
use std::sync::LazyLock;

const MARKERS: &[Marker] = &[Marker::Phrase("BNP PARIBAS")];

pub const SECTIONS: [SectionSpec; 6] = [
    SectionSpec {
        name: "VIREMENTS RECUS",
        kind: SectionKind::Credit,
    },
    SectionSpec {
        name: "AUTRES OPERATIONS CREDIT",
        kind: SectionKind::Credit,
    },
    SectionSpec {
        name: "PAIEMENTS PAR CARTES",
        kind: SectionKind::Debit,
    },
    SectionSpec {
        name: "VIREMENTS EMIS",
        kind: SectionKind::Debit,
    },
    SectionSpec {
        name: "PRELEVEMENTS, AMORTISSEMENTS DE PRETS",
        kind: SectionKind::Debit,
    },
    SectionSpec {
        name: "AUTRES OPERATIONS DEBIT",
        kind: SectionKind::Debit,
    },
];

const SUBTOTAL: &str = "Sous total";
const GRAND_TOTAL: &str = "TOTAL DES OPERATIONS";

const SKIP_PHRASES: &[&str] = &[
    "RELEVE DE VOTRE COMPTE",
    "Raison sociale",
    "RIB :",
    "IBAN :",
    "BIC :",
    "Les sommes déposées",
    "www.garantiedesdepots.fr",
    "Relevé N°",
    "PERIODE DU",
    "Solde au",
    "Votre chargé d'Affaires",
    "DATE COMPTABLE",
    "NATURE DES OPERATIONS",
    "DATE DE VALEUR",
    "DEBIT CREDIT",
];

const SKIP_PATTERNS: &[&str] = &[
    r"^- CARTE N°",
    r"^Page \d+",
    r"^BNP PARIBAS SA",
    r"^3478",
    r"^P\.",
    r"^\d{12}$",
    r"^SORPSITSPREPFC",
];

static LAYOUT: LazyLock<Layout> = LazyLock::new(layout);

fn layout() -> Layout {
    let d = DateFormat::ShortDotted.pattern();
    let a = AmountFormat::SpaceGrouped.pattern();

    let mut known: Vec<&'static str> = SECTIONS.iter().map(|s| s.name).collect();
    known.push(GRAND_TOTAL);

    Layout {
        regions: Regions::Sections {
            locator: SectionLocator::new(&[SUBTOTAL], &known),
            sections: SECTIONS.to_vec(),
        },
        date_format: DateFormat::ShortDotted,
        matcher: HeaderMatcher::new(
            &[
                format!(r"^(?P<date>{d})\s+(?P<desc>.+?)\s+(?P<vdate>{d})\s+(?P<amount>{a})$"),
                format!(r"^(?P<date>{d})\s+(?P<desc>.+?)\s+(?P<tail>{a}|{d})$"),
                format!(r"^(?P<date>{d})\s+(?P<desc>.+)$"),
            ],
            AmountFormat::SpaceGrouped,
            DateFormat::ShortDotted,
        ),
        classifier: LineClassifier::new(SKIP_PHRASES, SKIP_PATTERNS),
        continuation: ContinuationPolicy {
            boilerplate: BoilerplatePolicy::Stop,
            stop_markers: LineClassifier::new(&[SUBTOTAL], &[]),
            max_description: 200,
            amount_window: 3,
            ..Default::default()
        },
        direction: DirectionRule::DebitByDefault,
        description_scrubbers: Vec::new(),
    }
}

pub struct BnpParibasParser;

impl BankParser for BnpParibasParser {
    fn bank(&self) -> Bank {
        Bank::BnpParibas
    }

    fn markers(&self) -> &'static [Marker] {
        MARKERS
    }

    fn parse(&self, text: &str) -> StatementParse {
        parse_with_layout(&LAYOUT, text)
    }
}
