use super::{parse_with_layout, BankParser, Marker, StatementParse};
use crate::model::Bank;
use crate::parsing::amount::AmountFormat;
use crate::parsing::classifier::LineClassifier;
use crate::parsing::continuation::{BoilerplatePolicy, ContinuationPolicy, Scrubber};
use crate::parsing::dates::DateFormat;
use crate::parsing::direction::DirectionRule;
use crate::parsing::matcher::HeaderMatcher;
use crate::parsing::{Layout, Regions};
use std::sync::LazyLock;

const MARKERS: &[Marker] = &[
    Marker::Phrase("SOCIETE GENERALE"),
    Marker::Phrase("Société Générale"),
];

const SKIP_PHRASES: &[&str] = &[
    "RELEVÉ DE COMPTE",
    "COMPTE D'ENTREPRISE",
    "envoi n°",
    "VOS CONTACTS",
    "Votre Banque à Distance",
    "TOTAUX DES MOUVEMENTS",
    "NOUVEAU SOLDE",
    "*Opération exonérée",
    "PROGRAMME DE FIDÉLITÉ",
    "Rappel des seuils",
    "suite>>",
];

const SKIP_PATTERNS: &[&str] = &[r"^(Date|Valeur|Nature|Débit|Crédit)\b"];

static LAYOUT: LazyLock<Layout> = LazyLock::new(layout);

fn layout() -> Layout {
    let d = DateFormat::FullSlashed.pattern();
    let a = AmountFormat::DotGrouped.pattern();

    Layout {
        regions: Regions::Whole,
        date_format: DateFormat::FullSlashed,
        matcher: HeaderMatcher::new(
            &[
                format!(r"^(?P<date>{d})\s+(?P<vdate>{d})\s+(?P<desc>.+?)\s+(?P<amount>{a})$"),
                format!(r"^(?P<date>{d})\s+(?P<vdate>{d})\s+(?P<desc>.+)$"),
            ],
            AmountFormat::DotGrouped,
            DateFormat::FullSlashed,
        ),
        classifier: LineClassifier::new(SKIP_PHRASES, SKIP_PATTERNS),
        continuation: ContinuationPolicy {
            boilerplate: BoilerplatePolicy::Skip,
            stop_markers: LineClassifier::new(&[], &[r"^Page \d"]),
            max_description: 200,
            fragment_scrubbers: vec![Scrubber::new(r"\*+$", ""), Scrubber::new(r"^\d+\s+", "")],
            ..Default::default()
        },
        direction: DirectionRule::Column,
        description_scrubbers: Vec::new(),
    }
}

pub struct SocieteGeneraleParser;

impl BankParser for SocieteGeneraleParser {
    fn bank(&self) -> Bank {
        Bank::SocieteGenerale
    }

    fn markers(&self) -> &'static [Marker] {
        MARKERS
    }

    fn parse(&self, text: &str) -> StatementParse {
        parse_with_layout(&LAYOUT, text)
    }
}
