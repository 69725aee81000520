use super::{parse_with_layout, BankParser, Marker, StatementParse, CM_GROUP_KEYWORDS};
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
    Marker::Phrase("CREDIT MUTUEL"),
    Marker::Phrase("Crédit Mutuel"),
];

const SKIP_PHRASES: &[&str] = &[
    "Information sur la protection",
    "Crédit Mutuel",
    "Sous réserve des extournes",
    "Total des mouvements",
    "SOLDE CREDITEUR",
    "<<Suite au verso>>",
    "(GE) : protégé par la Garantie de l'Etat",
    "(GD) : protégé par la Garantie des Dépôts",
    "www.garantiedesdepots.fr",
    "IBAN :",
    "BIC :",
];

// Column titles, anchored so that labels such as "VIR Crédit" survive.
const SKIP_PATTERNS: &[&str] = &[
    r"^Date\b.*\bOpération",
    r"^(Date|Opération|Débit|Crédit)$",
    r"^(Débit|Crédit)\b",
    r"^Page \d",
];

static LAYOUT: LazyLock<Layout> = LazyLock::new(layout);

fn layout() -> Layout {
    let d = DateFormat::FullSlashed.pattern();
    let a = AmountFormat::SpaceGrouped.pattern();

    Layout {
        regions: Regions::Whole,
        date_format: DateFormat::FullSlashed,
        matcher: HeaderMatcher::new(
            &[
                format!(r"^(?P<date>{d})\s+(?P<vdate>{d})\s+(?P<desc>.+?)\s+(?P<amount>{a})$"),
                format!(r"^(?P<date>{d})\s+(?P<vdate>{d})\s+(?P<desc>.+)$"),
            ],
            AmountFormat::SpaceGrouped,
            DateFormat::FullSlashed,
        ),
        classifier: LineClassifier::new(SKIP_PHRASES, SKIP_PATTERNS),
        continuation: ContinuationPolicy {
            boilerplate: BoilerplatePolicy::Skip,
            max_description: 200,
            fragment_scrubbers: vec![
                Scrubber::new(r"ICS : \S+ RUM : \S+", ""),
                Scrubber::new(r"CARTE \d{4}", ""),
            ],
            ..Default::default()
        },
        direction: DirectionRule::Keywords(CM_GROUP_KEYWORDS),
        description_scrubbers: Vec::new(),
    }
}

pub struct CreditMutuelParser;

impl BankParser for CreditMutuelParser {
    fn bank(&self) -> Bank {
        Bank::CreditMutuel
    }

    fn markers(&self) -> &'static [Marker] {
        MARKERS
    }

    fn parse(&self, text: &str) -> StatementParse {
        parse_with_layout(&LAYOUT, text)
    }
}
