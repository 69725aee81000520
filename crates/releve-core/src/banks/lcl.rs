//! LCL statements: single-line operations after the "ECRITURES DE LA
//! PERIODE" heading. The operation date carries no year and a trailing `.`
//! after the amount marks a credit.

use super::{parse_with_layout, BankParser, Marker, StatementParse};
use crate::model::Bank;
use crate::parsing::amount::AmountFormat;
use crate::parsing::classifier::LineClassifier;
use crate::parsing::continuation::ContinuationPolicy;
use crate::parsing::dates::DateFormat;
use crate::parsing::direction::DirectionRule;
use crate::parsing::matcher::HeaderMatcher;
use crate::parsing::{Layout, Regions};
use std::sync::LazyLock;

const MARKERS: &[Marker] = &[
    Marker::Phrase("CREDIT LYONNAIS"),
    Marker::Phrase("Crédit Lyonnais"),
    Marker::Acronym("LCL"),
];

const OPERATIONS_HEADING: &str = "ECRITURES DE LA PERIODE";

static LAYOUT: LazyLock<Layout> = LazyLock::new(layout);

fn layout() -> Layout {
    let op = DateFormat::DayMonth.pattern();
    let d = DateFormat::ShortDotted.pattern();
    let a = AmountFormat::Loose.pattern();

    Layout {
        regions: Regions::AfterMarker {
            marker: OPERATIONS_HEADING,
            fallback_whole: false,
        },
        date_format: DateFormat::DayMonth,
        matcher: HeaderMatcher::new(
            &[format!(
                r"^(?P<date>{op})\s+(?P<desc>.+?)\s+(?P<vdate>{d})\s+(?P<amount>{a})\s*(?P<credit>\.)?$"
            )],
            AmountFormat::Loose,
            DateFormat::ShortDotted,
        ),
        classifier: LineClassifier::new(&[], &[r"^(Page \d|LIBELLE:|REF\.|ID\.|MANDAT:)"]),
        continuation: ContinuationPolicy {
            max_lines: Some(0),
            ..Default::default()
        },
        direction: DirectionRule::CreditMarker,
        description_scrubbers: Vec::new(),
    }
}

pub struct LclParser;

impl BankParser for LclParser {
    fn bank(&self) -> Bank {
        Bank::Lcl
    }

    fn markers(&self) -> &'static [Marker] {
        MARKERS
    }

    fn parse(&self, text: &str) -> StatementParse {
        parse_with_layout(&LAYOUT, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceStepType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_detect() {
        assert!(LclParser.detect("LCL Le Crédit Lyonnais"));
        assert!(LclParser.detect("CREDIT LYONNAIS SA"));
        assert!(!LclParser.detect("CYCLCLUB"));
    }

    #[test]
    fn test_credit_marker_and_year_resolution() {
        let text = "\
LCL
ECRITURES DE LA PERIODE
07.07  CB BOULANGERIE 06/07  07.07.25  4,50
LIBELLE: BOULANGERIE DU PORT
08.07  VIR SALAIRE ACME  08.07.25  2 100,00 .
REF. 0001234
Page 1 / 2
31.12  PRLV ASSURANCE  02.01.26  35,00";
        let t = LclParser.parse(text).transactions;
        assert_eq!(t.len(), 3);

        assert_eq!(t[0].date, ymd(2025, 7, 7));
        assert_eq!(t[0].value_date, ymd(2025, 7, 7));
        assert_eq!(t[0].description, "CB BOULANGERIE 06/07");
        assert_eq!(t[0].debit, Some(dec!(4.50)));

        assert_eq!(t[1].credit, Some(dec!(2100.00)));
        assert_eq!(t[1].description, "VIR SALAIRE ACME");

        assert_eq!(t[2].date, ymd(2025, 12, 31));
        assert_eq!(t[2].value_date, ymd(2026, 1, 2));
    }

    #[test]
    fn test_nothing_before_heading() {
        let text = "LCL\n07.07  CB BOULANGERIE  07.07.25  4,50";
        let parse = LclParser.parse(text);
        assert!(parse.transactions.is_empty());
        assert_eq!(parse.trace.count(TraceStepType::SectionMissing), 1);
    }
}
