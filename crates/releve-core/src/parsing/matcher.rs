use super::amount::AmountFormat;
use super::dates::DateFormat;
use regex::Regex;

/// Fields pulled out of a transaction header line, still in printed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub date: String,
    pub value_date: Option<String>,
    pub description: String,
    pub amount: Option<String>,
    /// A credit marker printed after the amount (LCL's trailing `.`).
    pub credit_marker: bool,
}

/// Ordered header patterns for one layout, most specific first.
///
/// Patterns use named groups: `date` and `desc` are required; `vdate`,
/// `amount` and `credit` are optional. A `tail` group holds a trailing token
/// that may be either an amount or a value date and is resolved by shape.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    patterns: Vec<Regex>,
    amount_format: AmountFormat,
    value_date_format: DateFormat,
}

impl HeaderMatcher {
    pub fn new(
        patterns: &[String],
        amount_format: AmountFormat,
        value_date_format: DateFormat,
    ) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("header pattern is a valid regex"))
                .collect(),
            amount_format,
            value_date_format,
        }
    }

    pub fn amount_format(&self) -> AmountFormat {
        self.amount_format
    }

    pub fn value_date_format(&self) -> DateFormat {
        self.value_date_format
    }

    /// True when any pattern recognises the line as the start of a transaction.
    pub fn is_header(&self, line: &str) -> bool {
        let line = line.trim();
        self.patterns.iter().any(|re| re.is_match(line))
    }

    /// Try each pattern in order and return the first usable decomposition.
    pub fn match_line(&self, line: &str) -> Option<HeaderMatch> {
        let line = line.trim();
        self.patterns.iter().find_map(|re| self.decompose(re, line))
    }

    fn decompose(&self, re: &Regex, line: &str) -> Option<HeaderMatch> {
        let caps = re.captures(line)?;
        let text = |name: &str| caps.name(name).map(|m| m.as_str().trim().to_string());

        let mut value_date = text("vdate");
        let mut amount = text("amount");

        if let Some(tail) = text("tail") {
            if self.amount_format.is_bare(&tail) {
                amount = Some(tail);
            } else if self.value_date_format.is_shaped(&tail) {
                value_date = Some(tail);
            } else {
                return None;
            }
        }

        Some(HeaderMatch {
            date: text("date")?,
            value_date,
            description: text("desc")?,
            amount,
            credit_marker: caps.name("credit").is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bnp_like() -> HeaderMatcher {
        let d = DateFormat::ShortDotted.pattern();
        let a = AmountFormat::SpaceGrouped.pattern();
        HeaderMatcher::new(
            &[
                format!(r"^(?P<date>{d})\s+(?P<desc>.+?)\s+(?P<vdate>{d})\s+(?P<amount>{a})$"),
                format!(r"^(?P<date>{d})\s+(?P<desc>.+?)\s+(?P<tail>{a}|{d})$"),
                format!(r"^(?P<date>{d})\s+(?P<desc>.+)$"),
            ],
            AmountFormat::SpaceGrouped,
            DateFormat::ShortDotted,
        )
    }

    #[test]
    fn test_all_four_fields() {
        let m = bnp_like()
            .match_line("01.02.23  PAYMENT MERCHANT X  01.02.23  1 123,45")
            .unwrap();
        assert_eq!(m.date, "01.02.23");
        assert_eq!(m.value_date.as_deref(), Some("01.02.23"));
        assert_eq!(m.description, "PAYMENT MERCHANT X");
        assert_eq!(m.amount.as_deref(), Some("1 123,45"));
    }

    #[test]
    fn test_tail_is_amount() {
        let m = bnp_like().match_line("01.02.23 COMMISSIONS 12,00").unwrap();
        assert_eq!(m.value_date, None);
        assert_eq!(m.amount.as_deref(), Some("12,00"));
        assert_eq!(m.description, "COMMISSIONS");
    }

    #[test]
    fn test_tail_is_value_date() {
        let m = bnp_like().match_line("01.02.23 PRLV SEPA EDF 03.02.23").unwrap();
        assert_eq!(m.value_date.as_deref(), Some("03.02.23"));
        assert_eq!(m.amount, None);
        assert_eq!(m.description, "PRLV SEPA EDF");
    }

    #[test]
    fn test_date_and_description_only() {
        let m = bnp_like().match_line("01.02.23 VIR SEPA RECU /DE ACME").unwrap();
        assert_eq!(m.amount, None);
        assert_eq!(m.value_date, None);
        assert_eq!(m.description, "VIR SEPA RECU /DE ACME");
    }

    #[test]
    fn test_non_header() {
        let m = bnp_like();
        assert!(m.match_line("/REF 0042 FACTURE").is_none());
        assert!(!m.is_header("123,45"));
        assert!(m.is_header("01.02.23 DU 010223 CARREFOUR"));
    }

    #[test]
    fn test_credit_marker_group() {
        let m = HeaderMatcher::new(
            &[r"^(?P<date>\d{2}\.\d{2})\s+(?P<desc>.+?)\s+(?P<vdate>\d{2}\.\d{2}\.\d{2})\s+(?P<amount>\d[\d ]*,\d{2})\s*(?P<credit>\.)?$".to_string()],
            AmountFormat::Loose,
            DateFormat::ShortDotted,
        );
        assert!(m.match_line("07.07 VIR SALAIRE 07.07.25 2 100,00 .").unwrap().credit_marker);
        assert!(!m.match_line("07.07 CB BOULANGERIE 07.07.25 4,50").unwrap().credit_marker);
    }
}
