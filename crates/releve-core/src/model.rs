use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Section name used when a layout has no named transaction categories.
pub const UNKNOWN_SECTION: &str = "UNKNOWN";

/// Banks whose statement layouts are understood, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bank {
    SocieteGenerale,
    Cic,
    CreditMutuel,
    Lcl,
    BnpParibas,
}

impl Bank {
    pub const PRIORITY: [Bank; 5] = [
        Bank::SocieteGenerale,
        Bank::Cic,
        Bank::CreditMutuel,
        Bank::Lcl,
        Bank::BnpParibas,
    ];
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bank::SocieteGenerale => write!(f, "Société Générale"),
            Bank::Cic => write!(f, "CIC"),
            Bank::CreditMutuel => write!(f, "Crédit Mutuel"),
            Bank::Lcl => write!(f, "LCL"),
            Bank::BnpParibas => write!(f, "BNP Paribas"),
        }
    }
}

/// Which side of the account an amount lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

/// Where the text that was parsed came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    /// Text layer of a digital PDF.
    Structural,
    /// Recognised from rendered page images.
    Ocr,
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSource::Structural => write!(f, "text layer"),
            TextSource::Ocr => write!(f, "OCR"),
        }
    }
}

/// A validated statement line. Exactly one of `debit`/`credit` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "crate::parsing::dates::canonical")]
    pub date: NaiveDate,
    #[serde(with = "crate::parsing::dates::canonical")]
    pub value_date: NaiveDate,
    pub description: String,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub section: String,
}

impl Transaction {
    /// Signed amount: credits positive, debits negative.
    pub fn net(&self) -> Decimal {
        self.credit.unwrap_or_default() - self.debit.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(debit: Option<Decimal>, credit: Option<Decimal>) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        Transaction {
            date,
            value_date: date,
            description: "PAYMENT MERCHANT X".into(),
            debit,
            credit,
            section: UNKNOWN_SECTION.into(),
        }
    }

    #[test]
    fn test_net_is_signed() {
        assert_eq!(sample(Some(dec!(123.45)), None).net(), dec!(-123.45));
        assert_eq!(sample(None, Some(dec!(10.00))).net(), dec!(10.00));
    }

    #[test]
    fn test_serializes_canonical_forms() {
        let json = serde_json::to_value(sample(Some(dec!(1234.56)), None)).unwrap();
        assert_eq!(json["date"], "01/02/2023");
        assert_eq!(json["debit"], "1234.56");
        assert!(json["credit"].is_null());
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(Bank::PRIORITY[0], Bank::SocieteGenerale);
        assert_eq!(Bank::PRIORITY[4], Bank::BnpParibas);
    }
}
