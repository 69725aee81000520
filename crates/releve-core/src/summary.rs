use crate::model::Transaction;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals over a converted statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    /// `total_credit - total_debit`.
    pub net: Decimal,
    pub per_section: BTreeMap<String, usize>,
}

impl Summary {
    pub fn of(records: &[Transaction]) -> Self {
        let mut summary = Summary::default();
        for t in records {
            summary.count += 1;
            summary.total_debit += t.debit.unwrap_or_default();
            summary.total_credit += t.credit.unwrap_or_default();
            *summary.per_section.entry(t.section.clone()).or_default() += 1;
        }
        summary.net = summary.total_credit - summary.total_debit;
        summary
    }
}
