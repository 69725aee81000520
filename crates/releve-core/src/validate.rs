use crate::model::{Direction, Transaction, UNKNOWN_SECTION};
use crate::parsing::normalize_ws;
use crate::parsing::scanner::DraftTransaction;
use crate::trace::{ParseTrace, TraceStepType};

/// Turn drafts into transactions.
///
/// Drafts without a usable amount are discarded (and traced). Each emitted
/// transaction has exactly one of `debit`/`credit` set, a whitespace-normalized
/// description and a section name (`UNKNOWN` when the layout has none).
pub fn validate(drafts: Vec<DraftTransaction>, trace: &mut ParseTrace) -> Vec<Transaction> {
    let mut transactions = Vec::with_capacity(drafts.len());

    for draft in drafts {
        trace.enter_section(draft.section);
        let description = normalize_ws(&draft.description);

        let Some(amount) = draft.amount else {
            trace.record(
                TraceStepType::Discarded,
                Some(draft.line),
                format!("no usable amount for '{description}'"),
            );
            continue;
        };

        let (debit, credit) = match draft.direction {
            Direction::Debit => (Some(amount), None),
            Direction::Credit => (None, Some(amount)),
        };

        trace.record(
            TraceStepType::Emitted,
            Some(draft.line),
            format!("{:?} {amount} '{description}'", draft.direction),
        );
        transactions.push(Transaction {
            date: draft.date,
            value_date: draft.value_date,
            description,
            debit,
            credit,
            section: draft.section.unwrap_or(UNKNOWN_SECTION).to_string(),
        });
    }

    trace.enter_section(None);
    transactions
}
