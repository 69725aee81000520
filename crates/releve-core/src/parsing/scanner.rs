use super::amount::parse_amount;
use super::continuation::Resolver;
use super::dates::{resolve_day_month, PrintedDate};
use super::direction::{classify, AmountOrigin, DirectionEvidence};
use super::matcher::HeaderMatch;
use super::{normalize_ws, Layout, Region};
use crate::model::Direction;
use crate::trace::{ParseTrace, TraceStepType};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A candidate record before validation. Carries bookkeeping the final
/// `Transaction` does not expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftTransaction {
    /// Index of the header line.
    pub line: usize,
    /// First line after everything this record consumed.
    pub next_line: usize,
    pub date: NaiveDate,
    pub value_date: NaiveDate,
    pub description: String,
    pub amount: Option<Decimal>,
    pub direction: Direction,
    pub section: Option<&'static str>,
}

#[derive(Debug)]
enum ScanState {
    SeekingSection { next_region: usize },
    Scanning { at: usize },
    Continuation { header_at: usize, header: HeaderMatch },
    Done,
}

pub(crate) struct Scanner<'a> {
    layout: &'a Layout,
    lines: &'a [&'a str],
    regions: Vec<Region>,
    current: usize,
    drafts: Vec<DraftTransaction>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(layout: &'a Layout, lines: &'a [&'a str]) -> Self {
        Self {
            layout,
            lines,
            regions: layout.regions(lines),
            current: 0,
            drafts: Vec::new(),
        }
    }

    pub(crate) fn run(mut self, trace: &mut ParseTrace) -> Vec<DraftTransaction> {
        let mut state = ScanState::SeekingSection { next_region: 0 };
        loop {
            state = match state {
                ScanState::SeekingSection { next_region } => self.seek(next_region, trace),
                ScanState::Scanning { at } => self.scan(at, trace),
                ScanState::Continuation { header_at, header } => {
                    self.continue_record(header_at, header, trace)
                }
                ScanState::Done => break,
            };
        }
        trace.enter_section(None);
        self.drafts
    }

    fn seek(&mut self, next_region: usize, trace: &mut ParseTrace) -> ScanState {
        let Some(region) = self.regions.get(next_region) else {
            return ScanState::Done;
        };
        self.current = next_region;
        trace.enter_section(region.section.map(|s| s.name));

        if region.range.is_empty() {
            trace.record(
                TraceStepType::SectionMissing,
                None,
                format!("no lines for '{}'", region.label),
            );
            return ScanState::SeekingSection {
                next_region: next_region + 1,
            };
        }

        trace.record(
            TraceStepType::SectionFound,
            Some(region.range.start),
            format!(
                "'{}' spans lines {}..{}",
                region.label, region.range.start, region.range.end
            ),
        );
        ScanState::Scanning {
            at: region.range.start,
        }
    }

    fn scan(&mut self, at: usize, trace: &mut ParseTrace) -> ScanState {
        let end = self.regions[self.current].range.end;
        if at >= end {
            return ScanState::SeekingSection {
                next_region: self.current + 1,
            };
        }

        let line = self.lines[at].trim();
        if line.is_empty() {
            return ScanState::Scanning { at: at + 1 };
        }

        if let Some(reason) = self.layout.classifier.reason(line) {
            trace.record(TraceStepType::Boilerplate, Some(at), reason);
            return ScanState::Scanning { at: at + 1 };
        }

        if let Some(header) = self.layout.matcher.match_line(line) {
            trace.record(TraceStepType::HeaderMatched, Some(at), line);
            return ScanState::Continuation {
                header_at: at,
                header,
            };
        }

        if self.layout.continuation.stop_markers.is_skip(line) {
            trace.record(TraceStepType::Boilerplate, Some(at), "stop marker outside a record");
        } else {
            trace.record(TraceStepType::Unmatched, Some(at), line);
        }
        ScanState::Scanning { at: at + 1 }
    }

    fn continue_record(
        &mut self,
        header_at: usize,
        header: HeaderMatch,
        trace: &mut ParseTrace,
    ) -> ScanState {
        let layout = self.layout;
        let end = self.regions[self.current].range.end;
        let section = self.regions[self.current].section;
        let reject = ScanState::Scanning { at: header_at + 1 };

        let Some((date, value_date)) = self.dates(&header) else {
            trace.record(
                TraceStepType::MalformedDate,
                Some(header_at),
                format!(
                    "unusable date '{}' / value date '{}'",
                    header.date,
                    header.value_date.as_deref().unwrap_or("-")
                ),
            );
            return reject;
        };

        let resolver = Resolver {
            policy: &layout.continuation,
            matcher: &layout.matcher,
            classifier: &layout.classifier,
        };
        let continuation = resolver.resolve(
            self.lines,
            header_at + 1,
            end,
            &header.description,
            header.amount.is_none(),
            trace,
        );

        let (raw_amount, origin) = match (&header.amount, &continuation.amount) {
            (Some(raw), _) => (raw.as_str(), AmountOrigin::HeaderLine),
            (None, Some(raw)) => (raw.as_str(), AmountOrigin::Deferred),
            (None, None) => {
                trace.record(
                    TraceStepType::MissingAmount,
                    Some(header_at),
                    format!("no amount for '{}'", header.description),
                );
                return reject;
            }
        };

        let mut description = continuation.description;
        for scrubber in &layout.description_scrubbers {
            description = scrubber.apply(&description);
        }
        let description = normalize_ws(&description);

        let direction = classify(
            &layout.direction,
            &DirectionEvidence {
                section: section.map(|s| s.kind),
                description: &description,
                origin,
                credit_marker: header.credit_marker,
            },
        );

        self.drafts.push(DraftTransaction {
            line: header_at,
            next_line: continuation.next_line,
            date,
            value_date,
            description,
            amount: parse_amount(raw_amount),
            direction,
            section: section.map(|s| s.name),
        });

        ScanState::Scanning {
            at: continuation.next_line,
        }
    }

    /// Operation and value dates. The value date defaults to the operation
    /// date; a year-less operation date takes its year from the value date.
    fn dates(&self, header: &HeaderMatch) -> Option<(NaiveDate, NaiveDate)> {
        let value_date = match &header.value_date {
            Some(raw) => match self.layout.matcher.value_date_format().parse(raw)? {
                PrintedDate::Full(d) => Some(d),
                PrintedDate::DayMonth { .. } => return None,
            },
            None => None,
        };

        let date = match self.layout.date_format.parse(&header.date)? {
            PrintedDate::Full(d) => d,
            PrintedDate::DayMonth { day, month } => resolve_day_month(day, month, value_date?)?,
        };

        Some((date, value_date.unwrap_or(date)))
    }
}
