use super::classifier::LineClassifier;
use super::matcher::HeaderMatcher;
use super::normalize_ws;
use crate::trace::{ParseTrace, TraceStepType};
use regex::Regex;

/// What a layout does with a boilerplate (or blank) line met mid-description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoilerplatePolicy {
    /// Drop the line and keep scanning.
    Skip,
    /// End the transaction there.
    Stop,
}

/// A regex substitution applied to description text.
#[derive(Debug, Clone)]
pub struct Scrubber {
    pattern: Regex,
    replacement: &'static str,
}

impl Scrubber {
    pub fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("scrubber pattern is a valid regex"),
            replacement,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct ContinuationPolicy {
    /// Upper bound on lines examined after the header; `Some(0)` disables
    /// continuation, `None` scans to the next stop condition.
    pub max_lines: Option<usize>,
    pub boilerplate: BoilerplatePolicy,
    /// Phrases that always end a transaction (subtotals, page markers).
    pub stop_markers: LineClassifier,
    /// Once the description reaches this many characters, further lines are
    /// consumed but not appended.
    pub max_description: usize,
    /// Lines after the header searched for a missing amount.
    pub amount_window: usize,
    /// Fragments shorter than this are not appended.
    pub min_fragment_len: usize,
    /// Digit-only fragments are not appended.
    pub skip_numeric_fragments: bool,
    pub fragment_scrubbers: Vec<Scrubber>,
}

impl Default for ContinuationPolicy {
    fn default() -> Self {
        Self {
            max_lines: None,
            boilerplate: BoilerplatePolicy::Skip,
            stop_markers: LineClassifier::default(),
            max_description: 200,
            amount_window: 3,
            min_fragment_len: 1,
            skip_numeric_fragments: false,
            fragment_scrubbers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    RegionEnd,
    LineLimit,
    NextHeader,
    /// A bare amount while the record already had one; left unconsumed.
    BareAmount,
    /// A bare amount supplied the missing amount and was consumed.
    AmountFound,
    /// No amount turned up inside the search window.
    AmountWindow,
    StopPhrase,
    Boilerplate,
    BlankLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    pub description: String,
    pub amount: Option<String>,
    /// First line not consumed by this transaction.
    pub next_line: usize,
    pub stop: StopReason,
}

/// Grows a transaction past its header line.
pub struct Resolver<'a> {
    pub policy: &'a ContinuationPolicy,
    pub matcher: &'a HeaderMatcher,
    pub classifier: &'a LineClassifier,
}

impl Resolver<'_> {
    /// Consume lines from `start` (the line after the header) up to `end`.
    ///
    /// With `amount_needed`, the first bare amount line within the search
    /// window is consumed as the amount and ends the scan.
    pub fn resolve(
        &self,
        lines: &[&str],
        start: usize,
        end: usize,
        header_description: &str,
        amount_needed: bool,
        trace: &mut ParseTrace,
    ) -> Continuation {
        let policy = self.policy;
        let amount_format = self.matcher.amount_format();
        let end = end.min(lines.len());
        let limit = policy
            .max_lines
            .map(|m| (start + m).min(end))
            .unwrap_or(end);

        let mut description = header_description.to_string();
        let mut i = start;

        let stop = loop {
            if i >= end {
                break StopReason::RegionEnd;
            }
            if i >= limit {
                break StopReason::LineLimit;
            }
            if amount_needed && i >= start + policy.amount_window {
                break StopReason::AmountWindow;
            }

            let line = lines[i].trim();

            if line.is_empty() {
                if policy.boilerplate == BoilerplatePolicy::Stop {
                    break StopReason::BlankLine;
                }
                i += 1;
                continue;
            }

            if self.classifier.is_skip(line) {
                if policy.boilerplate == BoilerplatePolicy::Stop {
                    break StopReason::Boilerplate;
                }
                trace.record(
                    TraceStepType::Boilerplate,
                    Some(i),
                    format!("skipped inside description: {line}"),
                );
                i += 1;
                continue;
            }

            if self.matcher.is_header(line) {
                break StopReason::NextHeader;
            }

            if amount_format.is_bare(line) {
                if amount_needed {
                    trace.record(
                        TraceStepType::AmountBackfilled,
                        Some(i),
                        format!("amount '{line}' taken from its own line"),
                    );
                    return Continuation {
                        description,
                        amount: Some(line.to_string()),
                        next_line: i + 1,
                        stop: StopReason::AmountFound,
                    };
                }
                break StopReason::BareAmount;
            }

            if policy.stop_markers.is_skip(line) {
                break StopReason::StopPhrase;
            }

            if description.chars().count() < policy.max_description {
                if let Some(fragment) = self.fragment(line) {
                    trace.record(
                        TraceStepType::Continuation,
                        Some(i),
                        format!("appended '{fragment}'"),
                    );
                    description.push(' ');
                    description.push_str(&fragment);
                }
            }
            i += 1;
        };

        trace.record(
            TraceStepType::ContinuationStopped,
            Some(i),
            format!("{stop:?}"),
        );

        Continuation {
            description,
            amount: None,
            next_line: i,
            stop,
        }
    }

    fn fragment(&self, line: &str) -> Option<String> {
        let policy = self.policy;
        let mut fragment = normalize_ws(line);
        for scrubber in &policy.fragment_scrubbers {
            fragment = scrubber.apply(&fragment);
        }
        let fragment = fragment.trim();

        if fragment.chars().count() < policy.min_fragment_len.max(1) {
            return None;
        }
        if policy.skip_numeric_fragments && fragment.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(fragment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::amount::AmountFormat;
    use crate::parsing::dates::DateFormat;

    fn matcher() -> HeaderMatcher {
        let d = DateFormat::ShortDotted.pattern();
        let a = AmountFormat::SpaceGrouped.pattern();
        HeaderMatcher::new(
            &[
                format!(r"^(?P<date>{d})\s+(?P<desc>.+?)\s+(?P<tail>{a}|{d})$"),
                format!(r"^(?P<date>{d})\s+(?P<desc>.+)$"),
            ],
            AmountFormat::SpaceGrouped,
            DateFormat::ShortDotted,
        )
    }

    fn classifier() -> LineClassifier {
        LineClassifier::new(&["IBAN :"], &[r"^Page \d+"])
    }

    fn resolve(
        policy: &ContinuationPolicy,
        lines: &[&str],
        amount_needed: bool,
    ) -> Continuation {
        let matcher = matcher();
        let classifier = classifier();
        let resolver = Resolver {
            policy,
            matcher: &matcher,
            classifier: &classifier,
        };
        let mut trace = ParseTrace::new();
        resolver.resolve(lines, 1, lines.len(), "HEADER", amount_needed, &mut trace)
    }

    #[test]
    fn test_next_header_stops_immediately() {
        let lines = ["01.02.23 HEADER 1,00", "02.02.23 NEXT 2,00"];
        let c = resolve(&ContinuationPolicy::default(), &lines, false);
        assert_eq!(c.description, "HEADER");
        assert_eq!(c.next_line, 1);
        assert_eq!(c.stop, StopReason::NextHeader);
    }

    #[test]
    fn test_appends_normalized_lines() {
        let lines = ["h", "  /REF   0042 ", "FACTURE  JANVIER", "02.02.23 NEXT 2,00"];
        let c = resolve(&ContinuationPolicy::default(), &lines, false);
        assert_eq!(c.description, "HEADER /REF 0042 FACTURE JANVIER");
        assert_eq!(c.next_line, 3);
    }

    #[test]
    fn test_backfills_missing_amount_and_consumes_it() {
        let lines = ["h", "/DE ACME", "1 234,56", "tail"];
        let c = resolve(&ContinuationPolicy::default(), &lines, true);
        assert_eq!(c.amount.as_deref(), Some("1 234,56"));
        assert_eq!(c.next_line, 3);
        assert_eq!(c.description, "HEADER /DE ACME");
        assert_eq!(c.stop, StopReason::AmountFound);
    }

    #[test]
    fn test_bare_amount_left_when_amount_known() {
        let lines = ["h", "12,00"];
        let c = resolve(&ContinuationPolicy::default(), &lines, false);
        assert_eq!(c.amount, None);
        assert_eq!(c.next_line, 1);
        assert_eq!(c.stop, StopReason::BareAmount);
    }

    #[test]
    fn test_amount_window_exhausted() {
        let lines = ["h", "a", "b", "c", "12,00"];
        let c = resolve(&ContinuationPolicy::default(), &lines, true);
        assert_eq!(c.amount, None);
        assert_eq!(c.stop, StopReason::AmountWindow);
    }

    #[test]
    fn test_boilerplate_skip_policy_continues() {
        let lines = ["h", "IBAN : FR76", "SUITE", "02.02.23 NEXT 2,00"];
        let c = resolve(&ContinuationPolicy::default(), &lines, false);
        assert_eq!(c.description, "HEADER SUITE");
        assert_eq!(c.next_line, 3);
    }

    #[test]
    fn test_boilerplate_stop_policy_terminates() {
        let policy = ContinuationPolicy {
            boilerplate: BoilerplatePolicy::Stop,
            ..Default::default()
        };
        let lines = ["h", "Page 2", "SUITE"];
        let c = resolve(&policy, &lines, false);
        assert_eq!(c.description, "HEADER");
        assert_eq!(c.stop, StopReason::Boilerplate);

        let lines = ["h", "", "SUITE"];
        assert_eq!(resolve(&policy, &lines, false).stop, StopReason::BlankLine);
    }

    #[test]
    fn test_stop_phrase() {
        let policy = ContinuationPolicy {
            stop_markers: LineClassifier::new(&["Sous total"], &[]),
            ..Default::default()
        };
        let lines = ["h", "MORE", "Sous total... 30,00", "AFTER"];
        let c = resolve(&policy, &lines, false);
        assert_eq!(c.description, "HEADER MORE");
        assert_eq!(c.next_line, 2);
        assert_eq!(c.stop, StopReason::StopPhrase);
    }

    #[test]
    fn test_description_bound_keeps_consuming() {
        let policy = ContinuationPolicy {
            max_description: 10,
            ..Default::default()
        };
        let lines = ["h", "ABCDEFGH", "IGNORED", "02.02.23 NEXT 2,00"];
        let c = resolve(&policy, &lines, false);
        assert_eq!(c.description, "HEADER ABCDEFGH");
        assert_eq!(c.next_line, 3);
    }

    #[test]
    fn test_line_limit_and_fragment_filters() {
        let policy = ContinuationPolicy {
            max_lines: Some(3),
            min_fragment_len: 3,
            skip_numeric_fragments: true,
            fragment_scrubbers: vec![Scrubber::new(r"ICS\s*:\s*\S+\s*RUM\s*:\s*\S+", "")],
            ..Default::default()
        };
        let lines = ["h", "AB", "123456", "ICS : FR00ZZZ RUM : ABC LOYER", "BEYOND"];
        let c = resolve(&policy, &lines, false);
        assert_eq!(c.description, "HEADER LOYER");
        assert_eq!(c.next_line, 4);
        assert_eq!(c.stop, StopReason::LineLimit);
    }

    #[test]
    fn test_boilerplate_shaped_like_a_header_is_not_the_next_record() {
        let lines = ["h", "02.02.23 IBAN : FR76 02.02.23", "SUITE", "03.02.23 NEXT 2,00"];
        let c = resolve(&ContinuationPolicy::default(), &lines, false);
        assert_eq!(c.description, "HEADER SUITE");
        assert_eq!(c.next_line, 3);
        assert_eq!(c.stop, StopReason::NextHeader);
    }
}
