pub mod amount;
pub mod classifier;
pub mod continuation;
pub mod dates;
pub mod direction;
pub mod matcher;
pub mod scanner;
pub mod section;

use crate::trace::ParseTrace;
use classifier::LineClassifier;
use continuation::{ContinuationPolicy, Scrubber};
use dates::DateFormat;
use direction::{DirectionRule, SectionKind};
use matcher::HeaderMatcher;
use scanner::{DraftTransaction, Scanner};
use section::SectionLocator;
use std::ops::Range;

/// A named statement section whose category fixes the side of its amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    pub name: &'static str,
    pub kind: SectionKind,
}

/// Where transactions live in the statement text.
#[derive(Debug, Clone)]
pub enum Regions {
    /// The whole document.
    Whole,
    /// Everything after the first line containing `marker`. Without the
    /// marker, the whole document when `fallback_whole`, nothing otherwise.
    AfterMarker {
        marker: &'static str,
        fallback_whole: bool,
    },
    /// Named blocks, each scanned independently.
    Sections {
        locator: SectionLocator,
        sections: Vec<SectionSpec>,
    },
}

/// One line range to scan.
#[derive(Debug, Clone)]
pub struct Region {
    pub label: &'static str,
    pub range: Range<usize>,
    pub section: Option<SectionSpec>,
}

/// Declarative description of one bank's statement layout. A single engine
/// drives every layout.
#[derive(Debug, Clone)]
pub struct Layout {
    pub regions: Regions,
    /// Format of the operation date in the header's `date` group.
    pub date_format: DateFormat,
    pub matcher: HeaderMatcher,
    pub classifier: LineClassifier,
    pub continuation: ContinuationPolicy,
    pub direction: DirectionRule,
    /// Applied to the complete description before whitespace normalization.
    pub description_scrubbers: Vec<Scrubber>,
}

impl Layout {
    pub fn regions(&self, lines: &[&str]) -> Vec<Region> {
        match &self.regions {
            Regions::Whole => vec![Region {
                label: "document",
                range: 0..lines.len(),
                section: None,
            }],
            Regions::AfterMarker {
                marker,
                fallback_whole,
            } => {
                let range = match lines.iter().position(|l| l.contains(marker)) {
                    Some(heading) => heading + 1..lines.len(),
                    None if *fallback_whole => 0..lines.len(),
                    None => 0..0,
                };
                vec![Region {
                    label: marker,
                    range,
                    section: None,
                }]
            }
            Regions::Sections { locator, sections } => sections
                .iter()
                .map(|spec| Region {
                    label: spec.name,
                    range: locator.locate(lines, spec.name),
                    section: Some(*spec),
                })
                .collect(),
        }
    }

    /// Run the engine over `lines`, returning drafts in document order.
    pub fn scan(&self, lines: &[&str], trace: &mut ParseTrace) -> Vec<DraftTransaction> {
        let mut drafts = Scanner::new(self, lines).run(trace);
        drafts.sort_by_key(|d| d.line);
        drafts
    }
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
