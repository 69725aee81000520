//! Per-line parse decisions, kept alongside the transactions so callers and
//! tests can see why a line was taken, skipped or rejected.
//!
//! Every recorded step is also emitted as a `tracing` event.

use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStepType {
    SectionFound,
    SectionMissing,
    Boilerplate,
    Unmatched,
    HeaderMatched,
    Continuation,
    ContinuationStopped,
    AmountBackfilled,
    MissingAmount,
    MalformedDate,
    Emitted,
    Discarded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_type: TraceStepType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseTrace {
    pub trace_schema_version: String,
    pub steps: Vec<TraceStep>,
    #[serde(skip)]
    section: Option<String>,
}

impl Default for ParseTrace {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            steps: Vec::new(),
            section: None,
        }
    }
}

impl ParseTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag subsequent steps with a section name (`None` for unsectioned layouts).
    pub fn enter_section(&mut self, section: Option<&str>) {
        self.section = section.map(str::to_string);
    }

    pub fn record(
        &mut self,
        step_type: TraceStepType,
        line_index: Option<usize>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        let section = self.section.as_deref().unwrap_or("-");
        match step_type {
            TraceStepType::SectionFound | TraceStepType::SectionMissing => {
                tracing::info!(?step_type, section, line = ?line_index, "{message}")
            }
            TraceStepType::Boilerplate | TraceStepType::Continuation => {
                tracing::trace!(?step_type, section, line = ?line_index, "{message}")
            }
            _ => tracing::debug!(?step_type, section, line = ?line_index, "{message}"),
        }
        self.steps.push(TraceStep {
            step_type,
            line_index,
            section: self.section.clone(),
            message,
        });
    }

    pub fn steps_of(&self, step_type: TraceStepType) -> impl Iterator<Item = &TraceStep> {
        self.steps.iter().filter(move |s| s.step_type == step_type)
    }

    pub fn count(&self, step_type: TraceStepType) -> usize {
        self.steps_of(step_type).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_carry_current_section() {
        let mut trace = ParseTrace::new();
        trace.enter_section(Some("VIREMENTS RECUS"));
        trace.record(TraceStepType::SectionFound, Some(3), "found");
        trace.enter_section(None);
        trace.record(TraceStepType::Unmatched, Some(9), "noise");

        assert_eq!(trace.steps[0].section.as_deref(), Some("VIREMENTS RECUS"));
        assert_eq!(trace.steps[1].section, None);
        assert_eq!(trace.count(TraceStepType::Unmatched), 1);
    }

    #[test]
    fn test_serializes_with_schema_version() {
        let mut trace = ParseTrace::new();
        trace.record(TraceStepType::MissingAmount, Some(1), "no amount");
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["trace_schema_version"], TRACE_SCHEMA_VERSION);
        assert_eq!(json["steps"][0]["step_type"], "missing_amount");
        assert!(json["steps"][0].get("section").is_none());
    }
}
