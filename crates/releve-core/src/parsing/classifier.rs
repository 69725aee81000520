use regex::Regex;

/// Decides whether a text line is noise: column titles, legal notices,
/// account identifiers, page markers.
///
/// A line is noise when it contains one of the literal phrases or matches one
/// of the patterns. Patterns are usually anchored at the start of the line so
/// that they cannot fire on a transaction header.
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    phrases: Vec<&'static str>,
    patterns: Vec<Regex>,
}

impl LineClassifier {
    pub fn new(phrases: &[&'static str], patterns: &[&str]) -> Self {
        Self {
            phrases: phrases.to_vec(),
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("line classifier pattern is a valid regex"))
                .collect(),
        }
    }

    pub fn is_skip(&self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return false;
        }
        self.phrases.iter().any(|p| line.contains(p))
            || self.patterns.iter().any(|re| re.is_match(line))
    }

    /// The first phrase or pattern that fires, for diagnostics.
    pub fn reason(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if let Some(p) = self.phrases.iter().find(|p| line.contains(**p)) {
            return Some(format!("contains '{p}'"));
        }
        self.patterns
            .iter()
            .find(|re| re.is_match(line))
            .map(|re| format!("matches /{}/", re.as_str()))
    }
}
