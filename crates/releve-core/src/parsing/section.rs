use std::ops::Range;

/// Finds the line range of a named transaction block.
///
/// A block starts on the line after its heading and ends at the first line
/// carrying a subtotal marker or the heading of any other known section.
#[derive(Debug, Clone)]
pub struct SectionLocator {
    subtotal_markers: Vec<&'static str>,
    known_sections: Vec<&'static str>,
}

impl SectionLocator {
    /// `known_sections` should include catch-all terminators such as a
    /// "total of all operations" heading.
    pub fn new(subtotal_markers: &[&'static str], known_sections: &[&'static str]) -> Self {
        Self {
            subtotal_markers: subtotal_markers.to_vec(),
            known_sections: known_sections.to_vec(),
        }
    }

    /// Locate `name` in `lines`. A missing section yields an empty range.
    pub fn locate(&self, lines: &[&str], name: &str) -> Range<usize> {
        let Some(heading) = lines.iter().position(|l| l.contains(name)) else {
            return 0..0;
        };
        let start = heading + 1;
        let end = lines[start..]
            .iter()
            .position(|l| self.is_terminator(l.trim(), name))
            .map(|offset| start + offset)
            .unwrap_or(lines.len());
        start..end
    }

    fn is_terminator(&self, line: &str, current: &str) -> bool {
        self.subtotal_markers.iter().any(|m| line.contains(m))
            || self
                .known_sections
                .iter()
                .any(|s| *s != current && line.contains(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> SectionLocator {
        SectionLocator::new(
            &["Sous total"],
            &["VIREMENTS RECUS", "VIREMENTS EMIS", "TOTAL DES OPERATIONS"],
        )
    }

    const LINES: &[&str] = &[
        "RELEVE DE VOTRE COMPTE",
        "VIREMENTS RECUS",
        "01.02.23 VIR SEPA RECU A 01.02.23 10,00",
        "02.02.23 VIR SEPA RECU B 02.02.23 20,00",
        "Sous total... 30,00",
        "VIREMENTS EMIS",
        "03.02.23 VIREMENT SEPA EMIS C 03.02.23 5,00",
        "TOTAL DES OPERATIONS 35,00",
    ];

    #[test]
    fn test_ends_at_subtotal() {
        assert_eq!(locator().locate(LINES, "VIREMENTS RECUS"), 2..4);
    }

    #[test]
    fn test_ends_at_catch_all_total() {
        assert_eq!(locator().locate(LINES, "VIREMENTS EMIS"), 6..7);
    }

    #[test]
    fn test_ends_at_other_section_heading() {
        let lines = ["VIREMENTS RECUS", "a", "b", "VIREMENTS EMIS", "c"];
        assert_eq!(locator().locate(&lines, "VIREMENTS RECUS"), 1..3);
    }

    #[test]
    fn test_runs_to_end_without_terminator() {
        let lines = ["VIREMENTS EMIS", "a", "b"];
        assert_eq!(locator().locate(&lines, "VIREMENTS EMIS"), 1..3);
    }

    #[test]
    fn test_missing_section_is_empty() {
        assert!(locator().locate(LINES, "PAIEMENTS PAR CARTES").is_empty());
    }

    #[test]
    fn test_locate_is_idempotent() {
        let l = locator();
        assert_eq!(
            l.locate(LINES, "VIREMENTS RECUS"),
            l.locate(LINES, "VIREMENTS RECUS")
        );
    }
}
