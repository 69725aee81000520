use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Locale amount grammars found on French statements.
///
/// All share the decimal comma with exactly two fraction digits; they differ
/// in how thousands are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFormat {
    /// `1 234,56`
    SpaceGrouped,
    /// `1.234,56`
    DotGrouped,
    /// Any run of digits and spaces, e.g. `12 345,67` or `1234,56`.
    Loose,
}

const SPACE_GROUPED: &str = r"\d{1,3}(?:[ \x{a0}\x{202f}]\d{3})*,\d{2}";
const DOT_GROUPED: &str = r"\d{1,3}(?:\.\d{3})*,\d{2}";
const LOOSE: &str = r"\d[\d \x{a0}\x{202f}]*,\d{2}";

static BARE_SPACE_GROUPED: LazyLock<Regex> = LazyLock::new(|| anchored(SPACE_GROUPED));
static BARE_DOT_GROUPED: LazyLock<Regex> = LazyLock::new(|| anchored(DOT_GROUPED));
static BARE_LOOSE: LazyLock<Regex> = LazyLock::new(|| anchored(LOOSE));

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("amount grammar is a valid regex")
}

impl AmountFormat {
    /// Unanchored regex fragment, for embedding in header patterns.
    pub fn pattern(self) -> &'static str {
        match self {
            AmountFormat::SpaceGrouped => SPACE_GROUPED,
            AmountFormat::DotGrouped => DOT_GROUPED,
            AmountFormat::Loose => LOOSE,
        }
    }

    /// True when the whole (trimmed) text is a single amount token.
    pub fn is_bare(self, text: &str) -> bool {
        let text = text.trim();
        match self {
            AmountFormat::SpaceGrouped => BARE_SPACE_GROUPED.is_match(text),
            AmountFormat::DotGrouped => BARE_DOT_GROUPED.is_match(text),
            AmountFormat::Loose => BARE_LOOSE.is_match(text),
        }
    }
}

/// Convert a locale amount to canonical form: no grouping, `.` decimal point.
///
/// - `"1 234,56"` -> `"1234.56"`
/// - `"12.345,00"` -> `"12345.00"`
pub fn normalize_amount(raw: &str) -> Option<String> {
    let canonical: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if canonical.is_empty() {
        None
    } else {
        Some(canonical)
    }
}

/// Parse a locale amount into a decimal, preserving its two-digit scale.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let canonical = normalize_amount(raw)?;
    Decimal::from_str(&canonical).ok()
}
