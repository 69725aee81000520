use chrono::{Datelike, NaiveDate};

/// Two-digit years up to this value are read as 20xx, above it as 19xx.
pub const CENTURY_PIVOT: i32 = 50;

/// Date shapes printed on French statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `dd.mm.yy`
    ShortDotted,
    /// `dd/mm/yyyy`
    FullSlashed,
    /// `dd.mm`, no year
    DayMonth,
}

/// A date as printed, before any year inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintedDate {
    Full(NaiveDate),
    DayMonth { day: u32, month: u32 },
}

impl DateFormat {
    /// Unanchored regex fragment, for embedding in header patterns.
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::ShortDotted => r"\d{2}\.\d{2}\.\d{2}",
            DateFormat::FullSlashed => r"\d{2}/\d{2}/\d{4}",
            DateFormat::DayMonth => r"\d{2}\.\d{2}",
        }
    }

    /// Read a date in this format. Returns `None` for the wrong shape or an
    /// impossible calendar day.
    pub fn parse(self, raw: &str) -> Option<PrintedDate> {
        let raw = raw.trim();
        match self {
            DateFormat::ShortDotted => {
                let (day, month, year) = split3(raw, '.')?;
                if year.len() != 2 {
                    return None;
                }
                let year = expand_year(year.parse().ok()?);
                NaiveDate::from_ymd_opt(year, month, day).map(PrintedDate::Full)
            }
            DateFormat::FullSlashed => {
                let (day, month, year) = split3(raw, '/')?;
                if year.len() != 4 {
                    return None;
                }
                NaiveDate::from_ymd_opt(year.parse().ok()?, month, day).map(PrintedDate::Full)
            }
            DateFormat::DayMonth => {
                let (day, month) = raw.split_once('.')?;
                let day: u32 = day.parse().ok()?;
                let month: u32 = month.parse().ok()?;
                if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
                    return None;
                }
                Some(PrintedDate::DayMonth { day, month })
            }
        }
    }

    /// True when `raw` has this format's shape (digits and separators only).
    pub fn is_shaped(self, raw: &str) -> bool {
        let raw = raw.trim();
        let expected = match self {
            DateFormat::ShortDotted => "dd.dd.dd",
            DateFormat::FullSlashed => "dd/dd/dddd",
            DateFormat::DayMonth => "dd.dd",
        };
        raw.len() == expected.len()
            && raw.chars().zip(expected.chars()).all(|(c, e)| match e {
                'd' => c.is_ascii_digit(),
                sep => c == sep,
            })
    }
}

fn split3(raw: &str, sep: char) -> Option<(u32, u32, &str)> {
    let mut parts = raw.split(sep);
    let day = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let year = parts.next()?;
    if parts.next().is_some() || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((day, month, year))
}

/// Expand a two-digit year: `<= 50` lands in the 2000s, otherwise the 1900s.
pub fn expand_year(two_digit: i32) -> i32 {
    if two_digit <= CENTURY_PIVOT {
        2000 + two_digit
    } else {
        1900 + two_digit
    }
}

/// Resolve a year-less `dd.mm` against a nearby reference date (the value
/// date). The reference's year is used unless that puts the day more than
/// half a year away, which happens across a year boundary.
pub fn resolve_day_month(day: u32, month: u32, reference: NaiveDate) -> Option<NaiveDate> {
    let year = reference.year();
    let candidate = NaiveDate::from_ymd_opt(year, month, day)?;
    let gap = (candidate - reference).num_days();
    if gap > 183 {
        NaiveDate::from_ymd_opt(year - 1, month, day)
    } else if gap < -183 {
        NaiveDate::from_ymd_opt(year + 1, month, day)
    } else {
        Some(candidate)
    }
}

pub fn format_canonical(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Serde adapter emitting dates as `dd/mm/yyyy`.
pub mod canonical {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_canonical(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, "%d/%m/%Y").map_err(serde::de::Error::custom)
    }
}
