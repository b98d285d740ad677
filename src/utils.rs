use chrono::{Datelike, NaiveDate, Weekday};

/// Date formats accepted for coerced date columns, tried in order.
/// ISO first, then the month-first and day-first forms common in
/// exported spreadsheets.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d %b %Y",
];

/// Leniently parses a date cell. Returns `None` for blank or
/// unrecognizable input; callers treat that as a row-level soft failure.
pub fn parse_date_lenient(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Datetime-shaped cells keep their date component.
    let date_part = trimmed.split(&[' ', 'T'][..]).next().unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Parses a monetary cell, tolerating currency symbols and thousands
/// separators. Returns `None` when nothing numeric remains.
pub fn parse_amount_lenient(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok()
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Monday of the ISO calendar week containing `date`.
pub fn iso_week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}
