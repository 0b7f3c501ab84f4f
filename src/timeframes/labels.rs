//! Human-readable timeframe labels, e.g. "Jan 13-14, 2024".

use chrono::{Datelike, NaiveDate};

fn month(date: NaiveDate) -> String {
    // %b gives the fixed English abbreviation (Jan, Feb, ...).
    date.format("%b").to_string()
}

/// "Jan 13-14, 2024" — month and year taken from the Saturday.
pub fn weekend(saturday: NaiveDate, sunday: NaiveDate) -> String {
    format!(
        "{} {}-{}, {}",
        month(saturday),
        saturday.day(),
        sunday.day(),
        saturday.year()
    )
}

/// "Jan 15-19, 2024" — month and year taken from the Monday.
pub fn weekday(monday: NaiveDate, friday: NaiveDate) -> String {
    format!(
        "{} {}-{}, {}",
        month(monday),
        monday.day(),
        friday.day(),
        monday.year()
    )
}

/// "Jan 15, 2024"
pub fn day(date: NaiveDate) -> String {
    format!("{} {}, {}", month(date), date.day(), date.year())
}

/// Range label that widens as the endpoints drift apart:
/// "Jan 15-20, 2024", "Jan 15 - Feb 20, 2024",
/// "Dec 30, 2024 - Jan 2, 2025".
pub fn date_range(start: NaiveDate, end: NaiveDate) -> String {
    if start.year() != end.year() {
        return format!(
            "{} {}, {} - {} {}, {}",
            month(start),
            start.day(),
            start.year(),
            month(end),
            end.day(),
            end.year()
        );
    }

    if start.month() != end.month() {
        return format!(
            "{} {} - {} {}, {}",
            month(start),
            start.day(),
            month(end),
            end.day(),
            start.year()
        );
    }

    format!("{} {}-{}, {}", month(start), start.day(), end.day(), start.year())
}
