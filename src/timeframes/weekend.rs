use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

use super::{labels, midnight, new_timeframe};
use crate::models::Timeframe;

/// One bucket per Saturday-Sunday pair that fits entirely inside the range.
pub fn generate(event_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Timeframe> {
    let end_day = end.date_naive();
    let mut timeframes = Vec::new();

    // Move to the first Saturday
    let mut current = start.date_naive();
    while current.weekday() != Weekday::Sat && current <= end_day {
        current += Duration::days(1);
    }

    while current <= end_day {
        let saturday = current;
        let sunday = current + Duration::days(1);

        // A Saturday whose Sunday spills past the end is not a usable weekend.
        if sunday <= end_day {
            timeframes.push(new_timeframe(
                event_id,
                midnight(saturday),
                midnight(sunday),
                labels::weekend(saturday, sunday),
            ));
        }

        // Move to next Saturday
        current += Duration::days(7);
    }

    timeframes
}
