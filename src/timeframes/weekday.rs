use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

use super::{labels, midnight, new_timeframe};
use crate::models::Timeframe;

/// One bucket per full Monday-Friday work week inside the range.
pub fn generate(event_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Timeframe> {
    let end_day = end.date_naive();
    let mut timeframes = Vec::new();

    // Move to the first Monday
    let mut current = start.date_naive();
    while current.weekday() != Weekday::Mon && current <= end_day {
        current += Duration::days(1);
    }

    while current <= end_day {
        let monday = current;
        let friday = current + Duration::days(4);

        // Partial weeks are dropped, same as weekends.
        if friday <= end_day {
            timeframes.push(new_timeframe(
                event_id,
                midnight(monday),
                midnight(friday),
                labels::weekday(monday, friday),
            ));
        }

        // Move to next Monday
        current += Duration::days(7);
    }

    timeframes
}
