use chrono::{DateTime, Duration, Utc};

use super::{end_of_day, labels, midnight, new_timeframe};
use crate::models::Timeframe;

/// One bucket per calendar day in the inclusive range, each running from
/// midnight to 23:59:59.999.
pub fn generate(event_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Timeframe> {
    let end_day = end.date_naive();
    let mut timeframes = Vec::new();

    let mut current = start.date_naive();
    while current <= end_day {
        timeframes.push(new_timeframe(
            event_id,
            midnight(current),
            end_of_day(current),
            labels::day(current),
        ));
        current += Duration::days(1);
    }

    timeframes
}
