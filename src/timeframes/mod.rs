pub mod all_days;
pub mod labels;
pub mod specific_dates;
pub mod weekday;
pub mod weekend;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::models::{Timeframe, TimeframeType};

/// Segments an event's date range into votable timeframes according to the
/// event's policy. Pure and deterministic: same inputs, same buckets (ids
/// aside). Instants are treated as calendar dates at midnight; only
/// `SpecificDates` preserves sub-day precision from the input.
///
/// Incomplete trailing buckets (a Saturday whose Sunday falls past the end,
/// a Monday whose Friday does) are dropped, so the result may be empty.
pub fn generate_timeframes(
    event_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    kind: TimeframeType,
) -> Vec<Timeframe> {
    match kind {
        TimeframeType::Weekend => weekend::generate(event_id, start, end),
        TimeframeType::Weekday => weekday::generate(event_id, start, end),
        TimeframeType::AllDays => all_days::generate(event_id, start, end),
        TimeframeType::SpecificDates => specific_dates::generate(event_id, start, end),
    }
}

pub(crate) fn new_timeframe(
    event_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    label: String,
) -> Timeframe {
    Timeframe {
        timeframe_id: Uuid::new_v4().to_string(),
        event_id: event_id.to_string(),
        start_date: start,
        end_date: end,
        label,
        response_count: 0,
    }
}

pub(crate) fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 on the given day.
pub(crate) fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    midnight(date + Duration::days(1)) - Duration::milliseconds(1)
}
