use chrono::{DateTime, Utc};

use super::{labels, new_timeframe};
use crate::models::Timeframe;

/// A single bucket spanning the whole range, input instants preserved
/// verbatim. The only policy that keeps sub-day precision.
pub fn generate(event_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Timeframe> {
    vec![new_timeframe(
        event_id,
        start,
        end,
        labels::date_range(start.date_naive(), end.date_naive()),
    )]
}
