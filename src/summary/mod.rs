use crate::models::{
    Availability, Respondent, Response, RespondentAvailability, Timeframe, TimeframeSummary,
};

/// Score weights: preference is rewarded 3x, tolerance 1x, explicit
/// unavailability costs 1. A slot nobody can make sorts below one nobody
/// voted on.
const PREFERRED_WEIGHT: i64 = 3;
const COULD_MAKE_WEIGHT: i64 = 1;
const NOT_AVAILABLE_WEIGHT: i64 = -1;

/// Tallies every supplied timeframe against the raw responses and returns
/// the summaries ranked best-first. Pure: recomputed from scratch on every
/// read, so a vote written a moment ago shows up on the next call.
///
/// Responses pointing at a timeframe that is not in `timeframes` are
/// skipped, not an error. Respondents who never voted on a timeframe do not
/// count against it.
pub fn calculate_summaries(
    timeframes: &[Timeframe],
    responses: &[Response],
) -> Vec<TimeframeSummary> {
    let mut summaries: Vec<TimeframeSummary> = timeframes
        .iter()
        .map(|timeframe| summarize_timeframe(timeframe, responses))
        .collect();

    // Best score first; equal scores rank the earlier timeframe first so
    // the ordering is deterministic.
    summaries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.start_date.cmp(&b.start_date))
    });

    summaries
}

fn summarize_timeframe(timeframe: &Timeframe, responses: &[Response]) -> TimeframeSummary {
    let mut preferred_count = 0;
    let mut could_make_count = 0;
    let mut not_available_count = 0;
    let mut respondents = Vec::new();

    for response in responses {
        if response.timeframe_id != timeframe.timeframe_id {
            continue;
        }

        match response.availability {
            Availability::Preferred => preferred_count += 1,
            Availability::CouldMake => could_make_count += 1,
            Availability::NotAvailable => not_available_count += 1,
        }

        // Detail list keeps response order; callers sort if they care.
        respondents.push(RespondentAvailability {
            respondent_id: response.respondent_id.clone(),
            respondent_name: response.respondent_name.clone(),
            availability: response.availability,
        });
    }

    let score = preferred_count * PREFERRED_WEIGHT
        + could_make_count * COULD_MAKE_WEIGHT
        + not_available_count * NOT_AVAILABLE_WEIGHT;

    TimeframeSummary {
        timeframe_id: timeframe.timeframe_id.clone(),
        label: timeframe.label.clone(),
        start_date: timeframe.start_date,
        end_date: timeframe.end_date,
        preferred_count,
        could_make_count,
        not_available_count,
        score,
        respondents,
    }
}

/// Distinct respondent count for an event. One person may vote differently
/// (or not at all) per timeframe, so this is not the sum of per-timeframe
/// tallies.
pub fn total_respondents(respondents: &[Respondent]) -> i64 {
    respondents.len() as i64
}
