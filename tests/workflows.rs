//! End-to-end workflow tests against an in-memory store.

use chrono::{DateTime, Duration, TimeZone, Utc};

use whenabouts::db::Database;
use whenabouts::error::Error;
use whenabouts::models::{Availability, EventStatus, TimeframeType};
use whenabouts::service::{
    self, CreateEventRequest, SubmitResponsesRequest, TimeframeVote,
};
use whenabouts::sharecode;

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn event_request(start: DateTime<Utc>, end: DateTime<Utc>, kind: TimeframeType) -> CreateEventRequest {
    CreateEventRequest {
        title: "Team offsite".to_string(),
        description: Some("Pick a weekend".to_string()),
        start_date: start,
        end_date: end,
        timeframe_type: kind,
        creator_name: "Jordan".to_string(),
        creator_email: Some("jordan@example.com".to_string()),
    }
}

fn votes_for(frames: &[whenabouts::models::Timeframe], availability: Availability) -> Vec<TimeframeVote> {
    frames
        .iter()
        .map(|f| TimeframeVote {
            timeframe_id: f.timeframe_id.clone(),
            availability,
        })
        .collect()
}

#[tokio::test]
async fn create_event_persists_timeframes_in_order() {
    let db = Database::in_memory().await.unwrap();

    let (event, frames) = service::create_event(
        &db,
        event_request(date(2024, 1, 1), date(2024, 1, 31), TimeframeType::Weekend),
    )
    .await
    .unwrap();

    assert!(sharecode::is_valid_share_code(&event.share_code));
    assert_eq!(frames.len(), 4);

    let (fetched, stored) = service::get_event_by_share_code(&db, &event.share_code)
        .await
        .unwrap();
    assert_eq!(fetched.event_id, event.event_id);
    assert_eq!(stored.len(), 4);
    for (a, b) in stored.iter().zip(frames.iter()) {
        assert_eq!(a.timeframe_id, b.timeframe_id);
        assert_eq!(a.label, b.label);
    }
    for pair in stored.windows(2) {
        assert!(pair[0].start_date < pair[1].start_date);
    }
}

#[tokio::test]
async fn share_code_lookup_is_case_insensitive() {
    let db = Database::in_memory().await.unwrap();
    let (event, _) = service::create_event(
        &db,
        event_request(date(2024, 5, 1), date(2024, 5, 10), TimeframeType::AllDays),
    )
    .await
    .unwrap();

    let lowered = event.share_code.to_lowercase();
    let (found, _) = service::get_event_by_share_code(&db, &lowered).await.unwrap();
    assert_eq!(found.event_id, event.event_id);
}

#[tokio::test]
async fn bad_share_codes_are_rejected_before_lookup() {
    let db = Database::in_memory().await.unwrap();

    let err = service::get_event_by_share_code(&db, "nope").await.unwrap_err();
    assert!(matches!(err, Error::InvalidShareCode(_)));

    // Well-formed but unknown
    let err = service::get_event_by_share_code(&db, "ZZZZZ9").await.unwrap_err();
    assert!(matches!(err, Error::EventNotFound(_)));
}

#[tokio::test]
async fn inverted_date_range_is_rejected() {
    let db = Database::in_memory().await.unwrap();
    let err = service::create_event(
        &db,
        event_request(date(2024, 6, 10), date(2024, 6, 1), TimeframeType::AllDays),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::InvalidDateRange));
}

#[tokio::test]
async fn votes_aggregate_into_a_ranked_summary() {
    let db = Database::in_memory().await.unwrap();
    let (event, frames) = service::create_event(
        &db,
        event_request(date(2024, 3, 4), date(2024, 3, 6), TimeframeType::AllDays),
    )
    .await
    .unwrap();
    assert_eq!(frames.len(), 3);

    // Alice prefers the first day, tolerates the second, skips the third.
    service::submit_responses(
        &db,
        &event.event_id,
        SubmitResponsesRequest {
            respondent_name: "Alice".to_string(),
            respondent_email: None,
            responses: vec![
                TimeframeVote {
                    timeframe_id: frames[0].timeframe_id.clone(),
                    availability: Availability::Preferred,
                },
                TimeframeVote {
                    timeframe_id: frames[1].timeframe_id.clone(),
                    availability: Availability::CouldMake,
                },
            ],
        },
    )
    .await
    .unwrap();

    // Bob can't make the second day at all.
    service::submit_responses(
        &db,
        &event.event_id,
        SubmitResponsesRequest {
            respondent_name: "Bob".to_string(),
            respondent_email: None,
            responses: vec![
                TimeframeVote {
                    timeframe_id: frames[0].timeframe_id.clone(),
                    availability: Availability::Preferred,
                },
                TimeframeVote {
                    timeframe_id: frames[1].timeframe_id.clone(),
                    availability: Availability::NotAvailable,
                },
            ],
        },
    )
    .await
    .unwrap();

    let summary = service::get_event_summary(&db, &event.event_id).await.unwrap();
    assert_eq!(summary.total_respondents, 2);
    assert_eq!(summary.timeframe_summaries.len(), 3);

    let top = &summary.timeframe_summaries[0];
    assert_eq!(top.timeframe_id, frames[0].timeframe_id);
    assert_eq!(top.preferred_count, 2);
    assert_eq!(top.score, 6);
    assert_eq!(top.respondents.len(), 2);

    // Day two nets to zero (+1 could_make, -1 not_available) and day three
    // got no votes at all; the tie goes to the earlier day.
    let second = &summary.timeframe_summaries[1];
    let third = &summary.timeframe_summaries[2];
    assert_eq!(second.score, 0);
    assert_eq!(third.score, 0);
    assert_eq!(second.timeframe_id, frames[1].timeframe_id);
    assert_eq!(third.timeframe_id, frames[2].timeframe_id);
    assert!(third.respondents.is_empty());
}

#[tokio::test]
async fn resubmitting_a_vote_overwrites_in_place() {
    let db = Database::in_memory().await.unwrap();
    let (event, frames) = service::create_event(
        &db,
        event_request(date(2024, 3, 4), date(2024, 3, 5), TimeframeType::AllDays),
    )
    .await
    .unwrap();

    let respondent_id = service::submit_responses(
        &db,
        &event.event_id,
        SubmitResponsesRequest {
            respondent_name: "Alice".to_string(),
            respondent_email: None,
            responses: votes_for(&frames[..1], Availability::Preferred),
        },
    )
    .await
    .unwrap();

    service::update_responses(
        &db,
        &event.event_id,
        &respondent_id,
        SubmitResponsesRequest {
            respondent_name: "Alice".to_string(),
            respondent_email: None,
            responses: votes_for(&frames[..1], Availability::NotAvailable),
        },
    )
    .await
    .unwrap();

    // Exactly one live response for the pair, carrying the latest value.
    let responses = db.get_responses(&event.event_id).await.unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].availability, Availability::NotAvailable);

    // Still a single respondent.
    let summary = service::get_event_summary(&db, &event.event_id).await.unwrap();
    assert_eq!(summary.total_respondents, 1);
}

#[tokio::test]
async fn updating_an_unknown_respondent_fails() {
    let db = Database::in_memory().await.unwrap();
    let (event, frames) = service::create_event(
        &db,
        event_request(date(2024, 3, 4), date(2024, 3, 5), TimeframeType::AllDays),
    )
    .await
    .unwrap();

    let err = service::update_responses(
        &db,
        &event.event_id,
        "missing",
        SubmitResponsesRequest {
            respondent_name: "Ghost".to_string(),
            respondent_email: None,
            responses: votes_for(&frames, Availability::CouldMake),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::RespondentNotFound(_)));
}

#[tokio::test]
async fn closed_events_reject_new_votes() {
    let db = Database::in_memory().await.unwrap();
    let (event, frames) = service::create_event(
        &db,
        event_request(date(2024, 3, 4), date(2024, 3, 5), TimeframeType::AllDays),
    )
    .await
    .unwrap();

    service::close_event(&db, &event.event_id).await.unwrap();

    let err = service::submit_responses(
        &db,
        &event.event_id,
        SubmitResponsesRequest {
            respondent_name: "Late".to_string(),
            respondent_email: None,
            responses: votes_for(&frames, Availability::Preferred),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::EventClosed(_)));

    // Summaries still readable after closing.
    let summary = service::get_event_summary(&db, &event.event_id).await.unwrap();
    assert_eq!(summary.event.status, EventStatus::Closed);
}

#[tokio::test]
async fn past_events_expire_and_stop_accepting_votes() {
    let db = Database::in_memory().await.unwrap();
    let (event, frames) = service::create_event(
        &db,
        event_request(date(2020, 1, 6), date(2020, 1, 10), TimeframeType::Weekday),
    )
    .await
    .unwrap();

    let expired = service::expire_past_events(&db, Utc::now()).await.unwrap();
    assert_eq!(expired, 1);

    let (fetched, _) = service::get_event(&db, &event.event_id).await.unwrap();
    assert_eq!(fetched.status, EventStatus::Expired);

    let err = service::submit_responses(
        &db,
        &event.event_id,
        SubmitResponsesRequest {
            respondent_name: "Late".to_string(),
            respondent_email: None,
            responses: votes_for(&frames, Availability::Preferred),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::EventClosed(_)));
}

#[tokio::test]
async fn summary_recomputes_on_every_read() {
    let db = Database::in_memory().await.unwrap();
    let (event, frames) = service::create_event(
        &db,
        event_request(date(2024, 3, 4), date(2024, 3, 5), TimeframeType::AllDays),
    )
    .await
    .unwrap();

    let before = service::get_event_summary(&db, &event.event_id).await.unwrap();
    assert_eq!(before.total_respondents, 0);
    assert!(before.timeframe_summaries.iter().all(|s| s.score == 0));

    service::submit_responses(
        &db,
        &event.event_id,
        SubmitResponsesRequest {
            respondent_name: "Alice".to_string(),
            respondent_email: None,
            responses: votes_for(&frames[..1], Availability::Preferred),
        },
    )
    .await
    .unwrap();

    // No caching: the vote written a moment ago is already visible.
    let after = service::get_event_summary(&db, &event.event_id).await.unwrap();
    assert_eq!(after.total_respondents, 1);
    assert_eq!(after.timeframe_summaries[0].score, 3);
}

#[tokio::test]
async fn single_day_event_has_one_all_days_bucket() {
    let db = Database::in_memory().await.unwrap();
    let (_, frames) = service::create_event(
        &db,
        event_request(
            date(2024, 3, 4),
            date(2024, 3, 4) + Duration::hours(12),
            TimeframeType::AllDays,
        ),
    )
    .await
    .unwrap();
    assert_eq!(frames.len(), 1);
}
