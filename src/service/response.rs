use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Availability, Event, EventStatus, EventSummary, Respondent, Response};
use crate::summary;

/// One vote within a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeframeVote {
    pub timeframe_id: String,
    pub availability: Availability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponsesRequest {
    pub respondent_name: String,
    pub respondent_email: Option<String>,
    pub responses: Vec<TimeframeVote>,
}

/// Records a first-time respondent and their votes. Returns the new
/// respondent id, which the caller hands back for later updates.
pub async fn submit_responses(
    db: &Database,
    event_id: &str,
    request: SubmitResponsesRequest,
) -> Result<String> {
    let event = require_active_event(db, event_id).await?;

    let respondent = Respondent::new(
        event.event_id.clone(),
        request.respondent_name.clone(),
        request.respondent_email.clone(),
    );
    db.insert_respondent(&respondent).await?;

    let now = Utc::now();
    for vote in &request.responses {
        db.save_response(&Response {
            event_id: event.event_id.clone(),
            respondent_id: respondent.respondent_id.clone(),
            respondent_name: respondent.name.clone(),
            timeframe_id: vote.timeframe_id.clone(),
            availability: vote.availability,
            responded_at: now,
        })
        .await?;
    }

    info!(
        "respondent {} submitted {} votes on event {}",
        respondent.respondent_id,
        request.responses.len(),
        event.event_id
    );

    Ok(respondent.respondent_id)
}

/// Re-votes for an existing respondent. Each (respondent, timeframe) pair is
/// overwritten in place; votes on timeframes not in the request are left
/// untouched.
pub async fn update_responses(
    db: &Database,
    event_id: &str,
    respondent_id: &str,
    request: SubmitResponsesRequest,
) -> Result<()> {
    let event = require_active_event(db, event_id).await?;

    // Respondent records are immutable after first contact; only their
    // responses change.
    let respondent = db
        .get_respondent(event_id, respondent_id)
        .await?
        .ok_or_else(|| Error::RespondentNotFound(respondent_id.to_string()))?;

    let now = Utc::now();
    for vote in &request.responses {
        db.save_response(&Response {
            event_id: event.event_id.clone(),
            respondent_id: respondent.respondent_id.clone(),
            respondent_name: respondent.name.clone(),
            timeframe_id: vote.timeframe_id.clone(),
            availability: vote.availability,
            responded_at: now,
        })
        .await?;
    }

    info!(
        "respondent {} updated {} votes on event {}",
        respondent.respondent_id,
        request.responses.len(),
        event.event_id
    );

    Ok(())
}

/// Assembles the ranked summary for an event. Always recomputed from the raw
/// responses, so late votes are visible immediately.
pub async fn get_event_summary(db: &Database, event_id: &str) -> Result<EventSummary> {
    let event = db
        .get_event(event_id)
        .await?
        .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;

    let timeframes = db.get_timeframes(event_id).await?;
    let responses = db.get_responses(event_id).await?;
    let respondents = db.get_respondents(event_id).await?;

    let timeframe_summaries = summary::calculate_summaries(&timeframes, &responses);

    Ok(EventSummary {
        event,
        timeframes,
        total_respondents: summary::total_respondents(&respondents),
        timeframe_summaries,
    })
}

async fn require_active_event(db: &Database, event_id: &str) -> Result<Event> {
    let event = db
        .get_event(event_id)
        .await?
        .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;

    if event.status != EventStatus::Active {
        return Err(Error::EventClosed(event_id.to_string()));
    }

    Ok(event)
}
