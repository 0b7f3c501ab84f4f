use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Event, EventStatus, Timeframe, TimeframeType};
use crate::sharecode;
use crate::timeframes::generate_timeframes;

/// Share-code allocation gives up after this many collisions. Retrying the
/// whole creation is the caller's call.
pub const MAX_CODE_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub timeframe_type: TimeframeType,
    pub creator_name: String,
    pub creator_email: Option<String>,
}

/// Creates an event: allocates a unique share code, materializes the
/// timeframes for its policy and persists the lot atomically.
pub async fn create_event(
    db: &Database,
    request: CreateEventRequest,
) -> Result<(Event, Vec<Timeframe>)> {
    if request.end_date <= request.start_date {
        return Err(Error::InvalidDateRange);
    }

    let share_code = allocate_share_code(db).await?;

    let event = Event::new(
        request.title,
        request.description,
        request.creator_name,
        request.creator_email,
        request.start_date,
        request.end_date,
        request.timeframe_type,
        share_code,
    );

    let timeframes = generate_timeframes(
        &event.event_id,
        event.start_date,
        event.end_date,
        event.timeframe_type,
    );

    db.create_event(&event, &timeframes).await?;
    info!(
        "created event {} with {} timeframes, share code {}",
        event.event_id,
        timeframes.len(),
        event.share_code
    );

    Ok((event, timeframes))
}

async fn allocate_share_code(db: &Database) -> Result<String> {
    allocate_share_code_with(db, sharecode::generate_share_code).await
}

async fn allocate_share_code_with(
    db: &Database,
    mut draw: impl FnMut() -> String,
) -> Result<String> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = draw();
        if !db.share_code_exists(&code).await? {
            return Ok(code);
        }
        warn!("share code {code} already taken (attempt {attempt})");
    }

    Err(Error::ShareCodeExhausted(MAX_CODE_ATTEMPTS))
}

pub async fn get_event(db: &Database, event_id: &str) -> Result<(Event, Vec<Timeframe>)> {
    let event = db
        .get_event(event_id)
        .await?
        .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;
    let timeframes = db.get_timeframes(event_id).await?;
    Ok((event, timeframes))
}

/// Share-code lookup. Input is normalized to uppercase before validation so
/// "abc234" finds the event stored under "ABC234".
pub async fn get_event_by_share_code(
    db: &Database,
    share_code: &str,
) -> Result<(Event, Vec<Timeframe>)> {
    let code = share_code.trim().to_uppercase();
    if !sharecode::is_valid_share_code(&code) {
        return Err(Error::InvalidShareCode(share_code.to_string()));
    }

    let event = db
        .get_event_by_share_code(&code)
        .await?
        .ok_or_else(|| Error::EventNotFound(code.clone()))?;
    let timeframes = db.get_timeframes(&event.event_id).await?;
    Ok((event, timeframes))
}

/// Stops an event accepting further responses.
pub async fn close_event(db: &Database, event_id: &str) -> Result<()> {
    db.get_event(event_id)
        .await?
        .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;
    db.set_event_status(event_id, EventStatus::Closed).await?;
    info!("closed event {event_id}");
    Ok(())
}

/// Expires active events whose date range is entirely in the past.
pub async fn expire_past_events(db: &Database, now: DateTime<Utc>) -> Result<u64> {
    let expired = db.expire_events(now).await?;
    if expired > 0 {
        info!("expired {expired} past events");
    }
    Ok(expired)
}
