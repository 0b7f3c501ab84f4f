use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// How an event's date range is segmented into votable timeframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeframeType {
    Weekend,
    Weekday,
    SpecificDates,
    AllDays,
}

impl TimeframeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeframeType::Weekend => "weekend",
            TimeframeType::Weekday => "weekday",
            TimeframeType::SpecificDates => "specific_dates",
            TimeframeType::AllDays => "all_days",
        }
    }
}

impl FromStr for TimeframeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekend" => Ok(TimeframeType::Weekend),
            "weekday" => Ok(TimeframeType::Weekday),
            "specific_dates" => Ok(TimeframeType::SpecificDates),
            "all_days" => Ok(TimeframeType::AllDays),
            other => Err(Error::UnsupportedTimeframeType(other.to_string())),
        }
    }
}

impl fmt::Display for TimeframeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Active,
    Closed,
    Expired,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Closed => "closed",
            EventStatus::Expired => "expired",
        }
    }
}

impl FromStr for EventStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EventStatus::Active),
            "closed" => Ok(EventStatus::Closed),
            "expired" => Ok(EventStatus::Expired),
            other => Err(Error::UnknownEventStatus(other.to_string())),
        }
    }
}

/// Vote strength for one (respondent, timeframe) pair.
///
/// The string forms cross the serialization boundary and are part of the
/// external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    NotAvailable,
    CouldMake,
    Preferred,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::NotAvailable => "not_available",
            Availability::CouldMake => "could_make",
            Availability::Preferred => "preferred",
        }
    }
}

impl FromStr for Availability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_available" => Ok(Availability::NotAvailable),
            "could_make" => Ok(Availability::CouldMake),
            "preferred" => Ok(Availability::Preferred),
            other => Err(Error::UnknownAvailability(other.to_string())),
        }
    }
}

/// A scheduling poll: a date range, a segmentation policy and a share code.
/// Immutable after creation except for `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub creator_name: String,
    pub creator_email: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub timeframe_type: TimeframeType,
    pub share_code: String,
    pub created_at: DateTime<Utc>,
    pub status: EventStatus,
}

impl Event {
    pub fn new(
        title: String,
        description: Option<String>,
        creator_name: String,
        creator_email: Option<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        timeframe_type: TimeframeType,
        share_code: String,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            creator_name,
            creator_email,
            title,
            description,
            start_date,
            end_date,
            timeframe_type,
            share_code,
            created_at: Utc::now(),
            status: EventStatus::Active,
        }
    }
}

/// One candidate slot within an event's date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeframe {
    pub timeframe_id: String,
    pub event_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Human-readable label, e.g. "Jan 13-14, 2024".
    pub label: String,
    /// Advisory counter; summaries always recompute from raw responses.
    pub response_count: i64,
}

/// A person who has voted at least once on an event. Created on first
/// response, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Respondent {
    pub respondent_id: String,
    pub event_id: String,
    pub name: String,
    pub email: Option<String>,
    pub first_responded_at: DateTime<Utc>,
}

impl Respondent {
    pub fn new(event_id: String, name: String, email: Option<String>) -> Self {
        Self {
            respondent_id: Uuid::new_v4().to_string(),
            event_id,
            name,
            email,
            first_responded_at: Utc::now(),
        }
    }
}

/// One respondent's vote on one timeframe. Identity is
/// (event, respondent, timeframe); resubmitting overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub event_id: String,
    pub respondent_id: String,
    /// Denormalized so summaries need no respondent join.
    pub respondent_name: String,
    pub timeframe_id: String,
    pub availability: Availability,
    pub responded_at: DateTime<Utc>,
}

/// Per-timeframe vote tally. Derived on every read, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeframeSummary {
    pub timeframe_id: String,
    pub label: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub preferred_count: i64,
    pub could_make_count: i64,
    pub not_available_count: i64,
    /// Weighted ranking score: 3*preferred + could_make - not_available.
    pub score: i64,
    pub respondents: Vec<RespondentAvailability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondentAvailability {
    pub respondent_id: String,
    pub respondent_name: String,
    pub availability: Availability,
}

/// Full ranked view of an event, assembled by the summary workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub event: Event,
    pub timeframes: Vec<Timeframe>,
    pub total_respondents: i64,
    pub timeframe_summaries: Vec<TimeframeSummary>,
}
