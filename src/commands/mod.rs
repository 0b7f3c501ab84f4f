//! CLI surface over the event and response workflows.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::TimeframeType;
use crate::service::{self, CreateEventRequest, SubmitResponsesRequest, TimeframeVote};
use crate::timeframes::midnight;

#[derive(Parser)]
#[command(name = "whenabouts", version)]
#[command(about = "Find a time that works: collect availability votes per timeframe and rank them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an event and print its share code and timeframes
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// First day of the proposed range (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the proposed range (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        /// Segmentation policy: weekend, weekday, all_days or specific_dates
        #[arg(long, value_name = "POLICY")]
        timeframes: TimeframeType,
        #[arg(long)]
        creator_name: String,
        #[arg(long)]
        creator_email: Option<String>,
    },
    /// Show an event and its timeframes
    Show { share_code: String },
    /// Submit votes, or update them when --respondent-id is given
    Respond {
        share_code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        /// Update an earlier submission instead of creating a new respondent
        #[arg(long)]
        respondent_id: Option<String>,
        /// Repeatable: <timeframe-id>=<not_available|could_make|preferred>
        #[arg(long = "vote", value_name = "VOTE", required = true)]
        votes: Vec<String>,
    },
    /// Print the ranked availability summary
    Summary { share_code: String },
    /// Close an event to further responses
    Close { share_code: String },
    /// Expire active events whose date range has fully passed
    Expire,
}

pub async fn run(db: &Database, command: Commands) -> Result<()> {
    match command {
        Commands::Create {
            title,
            description,
            start,
            end,
            timeframes,
            creator_name,
            creator_email,
        } => {
            let (event, frames) = service::create_event(
                db,
                CreateEventRequest {
                    title,
                    description,
                    start_date: midnight(start),
                    end_date: midnight(end),
                    timeframe_type: timeframes,
                    creator_name,
                    creator_email,
                },
            )
            .await?;

            println!("Created \"{}\" with share code {}", event.title, event.share_code);
            for frame in &frames {
                println!("  {}  {}", frame.timeframe_id, frame.label);
            }
            if frames.is_empty() {
                println!("  (no complete timeframes fit the range)");
            }
            Ok(())
        }

        Commands::Show { share_code } => {
            let (event, timeframes) = service::get_event_by_share_code(db, &share_code).await?;
            let view = json!({ "event": event, "timeframes": timeframes });
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }

        Commands::Respond {
            share_code,
            name,
            email,
            respondent_id,
            votes,
        } => {
            let (event, _) = service::get_event_by_share_code(db, &share_code).await?;

            // Parse every vote up front: a malformed one rejects the whole
            // submission, nothing is half-written.
            let responses = votes
                .iter()
                .map(|raw| parse_vote(raw))
                .collect::<Result<Vec<_>>>()?;

            let request = SubmitResponsesRequest {
                respondent_name: name,
                respondent_email: email,
                responses,
            };

            match respondent_id {
                Some(id) => {
                    service::update_responses(db, &event.event_id, &id, request).await?;
                    println!("Updated votes for respondent {id}");
                }
                None => {
                    let id = service::submit_responses(db, &event.event_id, request).await?;
                    println!("Votes recorded. Respondent id: {id}");
                }
            }
            Ok(())
        }

        Commands::Summary { share_code } => {
            let (event, _) = service::get_event_by_share_code(db, &share_code).await?;
            let summary = service::get_event_summary(db, &event.event_id).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }

        Commands::Close { share_code } => {
            let (event, _) = service::get_event_by_share_code(db, &share_code).await?;
            service::close_event(db, &event.event_id).await?;
            println!("Closed \"{}\"", event.title);
            Ok(())
        }

        Commands::Expire => {
            let expired = service::expire_past_events(db, Utc::now()).await?;
            println!("Expired {expired} events");
            Ok(())
        }
    }
}

fn parse_vote(raw: &str) -> Result<TimeframeVote> {
    let (timeframe_id, availability) = raw
        .split_once('=')
        .ok_or_else(|| Error::InvalidVoteSpec(raw.to_string()))?;

    Ok(TimeframeVote {
        timeframe_id: timeframe_id.to_string(),
        availability: availability.parse()?,
    })
}
