//! Orchestration between the storage handle and the pure core: event
//! creation, vote submission and summary assembly.

mod event;
mod response;

pub use event::{
    close_event, create_event, expire_past_events, get_event, get_event_by_share_code,
    CreateEventRequest, MAX_CODE_ATTEMPTS,
};
pub use response::{
    get_event_summary, submit_responses, update_responses, SubmitResponsesRequest, TimeframeVote,
};
