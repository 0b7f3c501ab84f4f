//! Group availability scheduling: a coordinator proposes a date range, the
//! range is segmented into candidate timeframes (weekends, work weeks,
//! single days or one custom span), respondents vote per timeframe via a
//! six-character share code, and votes are aggregated into a ranked summary.
//!
//! The pure core lives in [`timeframes`] and [`summary`]; [`service`] wires
//! it to the SQLite store in [`db`].

pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod sharecode;
pub mod summary;
pub mod timeframes;
