//! Team API - the remote team service as seen by the dashboard
//!
//! The views only ever talk to the [`TeamApi`] trait. Two implementations
//! ship here: [`HttpTeamApi`] for the real service and [`MockTeamApi`]
//! for tests and the offline demo.

pub mod client;
pub mod error;
pub mod http;
pub mod mock;

pub use client::{ApiFuture, TeamApi};
pub use error::ApiError;
pub use http::HttpTeamApi;
pub use mock::{MockReply, MockTeamApi};
