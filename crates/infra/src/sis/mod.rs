//! Client for the school information system APIs
//!
//! REST writes use the `{"request": {"<entity>": {...}}}` envelope and are
//! judged by status code alone; lookups go through the GraphQL endpoint with
//! bound variables.

pub mod client;
mod graphql;
mod payloads;
mod responses;

pub use client::{PurgeReport, SisClient};
