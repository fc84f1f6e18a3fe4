//! Batch import of school events and room bookings
//!
//! Each input row runs through a fixed sequence of dependent remote calls
//! (room lookup, optional staff lookup, creation, optional participant
//! association). Failures are isolated per row: a failed row becomes an
//! `Error: <message>` status and the run moves on to the next row.

pub mod cache;
pub mod pipeline;
pub mod ports;
pub mod service;
