//! # Roombook CLI
//!
//! Argument parsing, logging setup and wiring for the `roombook` binary.
//! Each subcommand loads configuration, fetches the SIS password once and
//! builds a single `SisClient` for the rest of the run.

pub mod cli;
pub mod commands;
pub mod context;
pub mod logging;
