//! # Roombook Domain
//!
//! Business domain types for the SIS batch importer.
//!
//! This crate contains:
//! - Entity kinds and typed references (`EntityRef`, `RoomRef`)
//! - Import rows, validated records and per-row outcomes
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other roombook crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
