//! # Roombook Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client wrapper (timeouts, no retries)
//! - SIS API client (REST + GraphQL) implementing `SisGateway`
//! - CSV import source and report sink
//! - Configuration loader
//! - Secret providers (environment, system keyring)
//!
//! ## Architecture
//! - Implements traits defined in `roombook-core`
//! - Contains all "impure" code (network, files, keychain)

pub mod config;
pub mod errors;
pub mod http;
pub mod secrets;
pub mod sis;
pub mod tabular;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use secrets::{provider_for, EnvSecretProvider, KeyringSecretProvider};
pub use sis::{PurgeReport, SisClient};
pub use tabular::{write_report, write_report_file, ImportTable};
