//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// API layout
pub const REST_PREFIX: &str = "/rest-v2";
pub const GRAPHQL_PATH: &str = "/graphql/query";

// Request defaults
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_EMAIL_ADDRESS_TYPE: &str = "WORK";
pub const USER_AGENT: &str = concat!("roombook/", env!("CARGO_PKG_VERSION"));

// Secrets
pub const DEFAULT_SECRET_NAME: &str = "ArborStaffUpdaterPassword";
pub const DEFAULT_KEYRING_SERVICE: &str = "roombook";
pub const SECRET_ENV_VAR: &str = "ROOMBOOK_SECRET";

// Datetimes
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const INPUT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

// Report
pub const STATUS_COLUMN: &str = "status";
