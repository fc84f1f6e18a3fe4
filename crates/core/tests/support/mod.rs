//! Shared test helpers for `roombook-core` integration tests.
//!
//! Provides an in-memory `SisGateway` that records every call, so pipeline
//! tests can assert on exactly which remote operations a row triggered.

pub mod gateway;
