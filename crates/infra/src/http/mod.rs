//! HTTP transport shared by the SIS client

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
