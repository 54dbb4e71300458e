//! Minimal FHIR REST client.
//!
//! Wraps an HTTP client with a fixed base URL, default timeout, and header
//! set, and returns a uniform [`ResponseSnapshot`] (status code plus
//! parsed-or-raw body) for every request. [`bundle`] holds the inspection
//! helpers the suites use to pick responses apart.

pub mod bundle;
pub mod client;
pub mod error;
pub mod response;

pub use client::FhirClient;
pub use error::{Error, Result};
pub use reqwest::{Method, StatusCode};
pub use response::{Body, ResponseSnapshot};
