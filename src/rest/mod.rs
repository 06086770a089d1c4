//! Check REST API client.
//!
//! This module provides the signed REST client for the Business.Ru check
//! open API.

mod client;
mod endpoints;
mod types;

pub use client::{CheckRestClient, CheckRestClientBuilder, DEFAULT_TIMEOUT};
pub use endpoints::*;
pub use types::*;
