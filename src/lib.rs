//! # Business.Ru Check Client
//!
//! An async Rust client library for the Business.Ru check fiscal registrar open API.
//!
//! ## Features
//!
//! - MD5 request signing over canonically ordered parameters
//! - Per-client nonce and per-token-request hashcat generation
//! - Injectable randomness for reproducible requests in tests
//! - Typed errors separating transport, authentication and decode failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use business_ru_check::rest::CheckRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CheckRestClient::new("secret", "app_id")?;
//!     let user = client.get_user().await?;
//!     println!("User: {}", user);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;

// Re-export commonly used types at crate root
pub use error::{ApiError, CheckError};
pub use rest::{CheckRestClient, ListFilter};

/// Result type alias using CheckError
pub type Result<T> = std::result::Result<T, CheckError>;
