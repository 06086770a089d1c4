//! Authentication module for the check API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Nonce and hashcat generation from an injectable randomness source
//! - MD5 signature generation over canonically serialized parameters

mod credentials;
mod nonce;
mod signature;

pub use credentials::{APP_ID_VAR, Credentials, SECRET_VAR};
pub use nonce::{
    NONCE_LEN, RandomSource, SeededRandom, ThreadRandom, generate_nonce, unique_hashcat,
};
pub use signature::{RequestParams, canonical_params, compute_signature};
