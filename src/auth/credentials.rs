//! Integration credentials for the check API.
//!
//! The application id and shared secret are issued when the integration is
//! connected to an account. They are fixed for the lifetime of a client and
//! never validated locally.

use secrecy::{ExposeSecret, SecretString};

use crate::auth::signature::{RequestParams, compute_signature};
use crate::error::CheckError;

/// Default environment variable holding the application id.
pub const APP_ID_VAR: &str = "BUSINESS_RU_APP_ID";

/// Default environment variable holding the shared secret.
pub const SECRET_VAR: &str = "BUSINESS_RU_SECRET";

/// Application id plus shared secret.
#[derive(Clone)]
pub struct Credentials {
    app_id: String,
    secret: SecretString,
}

impl Credentials {
    /// Create credentials from an application id and shared secret.
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    /// Read `BUSINESS_RU_APP_ID` and `BUSINESS_RU_SECRET`.
    ///
    /// Returns `None` if either variable is unset.
    pub fn from_env() -> Option<Self> {
        Self::from_env_vars(APP_ID_VAR, SECRET_VAR)
    }

    /// Read credentials from custom environment variable names.
    pub fn from_env_vars(app_id_var: &str, secret_var: &str) -> Option<Self> {
        let app_id = std::env::var(app_id_var).ok()?;
        let secret = std::env::var(secret_var).ok()?;
        Some(Self::new(app_id, secret))
    }

    /// The application id, sent as `app_id` on every request.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Get the shared secret.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }

    /// Compute the `sign` header for `params` with this secret.
    pub fn sign(&self, params: &RequestParams) -> Result<String, CheckError> {
        compute_signature(self.expose_secret(), params)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
