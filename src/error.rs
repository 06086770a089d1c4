//! Error types for the Business.Ru check client library.

use thiserror::Error;

/// The main error type for all check API client operations.
#[derive(Error, Debug)]
pub enum CheckError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The service rejected the signature, token or application id
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The service returned an error in an otherwise successful response
    #[error("Check API error: {0}")]
    Api(ApiError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request could not be built from the given arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CheckError {
    /// The request never produced a usable HTTP answer.
    ///
    /// Covers network failures, timeouts and non-success statuses other
    /// than authentication rejections.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(_)
            | Self::HttpMiddleware(_)
            | Self::Status { .. }
            | Self::Timeout
            | Self::Url(_) => true,
            _ => false,
        }
    }

    /// The service refused the credentials or the request signature.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// The response body could not be decoded or lacked a required field.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Json(_) | Self::InvalidResponse(_))
    }

    /// Map a low-level HTTP error, folding timeouts into [`CheckError::Timeout`].
    pub(crate) fn from_middleware(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => Self::Timeout,
            reqwest_middleware::Error::Reqwest(e) => Self::Http(e),
            other => Self::HttpMiddleware(other),
        }
    }
}

/// Error reported by the check API in a response body.
///
/// The service puts a textual `error` field (optionally with a `code`)
/// into the JSON object when it refuses a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Error code, `"Unknown"` when the body carries none
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ApiError {
    /// Create a new API error from code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Extract an error from a decoded response body.
    ///
    /// Returns `None` when the body has no `error` field, or when it is
    /// `null`, `false`, `0` or an empty string.
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        let error = body.get("error")?;
        let message = match error {
            serde_json::Value::Null | serde_json::Value::Bool(false) => return None,
            serde_json::Value::Number(n) if n.as_i64() == Some(0) => return None,
            serde_json::Value::String(s) if s.is_empty() => return None,
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(obj) => obj
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
            other => other.to_string(),
        };
        let code = body
            .get("code")
            .or_else(|| error.get("code"))
            .map(|c| match c {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "Unknown".to_string());
        Some(Self::new(code, message))
    }

    /// Lowercased words of the message; `_` counts as a word character.
    fn words(&self) -> Vec<String> {
        self.message
            .to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn mentions_any(&self, terms: &[&str]) -> bool {
        self.words().iter().any(|w| terms.contains(&w.as_str()))
    }

    /// Check if the service rejected the request signature.
    pub fn is_invalid_signature(&self) -> bool {
        self.mentions_any(&["sign", "signature", "подпись", "подписи"])
    }

    /// Check if the service rejected the token.
    pub fn is_invalid_token(&self) -> bool {
        self.mentions_any(&["token", "токен", "токена"])
    }

    /// Check if the service did not recognise the application id.
    pub fn is_invalid_app_id(&self) -> bool {
        let words = self.words();
        words.iter().any(|w| w == "app_id" || w == "appid")
            || words
                .windows(2)
                .any(|pair| pair[0] == "application" && pair[1] == "id")
    }

    /// Any of the credential-related rejections.
    pub fn is_auth_failure(&self) -> bool {
        self.is_invalid_signature() || self.is_invalid_token() || self.is_invalid_app_id()
    }
}
