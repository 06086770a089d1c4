//! Business.Ru check REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde_json::{Value, json};
use url::Url;

use crate::auth::{
    Credentials, RandomSource, RequestParams, ThreadRandom, generate_nonce, unique_hashcat,
};
use crate::error::{ApiError, CheckError};
use crate::rest::endpoints::{self, CHECK_BASE_URL};
use crate::rest::types::{ListFilter, TokenResponse};

/// Default upper bound for a single HTTP exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The Business.Ru check REST API client.
///
/// Every request is signed with the integration secret. All calls except
/// [`get_token`](Self::get_token) fetch a fresh token first; tokens are
/// never cached.
///
/// The `nonce` sent with user, command, shift and state requests is drawn
/// once when the client is built and reused for the lifetime of the client.
/// Token requests instead carry a fresh hashcat each time.
///
/// # Example
///
/// ```rust,no_run
/// use business_ru_check::rest::{CheckRestClient, ListFilter};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CheckRestClient::new("secret", "app_id")?;
///
///     let state = client.get_system_state().await?;
///     println!("State: {}", state);
///
///     let shifts = client
///         .get_shifts(&ListFilter::new().date_create("2024-01-01 00:00:00", "2024-01-31 23:59:59"))
///         .await?;
///     println!("Shifts: {}", shifts);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CheckRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    credentials: Credentials,
    random: Arc<dyn RandomSource>,
    nonce: String,
}

impl CheckRestClient {
    /// Create a client with default settings from a shared secret and application id.
    pub fn new(secret: impl Into<String>, app_id: impl Into<String>) -> Result<Self, CheckError> {
        Self::builder(Credentials::new(app_id, secret)).build()
    }

    /// Create a new client builder.
    pub fn builder(credentials: Credentials) -> CheckRestClientBuilder {
        CheckRestClientBuilder::new(credentials)
    }

    /// The nonce reused by every non-token request of this client.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // HTTP request methods.

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, CheckError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, endpoint))?)
    }

    /// Parameters shared by all token-authenticated calls: app id, instance nonce, token.
    async fn token_params(&self) -> Result<RequestParams, CheckError> {
        let token = self.get_token().await?;

        let mut params = RequestParams::new();
        params.insert("app_id".to_string(), json!(self.credentials.app_id()));
        params.insert("nonce".to_string(), json!(self.nonce));
        params.insert("token".to_string(), json!(token));
        Ok(params)
    }

    /// Sign `params` and send them as the query string of a GET request.
    pub(crate) async fn signed_get(
        &self,
        mut url: Url,
        params: &RequestParams,
    ) -> Result<Value, CheckError> {
        let signature = self.credentials.sign(params)?;

        let query = encode_query(params)?;
        url.set_query(Some(&query));

        tracing::debug!(
            "GET {} with params [{}]",
            url.path(),
            params.keys().cloned().collect::<Vec<_>>().join(", ")
        );

        let response = self
            .http_client
            .get(url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .header(ACCEPT, "application/json")
            .header("sign", signature)
            .send()
            .await
            .map_err(CheckError::from_middleware)?;

        self.parse_response(response).await
    }

    /// Parse a response from the check API.
    async fn parse_response(&self, response: reqwest::Response) -> Result<Value, CheckError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                CheckError::Timeout
            } else {
                CheckError::Http(e)
            }
        })?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("Request rejected with HTTP {}", status);
            return Err(CheckError::Auth(format!("HTTP {}: {}", status, body)));
        }
        if !status.is_success() {
            tracing::warn!("Request failed with HTTP {}", status);
            return Err(CheckError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body)?;

        if let Some(api_error) = ApiError::from_body(&value) {
            tracing::warn!("Check API returned an error: {}", api_error);
            if api_error.is_auth_failure() {
                return Err(CheckError::Auth(api_error.to_string()));
            }
            return Err(CheckError::Api(api_error));
        }

        Ok(value)
    }

    // Endpoints.

    /// Obtain an integration token.
    ///
    /// Sends the application id with a fresh hashcat as nonce. The token is
    /// returned without surrounding quotes.
    pub async fn get_token(&self) -> Result<String, CheckError> {
        let mut params = RequestParams::new();
        params.insert("app_id".to_string(), json!(self.credentials.app_id()));
        params.insert(
            "nonce".to_string(),
            json!(unique_hashcat(self.random.as_ref())),
        );

        let body = self
            .signed_get(self.endpoint_url(endpoints::TOKEN)?, &params)
            .await?;
        let response: TokenResponse = serde_json::from_value(body)?;
        response.into_token()
    }

    /// Get information about the current user / account.
    pub async fn get_user(&self) -> Result<Value, CheckError> {
        let params = self.token_params().await?;
        self.signed_get(self.endpoint_url(endpoints::USER)?, &params)
            .await
    }

    /// Get a single fiscal registrar command.
    ///
    /// # Arguments
    ///
    /// * `command_id` - The command identifier, sent as one path segment
    ///
    /// An empty id is rejected before any request is made.
    pub async fn get_command_by_id(&self, command_id: &str) -> Result<Value, CheckError> {
        if command_id.is_empty() {
            return Err(CheckError::InvalidRequest(
                "command id must not be empty".to_string(),
            ));
        }
        let params = self.token_params().await?;

        let mut url = self.endpoint_url(endpoints::COMMAND)?;
        url.path_segments_mut()
            .map_err(|_| CheckError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(command_id);

        self.signed_get(url, &params).await
    }

    /// List fiscal registrar commands.
    ///
    /// # Arguments
    ///
    /// * `filter` - Date bounds and paging
    pub async fn get_commands(&self, filter: &ListFilter) -> Result<Value, CheckError> {
        let mut params = self.token_params().await?;
        filter.extend_params(&mut params);
        self.signed_get(self.endpoint_url(endpoints::COMMAND)?, &params)
            .await
    }

    /// Get the state of the service.
    pub async fn get_system_state(&self) -> Result<Value, CheckError> {
        let params = self.token_params().await?;
        self.signed_get(self.endpoint_url(endpoints::STATE_SYSTEM)?, &params)
            .await
    }

    /// List shifts.
    ///
    /// # Arguments
    ///
    /// * `filter` - Date bounds and paging
    pub async fn get_shifts(&self, filter: &ListFilter) -> Result<Value, CheckError> {
        let mut params = self.token_params().await?;
        filter.extend_params(&mut params);
        self.signed_get(self.endpoint_url(endpoints::SHIFT)?, &params)
            .await
    }
}

impl std::fmt::Debug for CheckRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRestClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("nonce", &self.nonce)
            .finish()
    }
}

/// Encode parameters as a query string.
///
/// Strings go in as-is, other scalars as their JSON text, `null` as empty.
fn encode_query(params: &RequestParams) -> Result<String, CheckError> {
    let pairs: Vec<(&str, String)> = params
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), text)
        })
        .collect();

    serde_urlencoded::to_string(&pairs).map_err(|e| CheckError::InvalidRequest(e.to_string()))
}

/// Builder for [`CheckRestClient`].
pub struct CheckRestClientBuilder {
    base_url: String,
    credentials: Credentials,
    random: Option<Arc<dyn RandomSource>>,
    user_agent: Option<String>,
    timeout: Duration,
}

impl CheckRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: CHECK_BASE_URL.to_string(),
            credentials,
            random: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a custom randomness source for nonces and hashcats.
    pub fn random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the timeout applied to each HTTP exchange.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// Draws the instance nonce; performs no network I/O.
    pub fn build(self) -> Result<CheckRestClient, CheckError> {
        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("business-ru-check/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("business-ru-check"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let random = self.random.unwrap_or_else(|| Arc::new(ThreadRandom));
        let nonce = generate_nonce(random.as_ref());

        Ok(CheckRestClient {
            http_client: client,
            base_url: self.base_url,
            credentials: self.credentials,
            random,
            nonce,
        })
    }
}
