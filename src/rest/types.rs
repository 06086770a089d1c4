//! Request and response types for the check REST API.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::RequestParams;
use crate::error::CheckError;

/// Filter for the command and shift list endpoints.
///
/// Dates are passed through verbatim; the service expects
/// `YYYY-MM-DD HH:MM:SS`. Unset dates are still sent, as empty strings.
///
/// # Example
///
/// ```rust
/// use business_ru_check::rest::ListFilter;
///
/// let filter = ListFilter::new()
///     .date_create("2024-01-01 00:00:00", "2024-01-31 23:59:59")
///     .page(2)
///     .count(50);
/// assert_eq!(filter.page, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    /// Created at or after
    pub date_create_from: Option<String>,
    /// Created at or before
    pub date_create_to: Option<String>,
    /// Updated at or after
    pub date_update_from: Option<String>,
    /// Updated at or before
    pub date_update_to: Option<String>,
    /// Result received at or after
    pub date_result_from: Option<String>,
    /// Result received at or before
    pub date_result_to: Option<String>,
    /// Page number, starting at 1
    pub page: u32,
    /// Records per page (`c_num` on the wire)
    pub count: u32,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            date_create_from: None,
            date_create_to: None,
            date_update_from: None,
            date_update_to: None,
            date_result_from: None,
            date_result_to: None,
            page: 1,
            count: 100,
        }
    }
}

impl ListFilter {
    /// Create a filter with no date bounds, first page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the creation date.
    pub fn date_create(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_create_from = Some(from.into());
        self.date_create_to = Some(to.into());
        self
    }

    /// Bound the last update date.
    pub fn date_update(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_update_from = Some(from.into());
        self.date_update_to = Some(to.into());
        self
    }

    /// Bound the result date.
    pub fn date_result(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_result_from = Some(from.into());
        self.date_result_to = Some(to.into());
        self
    }

    /// Set the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the number of records per page.
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Write the filter fields into a parameter set.
    pub(crate) fn extend_params(&self, params: &mut RequestParams) {
        let dates = [
            ("filter_date_create_from", &self.date_create_from),
            ("filter_date_create_to", &self.date_create_to),
            ("filter_date_update_from", &self.date_update_from),
            ("filter_date_update_to", &self.date_update_to),
            ("filter_date_result_from", &self.date_result_from),
            ("filter_date_result_to", &self.date_result_to),
        ];
        for (key, value) in dates {
            params.insert(key.to_string(), json!(value.as_deref().unwrap_or("")));
        }
        params.insert("page".to_string(), json!(self.page));
        params.insert("c_num".to_string(), json!(self.count));
    }
}

/// Response of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The integration token
    #[serde(default)]
    pub token: Option<Value>,
}

impl TokenResponse {
    /// Extract the token as a plain string without surrounding quotes.
    pub fn into_token(self) -> Result<String, CheckError> {
        let raw = match self.token {
            None | Some(Value::Null) => {
                return Err(CheckError::InvalidResponse(
                    "Response missing 'token' field".to_string(),
                ));
            }
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        };
        Ok(raw.trim_matches('"').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_sends_every_key() {
        let mut params = RequestParams::new();
        ListFilter::new().extend_params(&mut params);

        for key in [
            "filter_date_create_from",
            "filter_date_create_to",
            "filter_date_update_from",
            "filter_date_update_to",
            "filter_date_result_from",
            "filter_date_result_to",
        ] {
            assert_eq!(params.get(key), Some(&json!("")), "{key} must be present");
        }
        assert_eq!(params["page"], json!(1));
        assert_eq!(params["c_num"], json!(100));
    }

    #[test]
    fn test_filter_setters() {
        let mut params = RequestParams::new();
        ListFilter::new()
            .date_result("2024-02-01 00:00:00", "2024-02-02 00:00:00")
            .page(3)
            .count(10)
            .extend_params(&mut params);

        assert_eq!(params["filter_date_result_from"], json!("2024-02-01 00:00:00"));
        assert_eq!(params["filter_date_result_to"], json!("2024-02-02 00:00:00"));
        assert_eq!(params["filter_date_create_from"], json!(""));
        assert_eq!(params["page"], json!(3));
        assert_eq!(params["c_num"], json!(10));
    }

    #[test]
    fn test_token_strips_quotes() {
        let response: TokenResponse = serde_json::from_str(r#"{"token":"\"abc123\""}"#).unwrap();
        assert_eq!(response.into_token().unwrap(), "abc123");
    }

    #[test]
    fn test_numeric_token() {
        let response: TokenResponse = serde_json::from_str(r#"{"token":12345}"#).unwrap();
        assert_eq!(response.into_token().unwrap(), "12345");
    }

    #[test]
    fn test_missing_token() {
        let response: TokenResponse = serde_json::from_str(r#"{"other":1}"#).unwrap();
        assert!(response.into_token().unwrap_err().is_decode());

        let response: TokenResponse = serde_json::from_str(r#"{"token":null}"#).unwrap();
        assert!(response.into_token().unwrap_err().is_decode());
    }
}
