//! MD5 request signature for check API authentication.
//!
//! Every request carries a `sign` header computed as:
//! ```text
//! MD5(params_string + secret)
//! ```
//!
//! where `params_string` is the JSON object of all request parameters with
//! keys in alphabetical order, ASCII-only escaping, and ASCII whitespace
//! removed. The remote service recomputes the same digest, so the
//! serialization has to match byte for byte.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::Value;

use crate::error::CheckError;

/// Request parameters, kept in alphabetical key order.
pub type RequestParams = BTreeMap<String, Value>;

/// Serialize parameters into the exact string that gets signed.
///
/// # Example
///
/// ```rust
/// use business_ru_check::auth::{RequestParams, canonical_params};
/// use serde_json::json;
///
/// let mut params = RequestParams::new();
/// params.insert("b".into(), json!(2));
/// params.insert("a".into(), json!(1));
/// assert_eq!(canonical_params(&params).unwrap(), r#"{"a":1,"b":2}"#);
/// ```
pub fn canonical_params(params: &RequestParams) -> Result<String, CheckError> {
    let json = serde_json::to_string(params)?;

    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        // Everything outside printable ASCII is escaped, DEL included.
        // Only ASCII whitespace is stripped.
        if (c as u32) > 0x7e {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        } else if !c.is_ascii_whitespace() {
            out.push(c);
        }
    }
    Ok(out)
}

/// Compute the `sign` header for a parameter set.
///
/// # Arguments
///
/// * `secret` - The shared secret issued with the integration
/// * `params` - All query parameters that will be sent with the request
///
/// # Returns
///
/// Lowercase hex MD5 digest, 32 characters.
///
/// # Example
///
/// ```rust
/// use business_ru_check::auth::{RequestParams, compute_signature};
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut params = RequestParams::new();
/// params.insert("app_id".into(), json!("42"));
/// params.insert("nonce".into(), json!("a1B2c3D4e5"));
/// let sign = compute_signature("secret", &params)?;
/// assert_eq!(sign.len(), 32);
/// # Ok(())
/// # }
/// ```
pub fn compute_signature(secret: &str, params: &RequestParams) -> Result<String, CheckError> {
    let mut payload = canonical_params(params)?;
    payload.push_str(secret);
    Ok(format!("{:x}", md5::compute(payload.as_bytes())))
}
