//! Authentication utilities for the Kuna API

use hmac::{Hmac, Mac};
use sha2::Sha384;

use crate::common::errors::{ClientError, Result};
use crate::config::types::Credential;

type HmacSha384 = Hmac<Sha384>;

/// Generate the HMAC-SHA384 signature for a signed request
///
/// The signed message is the concatenation of the API path prefix of the
/// base URL (e.g. `/v3/`), the endpoint path, the nonce and the serialized
/// JSON body, in that order.
///
/// # Arguments
/// * `private_key` - private half of the credential pair
/// * `sign_prefix` - path prefix of the base URL, with trailing slash
/// * `path` - endpoint path without the prefix
/// * `nonce` - current time in integer milliseconds
/// * `body_json` - serialized JSON body of the request
pub fn sign_request(
    private_key: &str,
    sign_prefix: &str,
    path: &str,
    nonce: i64,
    body_json: &str,
) -> Result<String> {
    let message = format!("{}{}{}{}", sign_prefix, path, nonce, body_json);

    let mut mac = HmacSha384::new_from_slice(private_key.as_bytes())
        .map_err(|e| ClientError::Authentication(format!("Failed to create HMAC: {}", e)))?;
    mac.update(message.as_bytes());
    let result = mac.finalize();

    Ok(hex::encode(result.into_bytes()))
}

/// Generate authentication headers for a signed request
pub fn generate_auth_headers(
    credential: &Credential,
    sign_prefix: &str,
    path: &str,
    body_json: &str,
) -> Result<AuthHeaders> {
    let nonce = chrono::Utc::now().timestamp_millis();
    let signature = sign_request(&credential.private, sign_prefix, path, nonce, body_json)?;

    Ok(AuthHeaders {
        api_key: credential.public.clone(),
        nonce,
        signature,
    })
}

/// Authentication headers for a signed request
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub api_key: String,
    pub nonce: i64,
    pub signature: String,
}

impl AuthHeaders {
    /// Add authentication headers to a reqwest RequestBuilder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("kun-nonce", self.nonce.to_string())
            .header("kun-apikey", &self.api_key)
            .header("kun-signature", &self.signature)
    }
}
