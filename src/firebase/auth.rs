//! OAuth2 access-token minting via the JWT bearer grant.
//!
//! The job signs a short-lived RS256 assertion with the service-account key
//! and exchanges it at the token endpoint for a bearer token covering both
//! the document store and the messaging API. One token is minted per run;
//! a run finishes well inside the token lifetime.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::errors::{AlertError, AlertResult};
use crate::firebase::credentials::ServiceAccountKey;

/// Scopes for Firestore reads/deletes and FCM sends.
const SCOPES: &str =
    "https://www.googleapis.com/auth/datastore https://www.googleapis.com/auth/firebase.messaging";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime in seconds (the endpoint caps this at one hour).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Sign the bearer-grant assertion for `key`.
fn signed_assertion(key: &ServiceAccountKey, token_url: &str) -> AlertResult<String> {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SCOPES,
        aud: token_url,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| AlertError::Auth(format!("invalid service-account private key: {e}")))?;

    encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| AlertError::Auth(format!("failed to sign assertion: {e}")))
}

/// Exchange a signed assertion for an access token.
pub async fn mint_access_token(
    http: &reqwest::Client,
    key: &ServiceAccountKey,
    token_url: &str,
) -> AlertResult<String> {
    let assertion = signed_assertion(key, token_url)?;

    let response = http
        .post(token_url)
        .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| AlertError::Auth(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AlertError::Auth(format!(
            "token endpoint returned {status}"
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AlertError::Auth(format!("malformed token response: {e}")))?;

    Ok(token.access_token)
}
