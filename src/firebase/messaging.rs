//! FCM push delivery.
//!
//! The HTTP v1 API has no server-side multicast, so this client presents the
//! multicast surface the dispatcher expects and performs the fan-out itself:
//! one `messages:send` request per token, sequentially, exactly as the
//! original Admin SDK's `sendEachForMulticast` does. Per-token HTTP errors
//! become `SendOutcome` records carrying the service error code; only a
//! transport-level failure aborts the batch.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::AlertConfig;
use crate::dispatch::{MulticastResponse, PushDelivery, SendOutcome};
use crate::errors::{AlertError, AlertResult};
use crate::notify::NotificationPayload;

/// FCM v1 client bound to one project and one access token (one job run).
#[derive(Debug, Clone)]
pub struct MessagingClient {
    http: Client,
    base_url: String,
    project_id: String,
    access_token: String,
}

impl MessagingClient {
    pub fn new(
        http: Client,
        config: &AlertConfig,
        project_id: String,
        access_token: String,
    ) -> Self {
        Self {
            http,
            base_url: config.endpoints.messaging_base.clone(),
            project_id,
            access_token,
        }
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, self.project_id
        )
    }

    async fn send_one(&self, token: &str, payload: &NotificationPayload) -> AlertResult<SendOutcome> {
        let response = self
            .http
            .post(self.send_url())
            .bearer_auth(&self.access_token)
            .json(&message_body(token, payload))
            .send()
            .await
            .map_err(|e| AlertError::Push(format!("send request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(SendOutcome {
                success: true,
                error_code: None,
            });
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let code =
            fcm_error_code(&body).unwrap_or_else(|| format!("http-{}", status.as_u16()));

        Ok(SendOutcome {
            success: false,
            error_code: Some(code),
        })
    }
}

#[async_trait]
impl PushDelivery for MessagingClient {
    async fn send_multicast(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
    ) -> AlertResult<MulticastResponse> {
        let mut responses = Vec::with_capacity(tokens.len());
        for token in tokens {
            responses.push(self.send_one(token, payload).await?);
        }
        Ok(MulticastResponse { responses })
    }
}

/// Build the `messages:send` request body for one token.
pub(crate) fn message_body(token: &str, payload: &NotificationPayload) -> Value {
    let mut message = json!({
        "token": token,
        "notification": {
            "title": payload.title,
            "body": payload.body
        }
    });

    if let Some(link) = &payload.link {
        message["webpush"] = json!({ "fcm_options": { "link": link } });
    }

    json!({ "message": message })
}

/// Extract the service error code from an error response body: the
/// FCM-specific `errorCode` detail when present, else the RPC status.
pub(crate) fn fcm_error_code(body: &Value) -> Option<String> {
    let error = body.get("error")?;

    if let Some(details) = error.get("details").and_then(Value::as_array) {
        for detail in details {
            if let Some(code) = detail.get("errorCode").and_then(Value::as_str) {
                return Some(code.to_string());
            }
        }
    }

    error
        .get("status")
        .and_then(Value::as_str)
        .map(String::from)
}
