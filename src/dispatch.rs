//! Batch dispatch of the notification to all registered devices.
//!
//! The dispatcher partitions the registration list into batches capped at
//! the delivery-service multicast limit, sends the same payload to each
//! batch, tallies per-token outcomes, and afterwards deletes every
//! registration whose token the service rejected as stale. Deletions are
//! best-effort: a failure is logged and never affects the tally or the
//! remaining deletions.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::errors::AlertResult;
use crate::notify::NotificationPayload;
use crate::store::{DeviceRegistration, TokenRegistry};

/// Per-token delivery outcome, as reported by the delivery service.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub success: bool,
    /// Service error code for failed sends (e.g. "UNREGISTERED")
    pub error_code: Option<String>,
}

/// Outcome of one multicast batch, one entry per token in input order.
#[derive(Debug, Clone, Default)]
pub struct MulticastResponse {
    pub responses: Vec<SendOutcome>,
}

/// Aggregate result across all batches. The only externally observed output
/// of the dispatcher; per-token detail is diagnostic logging only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub success_count: u32,
    pub failure_count: u32,
}

/// Multicast push delivery seam.
///
/// One call fans a single title/body out to every token in the slice. The
/// production implementation is `crate::firebase::messaging`.
#[async_trait]
pub trait PushDelivery {
    async fn send_multicast(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
    ) -> AlertResult<MulticastResponse>;
}

/// Whether a delivery error code identifies a token whose registration
/// should be pruned (unregistered or structurally invalid token).
///
/// Matching is a case-insensitive substring check, tolerant of the service's
/// separator conventions ("INVALID_ARGUMENT",
/// "messaging/registration-token-not-registered", ...).
pub fn is_stale_token_error(code: &str) -> bool {
    let code = code.to_ascii_lowercase().replace(['_', ' '], "-");
    code.contains("unregistered") || code.contains("invalid-argument")
}

/// Send `payload` to every registration and prune stale ones.
///
/// An empty registration list returns a zero summary without any network
/// call. A batch-level send error propagates to the caller and aborts the
/// remaining batches (observed behavior of the original job; see DESIGN.md
/// for the recorded open question).
pub async fn dispatch_notification<P, R>(
    registrations: &[DeviceRegistration],
    payload: &NotificationPayload,
    pusher: &P,
    registry: &R,
    batch_size: usize,
) -> AlertResult<DispatchSummary>
where
    P: PushDelivery + Sync,
    R: TokenRegistry + Sync,
{
    if registrations.is_empty() {
        info!("No tokens registered.");
        return Ok(DispatchSummary::default());
    }

    let batch_count = registrations.len().div_ceil(batch_size);
    let mut summary = DispatchSummary::default();
    // Doc paths queued for deletion, deduplicated so each registration is
    // deleted at most once.
    let mut stale_paths: Vec<String> = Vec::new();

    for (index, batch) in registrations.chunks(batch_size).enumerate() {
        let tokens: Vec<String> = batch.iter().map(|r| r.token.clone()).collect();

        let response = pusher.send_multicast(&tokens, payload).await?;

        let mut batch_failures = 0u32;
        for (registration, outcome) in batch.iter().zip(response.responses.iter()) {
            if outcome.success {
                summary.success_count += 1;
                continue;
            }

            summary.failure_count += 1;
            batch_failures += 1;

            let code = outcome.error_code.as_deref().unwrap_or("unknown");
            debug!(
                "Delivery to token {} failed with code {}",
                registration.token, code
            );

            if is_stale_token_error(code) && !stale_paths.contains(&registration.doc_path) {
                stale_paths.push(registration.doc_path.clone());
            }
        }

        info!(
            "Batch {}/{}: {} tokens, {} failures",
            index + 1,
            batch_count,
            batch.len(),
            batch_failures
        );
    }

    if !stale_paths.is_empty() {
        let mut deleted = 0u32;
        for doc_path in &stale_paths {
            match registry.delete_registration(doc_path).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    warn!("Failed to delete stale registration {}: {}", doc_path, e);
                }
            }
        }
        info!(
            "Pruned {}/{} stale registrations",
            deleted,
            stale_paths.len()
        );
    }

    Ok(summary)
}
