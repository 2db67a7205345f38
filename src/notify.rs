//! Notification composition.

use serde::Serialize;

use crate::buckets::BucketCounts;

/// Title and body sent to every device, plus an optional click-through link.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    /// Platform-specific delivery hint; attached as the webpush link when set
    pub link: Option<String>,
}

/// Render bucket counts into the summary notification.
///
/// The driver never calls this when the total is zero; it short-circuits
/// before composing or sending anything.
pub fn compose_summary(
    counts: &BucketCounts,
    title: &str,
    link: Option<&str>,
) -> NotificationPayload {
    let body = format!(
        "≤1d={} • 2–3d={} • 4–7d={} (total {})",
        counts.due_1d,
        counts.due_3d,
        counts.due_7d,
        counts.total()
    );

    NotificationPayload {
        title: title.to_string(),
        body,
        link: link.map(String::from),
    }
}
