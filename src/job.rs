//! Job driver: one run of the expiry alert sequence.
//!
//! Sequence: compute "today" -> query inventory -> tally buckets -> read
//! token registry -> compose payload -> dispatch -> report. The two early
//! exits (nothing nearing expiry, nothing registered) terminate the run
//! successfully without touching the later collaborators.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::buckets::{bucket_for, BucketCounts};
use crate::config::AlertConfig;
use crate::dispatch::{dispatch_notification, DispatchSummary, PushDelivery};
use crate::errors::AlertResult;
use crate::notify::compose_summary;
use crate::store::{ProductStore, TokenRegistry};

/// Run one alert pass using the local calendar date.
pub async fn run_expiry_alert_job<S, R, P>(
    config: &AlertConfig,
    store: &S,
    registry: &R,
    pusher: &P,
) -> AlertResult<DispatchSummary>
where
    S: ProductStore + Sync,
    R: TokenRegistry + Sync,
    P: PushDelivery + Sync,
{
    // Local time zone, truncated to midnight: the inventory stores plain
    // calendar dates in the app's zone.
    let today = Local::now().date_naive();
    run_for_date(config, today, store, registry, pusher).await
}

/// Run one alert pass for a fixed reference date.
pub async fn run_for_date<S, R, P>(
    config: &AlertConfig,
    today: NaiveDate,
    store: &S,
    registry: &R,
    pusher: &P,
) -> AlertResult<DispatchSummary>
where
    S: ProductStore + Sync,
    R: TokenRegistry + Sync,
    P: PushDelivery + Sync,
{
    info!(
        "Checking for products expiring within {} days of {}",
        config.alerts.horizon_days, today
    );

    let products = store
        .expiring_products(today, config.alerts.horizon_days)
        .await?;

    let mut counts = BucketCounts::default();
    for product in &products {
        if let Some(bucket) = bucket_for(today, product.expiry_date.as_deref()) {
            counts.record(bucket);
        }
    }

    if counts.total() == 0 {
        info!("No products nearing expiry.");
        return Ok(DispatchSummary::default());
    }

    info!(
        "Expiring products: <=1d: {}, 2-3d: {}, 4-7d: {} (total {})",
        counts.due_1d,
        counts.due_3d,
        counts.due_7d,
        counts.total()
    );

    let registrations = registry.all_registrations().await?;

    if registrations.is_empty() {
        info!("No tokens registered.");
        return Ok(DispatchSummary::default());
    }

    info!("Sending alerts to {} registered devices", registrations.len());

    let payload = compose_summary(&counts, &config.alerts.title, config.link());

    let summary = dispatch_notification(
        &registrations,
        &payload,
        pusher,
        registry,
        config.alerts.batch_size as usize,
    )
    .await?;

    info!(
        "Alerts sent. Success: {}, Failure: {}",
        summary.success_count, summary.failure_count
    );

    Ok(summary)
}
